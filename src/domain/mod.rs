// ==========================================
// Motor de Pré-Nota - Camada de domínio
// ==========================================
// Entidades e tipos do rascunho de pré-nota. Contêineres
// de dados puros; regra de negócio fica na camada engine.
// ==========================================

pub mod draft;
pub mod pedido;
pub mod types;

// Reexporta entidades
pub use draft::{
    formatar_seq, Anexo, Header, HeaderPatch, Item, ItemPatch, NovoItem, NovoRateio, Parcela,
    PedidoVinculo, PreNota, Rateio, RateioPatch,
};
pub use pedido::{PedidoItem, PedidoItens};
pub use types::{
    Centavos, DraftMode, EditOperation, ImportStatus, Percentual, Prioridade, Selection,
};

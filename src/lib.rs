// ==========================================
// Motor de Pré-Nota - Biblioteca núcleo
// ==========================================
// Rascunho de nota fiscal (pré-nota) mantido no cliente:
// modelo do documento, API de mutação, motor de validação
// e orquestrador de importação por chave fiscal.
// O ERP, a UI e o transporte HTTP são colaboradores
// externos — aqui entram só como contratos.
// ==========================================

// ==========================================
// Declaração de módulos
// ==========================================

// Camada de domínio - entidades e tipos
pub mod domain;

// Camada engine - mutação, validação, importação
pub mod engine;

// Contratos de colaboradores externos
pub mod services;

// Camada de configuração
pub mod config;

// Sistema de log
pub mod logging;

// Camada API - fachada de negócio
pub mod api;

// ==========================================
// Reexporta tipos centrais
// ==========================================

// Tipos de domínio
pub use domain::types::{
    Centavos, DraftMode, EditOperation, ImportStatus, Percentual, Prioridade, Selection,
};

// Entidades
pub use domain::{
    Anexo, Header, HeaderPatch, Item, ItemPatch, NovoItem, NovoRateio, Parcela, PedidoItens,
    PedidoVinculo, PreNota, Rateio, RateioPatch,
};

// Motores
pub use engine::{
    CancelToken, DraftSession, EditError, ImportError, ImportOrchestrator, ImportSummary,
    ValidationEngine, ValidationReport, Violation,
};

// Contratos
pub use services::{
    BranchDirectory, Clock, DocumentoFiscal, DocumentoItem, FiscalDocumentService, Fornecedor,
    IdentityProvider, LookupError, Protocolo, SubmissionError, SubmissionService,
    SupplierDirectory, SystemClock,
};

// Configuração
pub use config::EngineConfig;

// API
pub use api::{ApiError, ApiResult, PreNotaApi};

// ==========================================
// Constantes
// ==========================================

// Versão do crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Nome do sistema
pub const APP_NAME: &str = "Motor de Pré-Nota";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

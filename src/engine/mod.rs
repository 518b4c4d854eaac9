// ==========================================
// Motor de Pré-Nota - Camada engine
// ==========================================
// Regra de negócio do rascunho: mutação sancionada,
// validação pura e orquestração de importação.
// ==========================================

pub mod editor;
pub mod orchestrator;
pub mod validation;

// Reexporta os motores
pub use editor::{DraftSession, EditError, EditResult};
pub use orchestrator::{
    CancelToken, ImportError, ImportOrchestrator, ImportResult, ImportSummary, TAMANHO_CHAVE,
};
pub use validation::{ValidationEngine, ValidationReport, Violation};

// ==========================================
// Motor de Pré-Nota - Camada API
// ==========================================
// Fachada de negócio consumida pela casca de UI.
// ==========================================

pub mod error;
pub mod prenota_api;

// Reexporta tipos centrais
pub use error::{ApiError, ApiResult};
pub use prenota_api::PreNotaApi;

// ==========================================
// Motor de Pré-Nota - Erros da camada API
// ==========================================
// Converte erros técnicos das camadas de baixo em erros
// de negócio com causa explícita. Violação de validação
// NÃO é exceção: viaja como valor dentro de NotaInvalida
// apenas quando o chamador tenta submeter.
// ==========================================

use crate::domain::types::{DraftMode, EditOperation};
use crate::engine::editor::EditError;
use crate::engine::orchestrator::ImportError;
use crate::engine::validation::Violation;
use crate::services::{LookupError, SubmissionError};
use thiserror::Error;

/// Erros da camada API
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== Entrada / estado do rascunho =====
    #[error("entrada inválida: {0}")]
    EntradaInvalida(String),

    /// Gate de submissão: a pré-nota ainda carrega violações.
    #[error("pré-nota inválida: {reason}")]
    NotaInvalida {
        reason: String,
        violations: Vec<Violation>,
    },

    #[error("operação {operacao:?} bloqueada no modo {modo}")]
    OperacaoBloqueada {
        modo: DraftMode,
        operacao: EditOperation,
    },

    // ===== Edição =====
    #[error(transparent)]
    Edicao(#[from] EditError),

    // ===== Importação =====
    #[error(transparent)]
    Importacao(#[from] ImportError),

    // ===== Consultas e submissão =====
    #[error("falha de consulta externa: {0}")]
    Consulta(#[from] LookupError),

    #[error(transparent)]
    Submissao(#[from] SubmissionError),

    // ===== Genérico =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias de Result da camada API
pub type ApiResult<T> = Result<T, ApiError>;

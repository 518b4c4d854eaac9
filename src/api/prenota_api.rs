// ==========================================
// Motor de Pré-Nota - API da pré-nota
// ==========================================
// Fachada consumida pela casca de UI: amarra sessão,
// validação, orquestrador e borda de submissão. Única
// obrigação dura: nunca submeter com validação não vazia.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::EngineConfig;
use crate::domain::types::{EditOperation, ImportStatus, Selection};
use crate::engine::editor::DraftSession;
use crate::engine::orchestrator::{CancelToken, ImportOrchestrator, ImportSummary};
use crate::engine::validation::{ValidationEngine, ValidationReport};
use crate::services::{
    BranchDirectory, Clock, FiscalDocumentService, IdentityProvider, Protocolo,
    SubmissionService, SupplierDirectory,
};
use std::sync::Arc;
use tracing::info;

// ==========================================
// PreNotaApi
// ==========================================
pub struct PreNotaApi {
    session: DraftSession,
    validador: ValidationEngine,
    orquestrador: ImportOrchestrator,
    fornecedores: Arc<dyn SupplierDirectory>,
    submissao: Arc<dyn SubmissionService>,
}

impl PreNotaApi {
    /// Monta a API com todos os colaboradores injetados;
    /// nenhum deles é lido de estado ambiente.
    pub fn new(
        identidade: Arc<dyn IdentityProvider>,
        relogio: Arc<dyn Clock>,
        documentos: Arc<dyn FiscalDocumentService>,
        fornecedores: Arc<dyn SupplierDirectory>,
        filiais: Arc<dyn BranchDirectory>,
        submissao: Arc<dyn SubmissionService>,
        config: EngineConfig,
    ) -> Self {
        PreNotaApi {
            session: DraftSession::new(identidade, relogio),
            validador: ValidationEngine::new(config),
            orquestrador: ImportOrchestrator::new(documentos, fornecedores.clone(), filiais),
            fornecedores,
            submissao,
        }
    }

    /// Sessão de edição (API de mutação).
    pub fn session(&self) -> &DraftSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DraftSession {
        &mut self.session
    }

    /// Recalcula a validação sobre o rascunho corrente.
    pub fn validar(&self) -> ValidationReport {
        self.validador.validar(self.session.nota())
    }

    /// Estado da máquina de importação.
    pub fn status_importacao(&self) -> ImportStatus {
        self.orquestrador.status()
    }

    /// Dispara a importação pela chave do documento fiscal.
    pub async fn importar(
        &mut self,
        chave: &str,
        cancel: &CancelToken,
    ) -> ApiResult<ImportSummary> {
        let resumo = self
            .orquestrador
            .importar(&mut self.session, chave, cancel)
            .await?;
        Ok(resumo)
    }

    /// Candidatos a fornecedor para seleção manual.
    ///
    /// Bloqueado no modo IMPORTADO (o fornecedor veio do
    /// documento; seleção livre fica desabilitada).
    pub async fn opcoes_fornecedor(&self, cnpj: &str) -> ApiResult<Selection> {
        let modo = self.session.modo();
        if !modo.permite(EditOperation::SelecionarFornecedor) {
            return Err(ApiError::OperacaoBloqueada {
                modo,
                operacao: EditOperation::SelecionarFornecedor,
            });
        }
        if cnpj.trim().is_empty() {
            return Err(ApiError::EntradaInvalida(
                "CNPJ de busca não pode ser vazio".to_string(),
            ));
        }
        let candidatos = self.fornecedores.buscar_por_cnpj(cnpj).await?;
        Ok(Selection::Multiple(
            candidatos.into_iter().map(|f| f.codigo).collect(),
        ))
    }

    /// Submete a pré-nota ao ERP.
    ///
    /// Gate: roda a validação e recusa com as violações em
    /// anexo quando a lista não está vazia. Em sucesso o
    /// rascunho é descartado (fim da sessão de edição).
    pub async fn submeter(&mut self) -> ApiResult<Protocolo> {
        let report = self.validar();
        if !report.aprovada() {
            return Err(ApiError::NotaInvalida {
                reason: format!("{} violação(ões) pendente(s)", report.violations.len()),
                violations: report.violations,
            });
        }

        let protocolo = self.submissao.submeter(self.session.nota()).await?;
        info!(
            id = %protocolo.id,
            numero = %protocolo.numero,
            "pré-nota submetida; descartando o rascunho"
        );
        self.session.reset();
        Ok(protocolo)
    }
}

// ==========================================
// Motor de Pré-Nota - Orquestrador de importação
// ==========================================
// Sequência de consultas externas a partir da chave do
// documento fiscal, com aplicação atômica no rascunho ao
// final. Política de falha assimétrica e deliberada:
//   - passo 1 (documento) falhou → importação inteira
//     falha, rascunho intocado;
//   - passos 2-3 (fornecedor/filial) falharam ou vazios →
//     segue com campos em branco (enriquecimento é
//     consultivo, o documento é o artefato primário).
// ==========================================

use crate::domain::types::ImportStatus;
use crate::engine::editor::DraftSession;
use crate::services::{
    BranchDirectory, FiscalDocumentService, Fornecedor, LookupError, SupplierDirectory,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Tamanho fixo da chave do documento fiscal.
pub const TAMANHO_CHAVE: usize = 44;

// ==========================================
// ImportError
// ==========================================
#[derive(Error, Debug)]
pub enum ImportError {
    /// Local, pré-rede; nunca dispara consulta externa.
    #[error("chave malformada: esperados {TAMANHO_CHAVE} dígitos numéricos, recebido \"{0}\"")]
    ChaveMalformada(String),

    #[error("documento fiscal não encontrado para a chave {0}")]
    DocumentoNaoEncontrado(String),

    /// Transitório; a re-tentativa fica a cargo do chamador.
    #[error("falha de rede ao consultar o documento fiscal: {0}")]
    Rede(String),

    #[error("importação cancelada antes da aplicação")]
    Cancelada,

    #[error("importação substituída por uma execução mais recente")]
    Substituida,
}

pub type ImportResult<T> = Result<T, ImportError>;

// ==========================================
// CancelToken - Sinal externo de cancelamento
// ==========================================
// Checado entre os passos; como o passo 5 é o único ponto
// de mutação, cancelar antes dele é sempre seguro e depois
// dele não tem efeito.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelar(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn cancelado(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// ==========================================
// ImportSummary - Resultado da importação
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub chave: String,             // Chave importada
    pub numero: String,            // Número do documento
    pub serie: String,             // Série
    pub qtd_itens: usize,          // Itens trazidos para o rascunho
    pub fornecedor: Option<String>, // Código do fornecedor casado (se houve)
    pub filial: Option<String>,    // Filial resolvida (se houve)
}

// ==========================================
// ImportOrchestrator
// ==========================================
pub struct ImportOrchestrator {
    documentos: Arc<dyn FiscalDocumentService>,
    fornecedores: Arc<dyn SupplierDirectory>,
    filiais: Arc<dyn BranchDirectory>,
    // Última-escrita-vence: uma chamada nova invalida o
    // desfecho da anterior antes da aplicação.
    execucao: AtomicU64,
    status: Mutex<ImportStatus>,
}

impl ImportOrchestrator {
    pub fn new(
        documentos: Arc<dyn FiscalDocumentService>,
        fornecedores: Arc<dyn SupplierDirectory>,
        filiais: Arc<dyn BranchDirectory>,
    ) -> Self {
        ImportOrchestrator {
            documentos,
            fornecedores,
            filiais,
            execucao: AtomicU64::new(0),
            status: Mutex::new(ImportStatus::Ocioso),
        }
    }

    /// Estado corrente da máquina de importação (para a UI).
    pub fn status(&self) -> ImportStatus {
        self.status
            .lock()
            .map(|s| *s)
            .unwrap_or(ImportStatus::Ocioso)
    }

    fn marcar(&self, novo: ImportStatus) {
        if let Ok(mut s) = self.status.lock() {
            *s = novo;
        }
    }

    /// Executa a importação completa para uma chave.
    ///
    /// # Passos (ordem fixa)
    /// 1. Detalhe do documento (falha dura)
    /// 2. Fornecedor pelo CNPJ do emitente (tolerante)
    /// 3. Filial pelo CNPJ do destinatário (tolerante)
    ///    — 2 e 3 são independentes e rodam em paralelo;
    ///      ambos terminam antes da aplicação
    /// 4. Usuário em vigor (local, síncrono)
    /// 5. Aplicação atômica no rascunho + modo IMPORTADO
    ///
    /// Sem cache: repetir a chave refaz as consultas e
    /// sobrescreve o rascunho com dados equivalentes.
    pub async fn importar(
        &self,
        session: &mut DraftSession,
        chave: &str,
        cancel: &CancelToken,
    ) -> ImportResult<ImportSummary> {
        // Validação local da chave, antes de qualquer rede
        if chave.len() != TAMANHO_CHAVE || !chave.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ImportError::ChaveMalformada(chave.to_string()));
        }

        let minha_execucao = self.execucao.fetch_add(1, Ordering::SeqCst) + 1;
        self.marcar(ImportStatus::Executando);

        info!(chave = %chave, "passo 1: buscando detalhe do documento fiscal");
        let documento = match self.documentos.detalhar(chave).await {
            Ok(doc) => doc,
            Err(erro) => {
                self.marcar(ImportStatus::Falhou);
                return Err(match erro {
                    LookupError::NaoEncontrado => {
                        ImportError::DocumentoNaoEncontrado(chave.to_string())
                    }
                    LookupError::Rede(msg) => ImportError::Rede(msg),
                });
            }
        };
        self.checar_cancelamento(cancel)?;

        debug!(
            cnpj_emitente = %documento.cnpj_emitente,
            cnpj_destinatario = %documento.cnpj_destinatario,
            "passos 2-3: resolvendo fornecedor e filial em paralelo"
        );
        let (resultado_fornecedor, resultado_filial) = tokio::join!(
            self.fornecedores.buscar_por_cnpj(&documento.cnpj_emitente),
            self.filiais.filial_por_cnpj(&documento.cnpj_destinatario)
        );

        // Enriquecimento é consultivo: erro ou vazio viram
        // campo em branco para correção manual.
        let fornecedor: Option<Fornecedor> = match resultado_fornecedor {
            Ok(mut candidatos) => {
                if candidatos.is_empty() {
                    None
                } else {
                    Some(candidatos.remove(0))
                }
            }
            Err(erro) => {
                warn!(erro = %erro, "busca de fornecedor falhou; seguindo sem match");
                None
            }
        };
        let filial: Option<String> = match resultado_filial {
            Ok(f) => f,
            Err(erro) => {
                warn!(erro = %erro, "resolução de filial falhou; seguindo sem filial");
                None
            }
        };
        self.checar_cancelamento(cancel)?;

        // Passo 4: identidade local (a sessão re-resolve na
        // aplicação; aqui só registramos para telemetria)
        debug!(usuario = %session.usuario_atual(), "passo 4: usuário em vigor");

        // Execução mais nova em andamento? Abandona sem
        // tocar o rascunho (última-escrita-vence).
        if self.execucao.load(Ordering::SeqCst) != minha_execucao {
            return Err(ImportError::Substituida);
        }
        self.checar_cancelamento(cancel)?;

        // Passo 5: único ponto de mutação
        session.apply_import(&documento, fornecedor.as_ref(), filial.as_deref(), chave);
        self.marcar(ImportStatus::Concluida);

        info!(
            chave = %chave,
            numero = %documento.numero,
            itens = documento.itens.len(),
            fornecedor = fornecedor.as_ref().map(|f| f.codigo.as_str()).unwrap_or(""),
            "importação aplicada ao rascunho"
        );

        Ok(ImportSummary {
            chave: chave.to_string(),
            numero: documento.numero,
            serie: documento.serie,
            qtd_itens: documento.itens.len(),
            fornecedor: fornecedor.map(|f| f.codigo),
            filial,
        })
    }

    fn checar_cancelamento(&self, cancel: &CancelToken) -> ImportResult<()> {
        if cancel.cancelado() {
            self.marcar(ImportStatus::Falhou);
            return Err(ImportError::Cancelada);
        }
        Ok(())
    }
}

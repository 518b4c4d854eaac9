// ==========================================
// Motor de Pré-Nota - Contratos de colaboradores
// ==========================================
// Interfaces consumidas pelo núcleo (ERP, diretórios,
// identidade, relógio, submissão). A implementação de
// cada colaborador fica fora deste crate; aqui importa
// apenas a forma.
// ==========================================
// Redesenho: busca sem resultado retorna coleção vazia /
// Option, nunca erro — erro fica reservado para falha de
// rede e entrada malformada.
// ==========================================

use crate::domain::draft::PreNota;
use crate::domain::types::Centavos;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinela devolvida pelo provedor de identidade quando
/// a resolução interna falha (o provedor nunca propaga erro).
pub const USUARIO_DESCONHECIDO: &str = "usuario-desconhecido";

// ==========================================
// LookupError - Erros de consulta externa
// ==========================================
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("registro não encontrado")]
    NaoEncontrado,

    #[error("falha de rede: {0}")]
    Rede(String),
}

// ==========================================
// DocumentoFiscal - Detalhe do documento (DTO)
// ==========================================
// Retorno de FiscalDocumentService::detalhar; o emitente
// vira candidato a fornecedor e o destinatário resolve a
// filial de entrada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentoFiscal {
    pub numero: String,            // Número do documento
    pub serie: String,             // Série
    pub emissao: NaiveDate,        // Data de emissão
    pub cnpj_emitente: String,     // CNPJ da contraparte (emitente)
    pub cnpj_destinatario: String, // CNPJ do destinatário (nossa filial)
    pub itens: Vec<DocumentoItem>, // Itens do documento
    pub valor_total: Centavos,     // Valor total declarado
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentoItem {
    pub produto: String,          // Código do produto
    pub quantidade: f64,          // Quantidade
    pub valor_unitario: Centavos, // Valor unitário
    pub total: Centavos,          // Total do item
}

// ==========================================
// Fornecedor - Candidato do diretório (DTO)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fornecedor {
    pub codigo: String, // Código no ERP
    pub loja: String,   // Loja
    pub nome: String,   // Razão social
    pub cnpj: String,   // CNPJ
}

// ==========================================
// FiscalDocumentService - Detalhe de documento
// ==========================================
#[async_trait]
pub trait FiscalDocumentService: Send + Sync {
    /// Busca o detalhe do documento fiscal pela chave.
    ///
    /// # Parâmetros
    /// - chave: chave de 44 dígitos (já validada pelo orquestrador)
    ///
    /// # Retorno
    /// - Ok(DocumentoFiscal): documento resolvido
    /// - Err(LookupError::NaoEncontrado | Rede): falha dura
    async fn detalhar(&self, chave: &str) -> Result<DocumentoFiscal, LookupError>;
}

// ==========================================
// SupplierDirectory - Diretório de fornecedores
// ==========================================
#[async_trait]
pub trait SupplierDirectory: Send + Sync {
    /// Candidatos a fornecedor pelo CNPJ da contraparte.
    ///
    /// # Retorno
    /// - Ok(vec![]): ausência de match é resultado normal
    /// - Err(LookupError::Rede): única falha possível
    async fn buscar_por_cnpj(&self, cnpj: &str) -> Result<Vec<Fornecedor>, LookupError>;
}

// ==========================================
// BranchDirectory - Diretório de filiais
// ==========================================
#[async_trait]
pub trait BranchDirectory: Send + Sync {
    /// Código da filial cujo CNPJ cadastrado bate com o
    /// destinatário do documento.
    ///
    /// # Retorno
    /// - Ok(None): ausência tolerada, não é erro
    async fn filial_por_cnpj(&self, cnpj: &str) -> Result<Option<String>, LookupError>;
}

// ==========================================
// IdentityProvider - Identidade do usuário
// ==========================================
// Local e síncrono; nunca falha (sentinela em caso de
// erro interno). Injetado na sessão para que o reset
// re-resolva o usuário no momento da chamada — capturar
// o valor uma única vez na construção já causou rascunho
// com usuário obsoleto.
pub trait IdentityProvider: Send + Sync {
    fn usuario_atual(&self) -> String;
}

// ==========================================
// Clock - Relógio injetado
// ==========================================
pub trait Clock: Send + Sync {
    fn hoje(&self) -> NaiveDate;
}

/// Relógio de produção (data local).
pub struct SystemClock;

impl Clock for SystemClock {
    fn hoje(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

// ==========================================
// SubmissionService - Borda de submissão
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocolo {
    pub id: String,     // Id interno do lançamento
    pub numero: String, // Número atribuído pelo ERP
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("pré-nota rejeitada pelo ERP: {motivo}")]
    Rejeitada { motivo: String },

    #[error("falha de rede: {0}")]
    Rede(String),
}

#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Submete a pré-nota ao ERP.
    ///
    /// A obrigação deste núcleo é garantir que a validação
    /// esteja vazia antes desta chamada (gate na PreNotaApi).
    async fn submeter(&self, nota: &PreNota) -> Result<Protocolo, SubmissionError>;
}

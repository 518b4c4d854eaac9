// ==========================================
// Motor de Pré-Nota - Agregado do rascunho
// ==========================================
// Uma pré-nota viva por sessão de edição: cabeçalho +
// itens + parcelas + rateios + anexos. Contêiner de
// dados puro; toda mutação passa pelo DraftSession.
// ==========================================

use crate::domain::types::{Centavos, Percentual, Prioridade};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largura do número sequencial de item ("0001", "0002", ...).
pub const LARGURA_SEQ_ITEM: usize = 4;

/// Formata um sequencial de item com zeros à esquerda.
pub fn formatar_seq(n: usize) -> String {
    format!("{:0largura$}", n, largura = LARGURA_SEQ_ITEM)
}

// ==========================================
// Header - Cabeçalho da pré-nota
// ==========================================
// Posse exclusiva do agregado; mutado apenas via
// DraftSession::set_header (merge raso de patch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub filial: String,                // Código da filial de entrada
    pub numero: String,                // Número do documento
    pub serie: String,                 // Série do documento
    pub fornecedor: String,            // Código do fornecedor (vazio = não resolvido)
    pub loja: String,                  // Loja do fornecedor
    pub condicao: String,              // Condição financeira (gera as parcelas)
    pub tipo: String,                  // Tipo do documento
    pub prioridade: Prioridade,        // Prioridade de lançamento
    pub justificativa: String,         // Texto livre
    pub usuario: String,               // Usuário que está digitando
    pub data_inclusao: NaiveDate,      // Data de inclusão do rascunho
    pub chave_nfe: Option<String>,     // Chave do documento fiscal (44 dígitos, se importado)
}

// ==========================================
// Item - Item da pré-nota
// ==========================================
// O total vem informado separadamente (digitação ou
// documento fiscal) e deve bater com quantidade ×
// valor unitário dentro da tolerância configurada; a
// checagem fica no motor de validação, não aqui.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub seq: String,                   // Sequencial zero-padded ("0001")
    pub produto: String,               // Código do produto
    pub quantidade: f64,               // Quantidade (unidade comercial)
    pub valor_unitario: Centavos,      // Valor unitário
    pub total: Centavos,               // Total informado do item
    pub pedido: Option<PedidoVinculo>, // Amarração com pedido de compra
}

// ==========================================
// PedidoVinculo - Amarração item × pedido
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedidoVinculo {
    pub numero_pedido: String, // Número do pedido de compra
    pub item_pedido: String,   // Item do pedido
}

// ==========================================
// Parcela - Parcela de pagamento
// ==========================================
// Sempre recalculadas em conjunto (troca de condição ou
// de valor total); por isso só existe substituição
// integral, nunca patch parcial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcela {
    pub numero: String,        // Identificador da parcela ("001", "002", ...)
    pub vencimento: NaiveDate, // Data de vencimento
    pub valor: Centavos,       // Valor da parcela
}

// ==========================================
// Rateio - Rateio por centro de custo
// ==========================================
// Endereçado por id gerado no cliente, não por posição:
// linhas podem ser removidas/reordenadas de forma
// independente do índice no vetor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rateio {
    pub id: Uuid,                // Id da linha (gerado no cliente)
    pub filial: String,          // Filial de destino
    pub centro_custo: String,    // Centro de custo
    pub valor: Centavos,         // Valor rateado
    pub percentual: Percentual,  // Percentual sobre o total do rascunho
}

// ==========================================
// Anexo - Anexo do rascunho
// ==========================================
// Puramente aditivo; sem invariante numérico.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anexo {
    pub seq: u32,                  // Sequencial do anexo
    pub arquivo: String,           // Nome do arquivo
    pub descricao: Option<String>, // Descrição opcional
}

// ==========================================
// PreNota - Agregado raiz
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreNota {
    pub header: Header,
    pub itens: Vec<Item>,
    pub parcelas: Vec<Parcela>,
    pub rateios: Vec<Rateio>,
    pub anexos: Vec<Anexo>,
}

impl PreNota {
    /// Rascunho vazio com defaults do cabeçalho.
    ///
    /// Determinístico: usuário e data entram por parâmetro
    /// (identidade e relógio são injetados na sessão, nunca
    /// lidos de estado ambiente).
    pub fn nova(usuario: &str, data_inclusao: NaiveDate) -> Self {
        PreNota {
            header: Header {
                filial: String::new(),
                numero: String::new(),
                serie: String::new(),
                fornecedor: String::new(),
                loja: String::new(),
                condicao: String::new(),
                tipo: String::new(),
                prioridade: Prioridade::Media,
                justificativa: String::new(),
                usuario: usuario.to_string(),
                data_inclusao,
                chave_nfe: None,
            },
            itens: Vec::new(),
            parcelas: Vec::new(),
            rateios: Vec::new(),
            anexos: Vec::new(),
        }
    }

    /// Soma dos totais informados dos itens.
    pub fn soma_itens(&self) -> Centavos {
        self.itens.iter().map(|i| i.total).sum()
    }

    /// Soma dos valores das parcelas.
    pub fn soma_parcelas(&self) -> Centavos {
        self.parcelas.iter().map(|p| p.valor).sum()
    }

    /// Soma dos percentuais de rateio (nível do rascunho).
    pub fn soma_percentual_rateio(&self) -> Percentual {
        self.rateios.iter().map(|r| r.percentual).sum()
    }
}

// ==========================================
// HeaderPatch - Patch raso do cabeçalho
// ==========================================
// Só os campos presentes são aplicados; quais campos o
// usuário pode editar é decisão do controlador de modo
// na camada de cima, não daqui.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderPatch {
    #[serde(default)]
    pub filial: Option<String>,
    #[serde(default)]
    pub numero: Option<String>,
    #[serde(default)]
    pub serie: Option<String>,
    #[serde(default)]
    pub fornecedor: Option<String>,
    #[serde(default)]
    pub loja: Option<String>,
    #[serde(default)]
    pub condicao: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub prioridade: Option<Prioridade>,
    #[serde(default)]
    pub justificativa: Option<String>,
    #[serde(default)]
    pub chave_nfe: Option<Option<String>>,
}

impl HeaderPatch {
    /// Merge raso sobre o cabeçalho alvo.
    pub fn aplicar(self, header: &mut Header) {
        if let Some(v) = self.filial {
            header.filial = v;
        }
        if let Some(v) = self.numero {
            header.numero = v;
        }
        if let Some(v) = self.serie {
            header.serie = v;
        }
        if let Some(v) = self.fornecedor {
            header.fornecedor = v;
        }
        if let Some(v) = self.loja {
            header.loja = v;
        }
        if let Some(v) = self.condicao {
            header.condicao = v;
        }
        if let Some(v) = self.tipo {
            header.tipo = v;
        }
        if let Some(v) = self.prioridade {
            header.prioridade = v;
        }
        if let Some(v) = self.justificativa {
            header.justificativa = v;
        }
        if let Some(v) = self.chave_nfe {
            header.chave_nfe = v;
        }
    }
}

// ==========================================
// NovoItem - Entrada para add_item
// ==========================================
// O sequencial é atribuído pela sessão (próximo número
// zero-padded), por isso não aparece aqui.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovoItem {
    pub produto: String,
    pub quantidade: f64,
    pub valor_unitario: Centavos,
    pub total: Centavos,
    #[serde(default)]
    pub pedido: Option<PedidoVinculo>,
}

// ==========================================
// ItemPatch - Patch de item por posição
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub produto: Option<String>,
    #[serde(default)]
    pub quantidade: Option<f64>,
    #[serde(default)]
    pub valor_unitario: Option<Centavos>,
    #[serde(default)]
    pub total: Option<Centavos>,
    #[serde(default)]
    pub pedido: Option<Option<PedidoVinculo>>,
}

impl ItemPatch {
    pub fn aplicar(self, item: &mut Item) {
        if let Some(v) = self.produto {
            item.produto = v;
        }
        if let Some(v) = self.quantidade {
            item.quantidade = v;
        }
        if let Some(v) = self.valor_unitario {
            item.valor_unitario = v;
        }
        if let Some(v) = self.total {
            item.total = v;
        }
        if let Some(v) = self.pedido {
            item.pedido = v;
        }
    }
}

// ==========================================
// NovoRateio / RateioPatch
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovoRateio {
    pub filial: String,
    pub centro_custo: String,
    pub valor: Centavos,
    pub percentual: Percentual,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateioPatch {
    #[serde(default)]
    pub filial: Option<String>,
    #[serde(default)]
    pub centro_custo: Option<String>,
    #[serde(default)]
    pub valor: Option<Centavos>,
    #[serde(default)]
    pub percentual: Option<Percentual>,
}

impl RateioPatch {
    pub fn aplicar(self, rateio: &mut Rateio) {
        if let Some(v) = self.filial {
            rateio.filial = v;
        }
        if let Some(v) = self.centro_custo {
            rateio.centro_custo = v;
        }
        if let Some(v) = self.valor {
            rateio.valor = v;
        }
        if let Some(v) = self.percentual {
            rateio.percentual = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nova_e_deterministica() {
        let hoje = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(PreNota::nova("ana.souza", hoje), PreNota::nova("ana.souza", hoje));
    }

    #[test]
    fn test_formatar_seq() {
        assert_eq!(formatar_seq(1), "0001");
        assert_eq!(formatar_seq(42), "0042");
    }

    #[test]
    fn test_patch_raso_nao_toca_campos_ausentes() {
        let hoje = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let mut nota = PreNota::nova("ana.souza", hoje);
        nota.header.filial = "0101".to_string();

        HeaderPatch {
            numero: Some("000123".to_string()),
            ..Default::default()
        }
        .aplicar(&mut nota.header);

        assert_eq!(nota.header.numero, "000123");
        assert_eq!(nota.header.filial, "0101");
        assert_eq!(nota.header.usuario, "ana.souza");
    }
}

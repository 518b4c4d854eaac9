// ==========================================
// Motor de Pré-Nota - Itens de pedido de compra
// ==========================================
// Editor irmão do editor de itens da pré-nota. Atenção:
// os dois divergem de propósito na remoção — aqui os
// códigos de item SÃO renumerados após remover; na
// pré-nota a numeração original é preservada e o buraco
// aparece na validação. Comportamento confirmado com o
// dono do sistema e fixado em teste.
// ==========================================

use crate::domain::draft::formatar_seq;
use crate::domain::types::Centavos;
use serde::{Deserialize, Serialize};

// ==========================================
// PedidoItem - Item do pedido
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PedidoItem {
    pub codigo: String,           // Código sequencial do item ("0001")
    pub produto: String,          // Código do produto
    pub quantidade: f64,          // Quantidade pedida
    pub valor_unitario: Centavos, // Valor unitário negociado
}

// ==========================================
// PedidoItens - Lista de itens do pedido
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PedidoItens {
    itens: Vec<PedidoItem>,
}

impl PedidoItens {
    pub fn novo() -> Self {
        Self::default()
    }

    pub fn itens(&self) -> &[PedidoItem] {
        &self.itens
    }

    /// Acrescenta um item com o próximo código sequencial.
    pub fn adicionar(&mut self, produto: &str, quantidade: f64, valor_unitario: Centavos) -> String {
        let codigo = formatar_seq(self.itens.len() + 1);
        self.itens.push(PedidoItem {
            codigo: codigo.clone(),
            produto: produto.to_string(),
            quantidade,
            valor_unitario,
        });
        codigo
    }

    /// Remove por posição e renumera os códigos restantes
    /// para manter a sequência contígua.
    pub fn remover(&mut self, indice: usize) -> Option<PedidoItem> {
        if indice >= self.itens.len() {
            return None;
        }
        let removido = self.itens.remove(indice);
        for (pos, item) in self.itens.iter_mut().enumerate() {
            item.codigo = formatar_seq(pos + 1);
        }
        Some(removido)
    }
}

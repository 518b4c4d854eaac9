// ==========================================
// Motor de Pré-Nota - Sessão de edição (API de mutação)
// ==========================================
// Único caminho sancionado para alterar o rascunho.
// Guarda a pré-nota viva + o modo corrente; nenhuma
// chamada de rede nasce aqui. Totais derivados não são
// armazenados em redundância (drift) — soma é assunto do
// motor de validação.
// ==========================================

use crate::domain::draft::{
    formatar_seq, Anexo, HeaderPatch, Item, ItemPatch, NovoItem, NovoRateio, Parcela, PreNota,
    Rateio, RateioPatch,
};
use crate::domain::types::DraftMode;
use crate::services::{Clock, DocumentoFiscal, Fornecedor, IdentityProvider};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

// ==========================================
// EditError - Erros de endereçamento
// ==========================================
// Toda mutação é total sobre entrada válida; só o
// endereçamento (índice/id inexistente) produz erro.
#[derive(Error, Debug)]
pub enum EditError {
    #[error("item fora do intervalo: índice {indice}, rascunho com {tamanho} itens")]
    ItemForaDoIntervalo { indice: usize, tamanho: usize },

    #[error("linha de rateio desconhecida: {0}")]
    RateioDesconhecido(Uuid),

    #[error("anexo desconhecido: seq {0}")]
    AnexoDesconhecido(u32),
}

pub type EditResult<T> = Result<T, EditError>;

// ==========================================
// DraftSession - Sessão de edição
// ==========================================
// Identidade e relógio são injetados (nada de getter
// global): o reset re-resolve o usuário no momento da
// chamada, porque a sessão pode sobreviver à troca de
// identidade.
pub struct DraftSession {
    identidade: Arc<dyn IdentityProvider>,
    relogio: Arc<dyn Clock>,
    nota: PreNota,
    modo: DraftMode,
}

impl DraftSession {
    /// Abre a sessão com um rascunho vazio em modo MANUAL.
    pub fn new(identidade: Arc<dyn IdentityProvider>, relogio: Arc<dyn Clock>) -> Self {
        let nota = PreNota::nova(&identidade.usuario_atual(), relogio.hoje());
        DraftSession {
            identidade,
            relogio,
            nota,
            modo: DraftMode::Manual,
        }
    }

    pub fn nota(&self) -> &PreNota {
        &self.nota
    }

    pub fn modo(&self) -> DraftMode {
        self.modo
    }

    /// Usuário em vigor (resolvido agora, não na abertura).
    pub fn usuario_atual(&self) -> String {
        self.identidade.usuario_atual()
    }

    // ==========================================
    // Cabeçalho
    // ==========================================

    /// Merge raso no cabeçalho. Sem restrição de campos:
    /// o que é editável em cada modo é decisão da camada
    /// de cima (consulta DraftMode::permite).
    pub fn set_header(&mut self, patch: HeaderPatch) {
        patch.aplicar(&mut self.nota.header);
    }

    // ==========================================
    // Itens (endereçados por posição)
    // ==========================================

    pub fn set_itens(&mut self, itens: Vec<Item>) {
        self.nota.itens = itens;
    }

    /// Acrescenta um item com o próximo sequencial livre.
    ///
    /// O próximo sequencial é max(seq) + 1, não len + 1:
    /// depois de uma remoção a lista pode ter buraco e
    /// len + 1 colidiria com um sequencial existente.
    pub fn add_item(&mut self, novo: NovoItem) -> String {
        let proximo = self
            .nota
            .itens
            .iter()
            .filter_map(|i| i.seq.parse::<usize>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let seq = formatar_seq(proximo);
        self.nota.itens.push(Item {
            seq: seq.clone(),
            produto: novo.produto,
            quantidade: novo.quantidade,
            valor_unitario: novo.valor_unitario,
            total: novo.total,
            pedido: novo.pedido,
        });
        seq
    }

    pub fn update_item(&mut self, indice: usize, patch: ItemPatch) -> EditResult<()> {
        let tamanho = self.nota.itens.len();
        let item = self
            .nota
            .itens
            .get_mut(indice)
            .ok_or(EditError::ItemForaDoIntervalo { indice, tamanho })?;
        patch.aplicar(item);
        Ok(())
    }

    /// Remove por posição SEM renumerar os sequenciais
    /// restantes (diferente do editor de pedido, que
    /// renumera). O buraco resultante é apontado pela
    /// validação até o usuário ajustar.
    pub fn remove_item(&mut self, indice: usize) -> EditResult<Item> {
        let tamanho = self.nota.itens.len();
        if indice >= tamanho {
            return Err(EditError::ItemForaDoIntervalo { indice, tamanho });
        }
        Ok(self.nota.itens.remove(indice))
    }

    // ==========================================
    // Parcelas (substituição integral)
    // ==========================================

    /// Parcelas são sempre recalculadas em conjunto
    /// (mudança de condição/valor); não há patch parcial.
    pub fn set_parcelas(&mut self, parcelas: Vec<Parcela>) {
        self.nota.parcelas = parcelas;
    }

    // ==========================================
    // Rateios (endereçados por id)
    // ==========================================

    pub fn add_rateio(&mut self, novo: NovoRateio) -> Uuid {
        let id = Uuid::new_v4();
        self.nota.rateios.push(Rateio {
            id,
            filial: novo.filial,
            centro_custo: novo.centro_custo,
            valor: novo.valor,
            percentual: novo.percentual,
        });
        id
    }

    pub fn update_rateio(&mut self, id: Uuid, patch: RateioPatch) -> EditResult<()> {
        let rateio = self
            .nota
            .rateios
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(EditError::RateioDesconhecido(id))?;
        patch.aplicar(rateio);
        Ok(())
    }

    pub fn remove_rateio(&mut self, id: Uuid) -> EditResult<Rateio> {
        let pos = self
            .nota
            .rateios
            .iter()
            .position(|r| r.id == id)
            .ok_or(EditError::RateioDesconhecido(id))?;
        Ok(self.nota.rateios.remove(pos))
    }

    // ==========================================
    // Anexos
    // ==========================================

    pub fn add_anexo(&mut self, arquivo: &str, descricao: Option<String>) -> u32 {
        let seq = self.nota.anexos.iter().map(|a| a.seq).max().unwrap_or(0) + 1;
        self.nota.anexos.push(Anexo {
            seq,
            arquivo: arquivo.to_string(),
            descricao,
        });
        seq
    }

    pub fn remove_anexo(&mut self, seq: u32) -> EditResult<Anexo> {
        let pos = self
            .nota
            .anexos
            .iter()
            .position(|a| a.seq == seq)
            .ok_or(EditError::AnexoDesconhecido(seq))?;
        Ok(self.nota.anexos.remove(pos))
    }

    pub fn clear_anexos(&mut self) {
        self.nota.anexos.clear();
    }

    // ==========================================
    // Modo e ciclo de vida
    // ==========================================

    /// Troca de modo. Voltar para MANUAL limpa cabeçalho e
    /// itens (re-resolvendo o usuário); parcelas, rateios e
    /// anexos são digitação do usuário em qualquer modo e
    /// sobrevivem à troca.
    pub fn set_modo(&mut self, modo: DraftMode) {
        match modo {
            DraftMode::Manual => {
                let limpa =
                    PreNota::nova(&self.identidade.usuario_atual(), self.relogio.hoje());
                self.nota.header = limpa.header;
                self.nota.itens.clear();
                self.modo = DraftMode::Manual;
            }
            DraftMode::Importado => {
                self.modo = DraftMode::Importado;
            }
        }
    }

    /// Descarta tudo e volta ao rascunho vazio.
    ///
    /// Idempotente; o usuário é re-resolvido a cada chamada
    /// (nunca reaproveita o valor capturado na abertura).
    pub fn reset(&mut self) {
        self.nota = PreNota::nova(&self.identidade.usuario_atual(), self.relogio.hoje());
        self.modo = DraftMode::Manual;
    }

    // ==========================================
    // Ponto único de aplicação da importação
    // ==========================================

    /// Substitui cabeçalho + itens a partir do documento
    /// fiscal e marca o modo IMPORTADO, em uma única
    /// mutação (o orquestrador não toca o rascunho antes
    /// deste ponto). Fornecedor/filial ausentes entram em
    /// branco para correção manual; parcelas, rateios e
    /// anexos não são tocados.
    pub fn apply_import(
        &mut self,
        documento: &DocumentoFiscal,
        fornecedor: Option<&Fornecedor>,
        filial: Option<&str>,
        chave: &str,
    ) {
        debug!(
            numero = %documento.numero,
            serie = %documento.serie,
            itens = documento.itens.len(),
            "aplicando importação no rascunho"
        );

        let header = &mut self.nota.header;
        header.numero = documento.numero.clone();
        header.serie = documento.serie.clone();
        header.chave_nfe = Some(chave.to_string());
        header.usuario = self.identidade.usuario_atual();
        match fornecedor {
            Some(f) => {
                header.fornecedor = f.codigo.clone();
                header.loja = f.loja.clone();
            }
            None => {
                header.fornecedor.clear();
                header.loja.clear();
            }
        }
        header.filial = filial.unwrap_or_default().to_string();

        self.nota.itens = documento
            .itens
            .iter()
            .enumerate()
            .map(|(pos, item)| Item {
                seq: formatar_seq(pos + 1),
                produto: item.produto.clone(),
                quantidade: item.quantidade,
                valor_unitario: item.valor_unitario,
                total: item.total,
                pedido: None,
            })
            .collect();

        self.modo = DraftMode::Importado;
    }
}

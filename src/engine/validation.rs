// ==========================================
// Motor de Pré-Nota - Motor de validação
// ==========================================
// Função pura sobre o rascunho corrente: devolve a lista
// de violações, nunca falha. Rascunho inválido é estado
// normal e representável, não exceção.
// ==========================================
// Ordem das violações = ordem de declaração das entidades
// (header, itens, parcelas, rateios, anexos): problema
// estrutural aparece primeiro na UI. Violação cruzada
// entra no balde da entidade dona (parcelas/rateios),
// nunca no fim do relatório.
// ==========================================

use crate::config::EngineConfig;
use crate::domain::draft::{PreNota, LARGURA_SEQ_ITEM};
use crate::domain::types::{Centavos, Percentual};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// Violation / ValidationReport
// ==========================================

/// Violação apontando o caminho do campo/coleção e a
/// mensagem exibível.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

/// Resultado da validação; lista vazia ⇒ submetível.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn aprovada(&self) -> bool {
        self.violations.is_empty()
    }
}

// ==========================================
// ValidationEngine
// ==========================================

pub struct ValidationEngine {
    config: EngineConfig,
}

impl ValidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        ValidationEngine { config }
    }

    /// Valida o rascunho inteiro de uma vez (a submissão é
    /// tudo-ou-nada; não existe validação parcial).
    ///
    /// Checagens cruzadas só rodam quando as entidades
    /// envolvidas passaram nas checagens de campo — evita
    /// ruído em cascata sobre dados já apontados.
    pub fn validar(&self, nota: &PreNota) -> ValidationReport {
        // Um balde por entidade: a concatenação final dita a
        // ordem do relatório, não a ordem de execução das
        // checagens.
        let mut de_header = Vec::new();
        let mut de_itens = Vec::new();
        let mut de_parcelas = Vec::new();
        let mut de_rateios = Vec::new();
        let mut de_anexos = Vec::new();

        self.checar_header(nota, &mut de_header);
        let itens_ok = self.checar_itens(nota, &mut de_itens);
        let parcelas_ok = self.checar_parcelas(nota, &mut de_parcelas);
        let rateios_ok = self.checar_rateios(nota, &mut de_rateios);
        self.checar_anexos(nota, &mut de_anexos);

        // ===== Cruzada: itens × parcelas =====
        // Entra no balde de parcelas (entidade apontada).
        if itens_ok && parcelas_ok && !nota.itens.is_empty() {
            let soma_itens = nota.soma_itens();
            let soma_parcelas = nota.soma_parcelas();
            if soma_itens != soma_parcelas {
                de_parcelas.push(Violation {
                    path: "parcelas".to_string(),
                    message: format!(
                        "soma das parcelas ({}) difere da soma dos itens ({})",
                        soma_parcelas, soma_itens
                    ),
                });
            }
        }

        // ===== Cruzada: fechamento do rateio em 100% =====
        // Nível do rascunho; vacuosa quando não há rateio
        // (rateio é opcional salvo configuração contrária).
        if rateios_ok && !nota.rateios.is_empty() {
            let soma = nota.soma_percentual_rateio();
            if soma != Percentual::CEM {
                let delta = if soma < Percentual::CEM {
                    format!(
                        "faltam {:.2} pontos para fechar 100%",
                        (Percentual::CEM - soma).em_pontos()
                    )
                } else {
                    format!(
                        "excedem {:.2} pontos acima de 100%",
                        (soma - Percentual::CEM).em_pontos()
                    )
                };
                de_rateios.push(Violation {
                    path: "rateios".to_string(),
                    message: format!("soma dos percentuais de rateio é {}; {}", soma, delta),
                });
            }
        }

        let mut violations = de_header;
        violations.extend(de_itens);
        violations.extend(de_parcelas);
        violations.extend(de_rateios);
        violations.extend(de_anexos);
        ValidationReport { violations }
    }

    // ==========================================
    // Checagens de campo por entidade
    // ==========================================

    fn checar_header(&self, nota: &PreNota, violations: &mut Vec<Violation>) {
        let header = &nota.header;
        let obrigatorios = [
            ("header.filial", header.filial.as_str(), "filial"),
            ("header.numero", header.numero.as_str(), "número do documento"),
            ("header.fornecedor", header.fornecedor.as_str(), "fornecedor"),
            ("header.loja", header.loja.as_str(), "loja do fornecedor"),
            ("header.condicao", header.condicao.as_str(), "condição financeira"),
            ("header.tipo", header.tipo.as_str(), "tipo do documento"),
        ];
        for (path, valor, rotulo) in obrigatorios {
            if valor.trim().is_empty() {
                violations.push(Violation {
                    path: path.to_string(),
                    message: format!("{} é obrigatório", rotulo),
                });
            }
        }
    }

    fn checar_itens(&self, nota: &PreNota, violations: &mut Vec<Violation>) -> bool {
        let antes = violations.len();

        if nota.itens.is_empty() {
            violations.push(Violation {
                path: "itens".to_string(),
                message: "o rascunho precisa de ao menos um item".to_string(),
            });
            return false;
        }

        let mut vistos: HashSet<&str> = HashSet::new();
        let mut numeros: Vec<usize> = Vec::with_capacity(nota.itens.len());

        for (pos, item) in nota.itens.iter().enumerate() {
            let path = |campo: &str| format!("itens[{}].{}", pos, campo);

            match item.seq.parse::<usize>() {
                Ok(n) if item.seq.len() == LARGURA_SEQ_ITEM && n > 0 => numeros.push(n),
                _ => violations.push(Violation {
                    path: path("seq"),
                    message: format!(
                        "sequencial \"{}\" inválido (esperado número com {} dígitos)",
                        item.seq, LARGURA_SEQ_ITEM
                    ),
                }),
            }
            if !vistos.insert(item.seq.as_str()) {
                violations.push(Violation {
                    path: path("seq"),
                    message: format!("sequencial \"{}\" duplicado", item.seq),
                });
            }
            if item.produto.trim().is_empty() {
                violations.push(Violation {
                    path: path("produto"),
                    message: "produto é obrigatório".to_string(),
                });
            }
            if item.quantidade <= 0.0 {
                violations.push(Violation {
                    path: path("quantidade"),
                    message: "quantidade deve ser positiva".to_string(),
                });
            }
            if !item.valor_unitario.positivo() {
                violations.push(Violation {
                    path: path("valor_unitario"),
                    message: "valor unitário deve ser positivo".to_string(),
                });
            }

            // Total informado × total calculado, em centavos
            let calculado = Centavos((item.quantidade * item.valor_unitario.0 as f64).round() as i64);
            if item.total.diferenca_abs(calculado) > self.config.tolerancia_total_item {
                violations.push(Violation {
                    path: path("total"),
                    message: format!(
                        "total informado ({}) difere do calculado ({}) além da tolerância",
                        item.total, calculado
                    ),
                });
            }
        }

        // Contiguidade: sequenciais formam exatamente 1..=n.
        // Uma remoção no meio deixa buraco e cai aqui até o
        // usuário renumerar (o editor de pré-nota não
        // renumera sozinho).
        if numeros.len() == nota.itens.len() {
            let mut ordenados = numeros.clone();
            ordenados.sort_unstable();
            let contiguos = ordenados.iter().enumerate().all(|(i, &n)| n == i + 1);
            if !contiguos {
                violations.push(Violation {
                    path: "itens".to_string(),
                    message: "sequenciais dos itens não são contíguos a partir de 0001".to_string(),
                });
            }
        }

        violations.len() == antes
    }

    fn checar_parcelas(&self, nota: &PreNota, violations: &mut Vec<Violation>) -> bool {
        let antes = violations.len();
        for (pos, parcela) in nota.parcelas.iter().enumerate() {
            if parcela.numero.trim().is_empty() {
                violations.push(Violation {
                    path: format!("parcelas[{}].numero", pos),
                    message: "número da parcela é obrigatório".to_string(),
                });
            }
            if !parcela.valor.positivo() {
                violations.push(Violation {
                    path: format!("parcelas[{}].valor", pos),
                    message: "valor da parcela deve ser positivo".to_string(),
                });
            }
        }
        violations.len() == antes
    }

    fn checar_rateios(&self, nota: &PreNota, violations: &mut Vec<Violation>) -> bool {
        let antes = violations.len();

        if nota.rateios.is_empty() && self.config.exigir_rateio {
            violations.push(Violation {
                path: "rateios".to_string(),
                message: "a instalação exige ao menos uma linha de rateio".to_string(),
            });
            return false;
        }

        for (pos, rateio) in nota.rateios.iter().enumerate() {
            if rateio.filial.trim().is_empty() {
                violations.push(Violation {
                    path: format!("rateios[{}].filial", pos),
                    message: "filial do rateio é obrigatória".to_string(),
                });
            }
            if rateio.centro_custo.trim().is_empty() {
                violations.push(Violation {
                    path: format!("rateios[{}].centro_custo", pos),
                    message: "centro de custo é obrigatório".to_string(),
                });
            }
            if !rateio.percentual.positivo() {
                violations.push(Violation {
                    path: format!("rateios[{}].percentual", pos),
                    message: "percentual deve ser positivo".to_string(),
                });
            }
        }
        violations.len() == antes
    }

    fn checar_anexos(&self, nota: &PreNota, violations: &mut Vec<Violation>) {
        for (pos, anexo) in nota.anexos.iter().enumerate() {
            if anexo.arquivo.trim().is_empty() {
                violations.push(Violation {
                    path: format!("anexos[{}].arquivo", pos),
                    message: "nome do arquivo é obrigatório".to_string(),
                });
            }
        }
    }
}

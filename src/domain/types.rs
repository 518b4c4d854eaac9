// ==========================================
// Motor de Pré-Nota - Tipos do domínio
// ==========================================
// Valores monetários e percentuais em unidades
// inteiras mínimas (centavos / centésimos de ponto)
// para que os invariantes de soma sejam exatos.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

// ==========================================
// DraftMode - Modo do rascunho
// ==========================================
// Ciclo de vida: nasce MANUAL; passa a IMPORTADO apenas
// por uma importação bem-sucedida; volta a MANUAL por
// ação explícita do usuário (limpa cabeçalho/itens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftMode {
    Manual,    // Digitação direta
    Importado, // Cabeçalho/itens vindos de documento fiscal
}

impl fmt::Display for DraftMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftMode::Manual => write!(f, "MANUAL"),
            DraftMode::Importado => write!(f, "IMPORTADO"),
        }
    }
}

// ==========================================
// EditOperation - Operações sujeitas a modo
// ==========================================
// O controlador de modo só responde consultas; a API de
// mutação em si não é bloqueada aqui (a camada de UI/API
// decide o que oferecer ao usuário).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditOperation {
    EditarCabecalho,
    SelecionarFornecedor, // Busca livre de fornecedor
    EditarItens,
    EditarParcelas,
    EditarRateios,
    EditarAnexos,
}

impl DraftMode {
    /// Consulta de permissão por operação.
    ///
    /// No modo IMPORTADO o fornecedor veio do documento
    /// fiscal e a seleção livre fica desabilitada.
    pub fn permite(&self, op: EditOperation) -> bool {
        match self {
            DraftMode::Manual => true,
            DraftMode::Importado => !matches!(op, EditOperation::SelecionarFornecedor),
        }
    }
}

// ==========================================
// Prioridade - Prioridade do documento
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Prioridade {
    Alta,
    Media,
    Baixa,
}

impl fmt::Display for Prioridade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prioridade::Alta => write!(f, "ALTA"),
            Prioridade::Media => write!(f, "MEDIA"),
            Prioridade::Baixa => write!(f, "BAIXA"),
        }
    }
}

// ==========================================
// ImportStatus - Estado da importação
// ==========================================
// Máquina de estados do orquestrador: um estado em voo
// (EXECUTANDO) e dois terminais (CONCLUIDA / FALHOU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    Ocioso,     // Nenhuma execução ainda
    Executando, // Em voo
    Concluida,  // Terminal: rascunho substituído
    Falhou,     // Terminal: rascunho intocado
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Ocioso => write!(f, "OCIOSO"),
            ImportStatus::Executando => write!(f, "EXECUTANDO"),
            ImportStatus::Concluida => write!(f, "CONCLUIDA"),
            ImportStatus::Falhou => write!(f, "FALHOU"),
        }
    }
}

// ==========================================
// Centavos - Valor monetário em unidade mínima
// ==========================================
// Invariantes de soma comparam i64, nunca f64; a
// conversão para reais só existe na borda de exibição.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Centavos(pub i64);

impl Centavos {
    pub const ZERO: Centavos = Centavos(0);

    /// Converte de reais (borda de entrada; arredonda ao centavo).
    pub fn de_reais(valor: f64) -> Self {
        Centavos((valor * 100.0).round() as i64)
    }

    /// Converte para reais (borda de exibição).
    pub fn em_reais(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Diferença absoluta em centavos.
    pub fn diferenca_abs(&self, outro: Centavos) -> i64 {
        (self.0 - outro.0).abs()
    }

    pub fn positivo(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Centavos {
    type Output = Centavos;
    fn add(self, rhs: Centavos) -> Centavos {
        Centavos(self.0 + rhs.0)
    }
}

impl AddAssign for Centavos {
    fn add_assign(&mut self, rhs: Centavos) {
        self.0 += rhs.0;
    }
}

impl Sub for Centavos {
    type Output = Centavos;
    fn sub(self, rhs: Centavos) -> Centavos {
        Centavos(self.0 - rhs.0)
    }
}

impl Sum for Centavos {
    fn sum<I: Iterator<Item = Centavos>>(iter: I) -> Centavos {
        iter.fold(Centavos::ZERO, |acc, v| acc + v)
    }
}

impl fmt::Display for Centavos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sinal = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sinal, abs / 100, abs % 100)
    }
}

// ==========================================
// Percentual - Percentual em centésimos de ponto
// ==========================================
// 100,00% == Percentual(10_000). Mesma razão dos
// centavos: a soma do rateio precisa fechar exata.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Percentual(pub i64);

impl Percentual {
    pub const ZERO: Percentual = Percentual(0);
    pub const CEM: Percentual = Percentual(10_000);

    /// Converte de pontos percentuais (ex.: 33.33 → Percentual(3_333)).
    pub fn de_pontos(pontos: f64) -> Self {
        Percentual((pontos * 100.0).round() as i64)
    }

    /// Pontos percentuais para exibição.
    pub fn em_pontos(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn positivo(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Percentual {
    type Output = Percentual;
    fn add(self, rhs: Percentual) -> Percentual {
        Percentual(self.0 + rhs.0)
    }
}

impl Sub for Percentual {
    type Output = Percentual;
    fn sub(self, rhs: Percentual) -> Percentual {
        Percentual(self.0 - rhs.0)
    }
}

impl Sum for Percentual {
    fn sum<I: Iterator<Item = Percentual>>(iter: I) -> Percentual {
        iter.fold(Percentual::ZERO, |acc, v| acc + v)
    }
}

impl fmt::Display for Percentual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sinal = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}%", sinal, abs / 100, abs % 100)
    }
}

// ==========================================
// Selection - Seleção etiquetada (single/multi)
// ==========================================
// Substitui a forma "flag booleana + campos de tipos
// distintos" dos selects da UI por uma variante
// etiquetada com tratamento exaustivo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "valor", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Selection {
    Single(Option<String>),
    Multiple(Vec<String>),
}

impl Selection {
    /// Códigos selecionados, independentemente da variante.
    pub fn selecionados(&self) -> Vec<&str> {
        match self {
            Selection::Single(None) => Vec::new(),
            Selection::Single(Some(v)) => vec![v.as_str()],
            Selection::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    pub fn vazia(&self) -> bool {
        match self {
            Selection::Single(v) => v.is_none(),
            Selection::Multiple(vs) => vs.is_empty(),
        }
    }

    /// Primeiro código selecionado, se houver.
    pub fn primeiro(&self) -> Option<&str> {
        self.selecionados().first().copied()
    }
}

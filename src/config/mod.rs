// ==========================================
// Motor de Pré-Nota - Camada de configuração
// ==========================================
// Configuração do motor como valor injetado (sem storage
// próprio: o núcleo não possui banco). Carregável de JSON
// para instalações que sobrescrevem os defaults.
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// ConfigError
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuração inválida: {0}")]
    Parse(#[from] serde_json::Error),
}

// ==========================================
// EngineConfig - Configuração do motor
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tolerância (em centavos) entre o total informado do
    /// item e quantidade × valor unitário.
    #[serde(default = "default_tolerancia_total_item")]
    pub tolerancia_total_item: i64,

    /// Exigir ao menos uma linha de rateio no rascunho.
    /// Default: rateio é opcional e o invariante de 100%
    /// só é avaliado quando existe alguma linha.
    #[serde(default)]
    pub exigir_rateio: bool,
}

fn default_tolerancia_total_item() -> i64 {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tolerancia_total_item: default_tolerancia_total_item(),
            exigir_rateio: false,
        }
    }
}

impl EngineConfig {
    /// Carrega a configuração de um JSON (campos ausentes
    /// caem nos defaults).
    pub fn de_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tolerancia_total_item, 1);
        assert!(!config.exigir_rateio);
    }

    #[test]
    fn test_de_json_parcial() {
        let config = EngineConfig::de_json(r#"{"exigir_rateio": true}"#).unwrap();
        assert!(config.exigir_rateio);
        assert_eq!(config.tolerancia_total_item, 1);
    }
}

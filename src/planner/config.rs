//! # DecisionConfig — Opções do Hook de Decisão
//!
//! Configuração explícita do [`BeliefDecisionHook`](super::BeliefDecisionHook),
//! lida de um arquivo TOML com defaults para toda opção ausente.
//!
//! ```toml
//! cbwm_enabled = true
//! divergence_metric_type = "concept_js_divergence"
//! divergence_threshold = 0.3
//! # correction_divergence_threshold = 0.45   (default: 1.5 × divergence_threshold)
//! concept_confidence_threshold = 0.5
//! # l2d_divergence_threshold = 0.15          (default: 0.5 × divergence_threshold)
//! l2d_action_enabled = true
//! ```
//!
//! Variáveis de ambiente sobrescrevem o arquivo:
//!
//! | Variável | Campo |
//! |----------|-------|
//! | `CBWM_ENABLED` | `cbwm_enabled` (`true`/`false`/`1`/`0`) |
//! | `CBWM_DIVERGENCE_METRIC` | `divergence_metric_type` |

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::metrics::BELIEF_DIVERGENCE;
use crate::error::{CbwmError, Result};

pub const DEFAULT_DIVERGENCE_THRESHOLD: f64 = 0.3;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;
/// Multiplicador do limiar de correção sobre `divergence_threshold`.
pub const CORRECTION_FACTOR: f64 = 1.5;
/// Multiplicador do limiar de L2D sobre `divergence_threshold`.
pub const L2D_FACTOR: f64 = 0.5;

pub const DEFAULT_CORRECTION_ACTION: &str = "CorrectHuman";
pub const DEFAULT_LOW_CONFIDENCE_ACTION: &str = "AppendObservation";
pub const DEFAULT_L2D_ACTION: &str = "LookToDisambiguate";
pub const DEFAULT_HIGH_DIVERGENCE_ACTION: &str = "AskHuman";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    pub cbwm_enabled: bool,
    pub divergence_metric_type: String,
    pub divergence_threshold: f64,
    /// `None` → `divergence_threshold × 1.5`.
    pub correction_divergence_threshold: Option<f64>,
    pub concept_confidence_threshold: f64,
    /// `None` → `divergence_threshold × 0.5`.
    pub l2d_divergence_threshold: Option<f64>,
    pub l2d_action_enabled: bool,
    pub correction_action: String,
    pub low_confidence_action: String,
    pub l2d_action: String,
    pub high_divergence_action: String,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            cbwm_enabled: true,
            divergence_metric_type: BELIEF_DIVERGENCE.to_string(),
            divergence_threshold: DEFAULT_DIVERGENCE_THRESHOLD,
            correction_divergence_threshold: None,
            concept_confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            l2d_divergence_threshold: None,
            l2d_action_enabled: false,
            correction_action: DEFAULT_CORRECTION_ACTION.to_string(),
            low_confidence_action: DEFAULT_LOW_CONFIDENCE_ACTION.to_string(),
            l2d_action: DEFAULT_L2D_ACTION.to_string(),
            high_divergence_action: DEFAULT_HIGH_DIVERGENCE_ACTION.to_string(),
        }
    }
}

impl DecisionConfig {
    /// Carrega a config de um arquivo TOML, aplica overrides de ambiente e valida.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(CbwmError::io(path))?;
        let mut config = Self::from_toml_str(&content).map_err(|source| CbwmError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.apply_env_overrides();
        config.validate()?;
        tracing::info!(path = %path.display(), "DecisionConfig carregada");
        Ok(config)
    }

    /// Tenta carregar de `path`; se o arquivo faltar ou for inválido,
    /// usa defaults (com overrides de ambiente).
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config not found or invalid ({}), using defaults", e);
                Self::from_env().unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Overrides de ambiente inválidos, ignorados");
                    Self::default()
                })
            }
        }
    }

    /// Defaults com os overrides de ambiente aplicados, validados.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CBWM_ENABLED") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.cbwm_enabled = true,
                "0" | "false" | "no" | "off" => self.cbwm_enabled = false,
                other => tracing::warn!(value = other, "CBWM_ENABLED ignorado"),
            }
        }
        if let Ok(v) = std::env::var("CBWM_DIVERGENCE_METRIC") {
            self.divergence_metric_type = v;
        }
    }

    pub fn correction_threshold(&self) -> f64 {
        self.correction_divergence_threshold
            .unwrap_or(self.divergence_threshold * CORRECTION_FACTOR)
    }

    pub fn l2d_threshold(&self) -> f64 {
        self.l2d_divergence_threshold
            .unwrap_or(self.divergence_threshold * L2D_FACTOR)
    }

    /// Rejeita limiares não finitos ou negativos, confiança fora de [0, 1]
    /// e nomes de métrica/ação em branco.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("divergence_threshold", self.divergence_threshold),
            ("correction_divergence_threshold", self.correction_threshold()),
            ("l2d_divergence_threshold", self.l2d_threshold()),
            ("concept_confidence_threshold", self.concept_confidence_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(CbwmError::InvalidConfig(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        if self.concept_confidence_threshold > 1.0 {
            return Err(CbwmError::InvalidConfig(format!(
                "concept_confidence_threshold must be within [0, 1] (got {})",
                self.concept_confidence_threshold
            )));
        }

        let names = [
            ("divergence_metric_type", &self.divergence_metric_type),
            ("correction_action", &self.correction_action),
            ("low_confidence_action", &self.low_confidence_action),
            ("l2d_action", &self.l2d_action),
            ("high_divergence_action", &self.high_divergence_action),
        ];
        if let Some((name, _)) = names.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(CbwmError::InvalidConfig(format!("{name} must not be blank")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_threshold_defaults() {
        let cfg = DecisionConfig::default();
        assert!((cfg.correction_threshold() - 0.45).abs() < 1e-9);
        assert!((cfg.l2d_threshold() - 0.15).abs() < 1e-9);

        let cfg = DecisionConfig {
            divergence_threshold: 0.4,
            ..DecisionConfig::default()
        };
        assert!((cfg.correction_threshold() - 0.6).abs() < 1e-9);
        assert!((cfg.l2d_threshold() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg = DecisionConfig::from_toml_str(
            r#"
            divergence_threshold = 0.2
            l2d_action_enabled = true
            correction_divergence_threshold = 0.9
            "#,
        )
        .unwrap();
        assert!(cfg.cbwm_enabled);
        assert_eq!(cfg.divergence_metric_type, "belief_divergence");
        assert_eq!(cfg.correction_threshold(), 0.9);
        assert!((cfg.l2d_threshold() - 0.1).abs() < 1e-9);
        assert_eq!(cfg.high_divergence_action, "AskHuman");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let negative = DecisionConfig {
            divergence_threshold: -0.1,
            ..DecisionConfig::default()
        };
        assert!(matches!(negative.validate(), Err(CbwmError::InvalidConfig(_))));

        let nan = DecisionConfig {
            l2d_divergence_threshold: Some(f64::NAN),
            ..DecisionConfig::default()
        };
        assert!(nan.validate().is_err());

        let confidence = DecisionConfig {
            concept_confidence_threshold: 1.5,
            ..DecisionConfig::default()
        };
        assert!(confidence.validate().is_err());

        let blank = DecisionConfig {
            l2d_action: "  ".into(),
            ..DecisionConfig::default()
        };
        assert!(blank.validate().is_err());

        assert!(DecisionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cbwm.toml");
        std::fs::write(&path, "concept_confidence_threshold = 0.7\nhigh_divergence_action = \"Ask\"\n").unwrap();
        let cfg = DecisionConfig::load(&path).unwrap();
        assert_eq!(cfg.concept_confidence_threshold, 0.7);
        assert_eq!(cfg.high_divergence_action, "Ask");
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DecisionConfig::load_or_default(dir.path().join("absent.toml"));
        assert_eq!(cfg.divergence_threshold, DEFAULT_DIVERGENCE_THRESHOLD);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_env_applies_overrides() {
        let key = "CBWM_DIVERGENCE_METRIC";
        let previous = std::env::var(key).ok();
        std::env::set_var(key, "concept_js_divergence");
        let cfg = DecisionConfig::from_env();
        match previous {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }

        let cfg = cfg.unwrap();
        assert_eq!(cfg.divergence_metric_type, "concept_js_divergence");
        assert_eq!(cfg.divergence_threshold, DEFAULT_DIVERGENCE_THRESHOLD);
    }

    #[test]
    fn test_load_reports_parse_and_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(DecisionConfig::load(&missing), Err(CbwmError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "divergence_threshold = \"high\"").unwrap();
        assert!(matches!(DecisionConfig::load(&broken), Err(CbwmError::ConfigParse { .. })));
    }
}

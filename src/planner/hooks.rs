//! # Hook de Decisão CBWM
//!
//! Decide, a cada passo, se o planner confia nas crenças atuais ou dispara
//! uma ação corretiva. A avaliação segue uma hierarquia fixa; a primeira
//! regra que casa vence:
//!
//! ```text
//! config ausente ───────────────▶ (None, "")
//! cbwm_enabled = false ─────────▶ (None, "CBWM hooks disabled.")
//! divergência ≥ correção ───────▶ correction_action      (CorrectHuman)
//! confiança < limiar ───────────▶ low_confidence_action  (AppendObservation)
//! L2D ligado e div ≥ limiar L2D ▶ l2d_action             (LookToDisambiguate)
//! divergência ≥ limiar base ────▶ high_divergence_action (AskHuman)
//! caso contrário ───────────────▶ (None, metrics.note)
//! ```
//!
//! A saída depende apenas da config e das métricas, sem estado oculto.

use std::fmt;

use super::config::DecisionConfig;
use super::metrics::BeliefMetrics;
use crate::error::Result;

/// Razão devolvida quando os hooks estão desligados.
pub const HOOKS_DISABLED_REASON: &str = "CBWM hooks disabled.";

/// Qual regra da hierarquia produziu a decisão.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionBranch {
    NoConfig,
    Disabled,
    Correction,
    LowConfidence,
    LookToDisambiguate,
    HighDivergence,
    NoAction,
}

impl DecisionBranch {
    pub fn label(&self) -> &'static str {
        match self {
            DecisionBranch::NoConfig => "no_config",
            DecisionBranch::Disabled => "disabled",
            DecisionBranch::Correction => "correction",
            DecisionBranch::LowConfidence => "low_confidence",
            DecisionBranch::LookToDisambiguate => "l2d",
            DecisionBranch::HighDivergence => "high_divergence",
            DecisionBranch::NoAction => "no_action",
        }
    }
}

/// Ação escolhida (nome da ferramenta do planner) e a razão legível.
#[derive(Clone, Debug, PartialEq)]
pub struct BeliefDecision {
    pub action: Option<String>,
    pub reason: String,
    pub branch: DecisionBranch,
}

impl BeliefDecision {
    fn idle(branch: DecisionBranch, reason: impl Into<String>) -> Self {
        Self {
            action: None,
            reason: reason.into(),
            branch,
        }
    }

    fn act(branch: DecisionBranch, action: &str, reason: String) -> Self {
        Self {
            action: Some(action.to_string()),
            reason,
            branch,
        }
    }

    pub fn should_act(&self) -> bool {
        self.action.is_some()
    }
}

impl fmt::Display for BeliefDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.action.as_deref().unwrap_or("-"), self.reason)
    }
}

/// Limiares resolvidos a partir da config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub divergence: f64,
    pub correction: f64,
    pub confidence: f64,
    pub l2d: f64,
}

impl Thresholds {
    pub fn from_config(config: &DecisionConfig) -> Self {
        Self {
            divergence: config.divergence_threshold,
            correction: config.correction_threshold(),
            confidence: config.concept_confidence_threshold,
            l2d: config.l2d_threshold(),
        }
    }
}

/// Hook com config validada uma única vez, na construção.
///
/// ```rust
/// use cbwm_core::planner::{BeliefDecisionHook, BeliefMetrics, DecisionConfig};
///
/// let hook = BeliefDecisionHook::new(DecisionConfig::default()).unwrap();
/// let decision = hook.decide(&BeliefMetrics::new(0.9, 0.9));
/// assert_eq!(decision.action.as_deref(), Some("CorrectHuman"));
/// ```
#[derive(Clone, Debug)]
pub struct BeliefDecisionHook {
    config: DecisionConfig,
    thresholds: Thresholds,
}

impl BeliefDecisionHook {
    pub fn new(config: DecisionConfig) -> Result<Self> {
        config.validate()?;
        let thresholds = Thresholds::from_config(&config);
        tracing::debug!(?thresholds, metric = %config.divergence_metric_type, "BeliefDecisionHook criado");
        Ok(Self { config, thresholds })
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn decide(&self, metrics: &BeliefMetrics) -> BeliefDecision {
        evaluate(&self.config, &self.thresholds, metrics)
    }
}

/// Escolhe a ação corretiva para um snapshot de métricas.
///
/// Versão por chamada, sem validação: a config é lida como veio. Sem config,
/// devolve `(None, "")`.
pub fn choose_belief_action(config: Option<&DecisionConfig>, metrics: &BeliefMetrics) -> BeliefDecision {
    match config {
        None => BeliefDecision::idle(DecisionBranch::NoConfig, ""),
        Some(config) => evaluate(config, &Thresholds::from_config(config), metrics),
    }
}

fn evaluate(config: &DecisionConfig, t: &Thresholds, metrics: &BeliefMetrics) -> BeliefDecision {
    if !config.cbwm_enabled {
        return BeliefDecision::idle(DecisionBranch::Disabled, HOOKS_DISABLED_REASON);
    }

    let metric = config.divergence_metric_type.as_str();
    let divergence = metrics.get_divergence(metric);
    let confidence = metrics.avg_concept_confidence;

    let decision = if divergence >= t.correction {
        BeliefDecision::act(
            DecisionBranch::Correction,
            &config.correction_action,
            format!(
                "Belief divergence ({metric}) {divergence:.2} exceeds correction threshold {:.2}.",
                t.correction
            ),
        )
    } else if confidence < t.confidence {
        BeliefDecision::act(
            DecisionBranch::LowConfidence,
            &config.low_confidence_action,
            format!(
                "Average concept confidence {confidence:.2} is below threshold {:.2}.",
                t.confidence
            ),
        )
    } else if config.l2d_action_enabled && divergence >= t.l2d {
        BeliefDecision::act(
            DecisionBranch::LookToDisambiguate,
            &config.l2d_action,
            format!("Divergence ({metric}) {divergence:.2} exceeds L2D threshold {:.2}.", t.l2d),
        )
    } else if divergence >= t.divergence {
        BeliefDecision::act(
            DecisionBranch::HighDivergence,
            &config.high_divergence_action,
            format!(
                "Belief divergence ({metric}) {divergence:.2} exceeds threshold {:.2}.",
                t.divergence
            ),
        )
    } else {
        BeliefDecision::idle(DecisionBranch::NoAction, metrics.note.clone())
    };

    tracing::debug!(
        branch = decision.branch.label(),
        action = ?decision.action,
        divergence,
        confidence,
        "Hook CBWM avaliado"
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decide(config: &DecisionConfig, metrics: BeliefMetrics) -> BeliefDecision {
        choose_belief_action(Some(config), &metrics)
    }

    #[test]
    fn test_correction_beats_high_confidence() {
        let d = decide(&DecisionConfig::default(), BeliefMetrics::new(0.9, 0.9));
        assert_eq!(d.action.as_deref(), Some("CorrectHuman"));
        assert_eq!(d.branch, DecisionBranch::Correction);
        assert_eq!(
            d.reason,
            "Belief divergence (belief_divergence) 0.90 exceeds correction threshold 0.45."
        );
    }

    #[test]
    fn test_low_confidence_before_divergence() {
        let d = decide(&DecisionConfig::default(), BeliefMetrics::new(0.4, 0.0));
        assert_eq!(d.action.as_deref(), Some("AppendObservation"));
        assert_eq!(d.reason, "Average concept confidence 0.40 is below threshold 0.50.");
    }

    #[test]
    fn test_l2d_when_enabled() {
        let config = DecisionConfig {
            l2d_action_enabled: true,
            ..DecisionConfig::default()
        };
        let d = decide(&config, BeliefMetrics::new(0.9, 0.2));
        assert_eq!(d.action.as_deref(), Some("LookToDisambiguate"));
        assert_eq!(d.reason, "Divergence (belief_divergence) 0.20 exceeds L2D threshold 0.15.");

        // desligado, 0.2 fica abaixo do limiar base 0.3
        let d = decide(&DecisionConfig::default(), BeliefMetrics::new(0.9, 0.2));
        assert_eq!(d.action, None);
    }

    #[test]
    fn test_high_divergence_asks_human() {
        let d = decide(&DecisionConfig::default(), BeliefMetrics::new(0.9, 0.35));
        assert_eq!(d.action.as_deref(), Some("AskHuman"));
        assert_eq!(d.reason, "Belief divergence (belief_divergence) 0.35 exceeds threshold 0.30.");
    }

    #[test]
    fn test_below_thresholds_returns_note() {
        let d = decide(
            &DecisionConfig::default(),
            BeliefMetrics::new(0.9, 0.1).with_note("beliefs stable"),
        );
        assert_eq!(d.action, None);
        assert_eq!(d.reason, "beliefs stable");
        assert_eq!(d.branch, DecisionBranch::NoAction);
    }

    #[test]
    fn test_missing_config() {
        let d = choose_belief_action(None, &BeliefMetrics::new(0.0, 5.0));
        assert_eq!(d.action, None);
        assert_eq!(d.reason, "");
    }

    #[test]
    fn test_named_metric_drives_decision() {
        let config = DecisionConfig {
            divergence_metric_type: "concept_js_divergence".into(),
            ..DecisionConfig::default()
        };
        let metrics = BeliefMetrics::new(0.9, 0.0).with_metric("concept_js_divergence", 0.5);
        let d = decide(&config, metrics);
        assert_eq!(d.action.as_deref(), Some("CorrectHuman"));
        assert!(d.reason.contains("concept_js_divergence"));
    }

    #[test]
    fn test_custom_action_names() {
        let config = DecisionConfig {
            high_divergence_action: "PingOperator".into(),
            ..DecisionConfig::default()
        };
        let d = decide(&config, BeliefMetrics::new(0.9, 0.3));
        assert_eq!(d.action.as_deref(), Some("PingOperator"));
    }

    #[test]
    fn test_hook_rejects_invalid_config() {
        let config = DecisionConfig {
            divergence_threshold: f64::INFINITY,
            ..DecisionConfig::default()
        };
        assert!(BeliefDecisionHook::new(config).is_err());
    }

    #[test]
    fn test_hook_matches_free_function() {
        let config = DecisionConfig {
            l2d_action_enabled: true,
            ..DecisionConfig::default()
        };
        let hook = BeliefDecisionHook::new(config.clone()).unwrap();
        for (conf, div) in [(0.9, 0.9), (0.3, 0.1), (0.8, 0.2), (0.8, 0.05)] {
            let metrics = BeliefMetrics::new(conf, div);
            assert_eq!(hook.decide(&metrics), choose_belief_action(Some(&config), &metrics));
        }
    }

    proptest! {
        #[test]
        fn prop_disabled_never_acts(conf in 0.0f64..1.0, div in 0.0f64..5.0) {
            let config = DecisionConfig { cbwm_enabled: false, ..DecisionConfig::default() };
            let d = choose_belief_action(Some(&config), &BeliefMetrics::new(conf, div));
            prop_assert_eq!(d.action, None);
            prop_assert_eq!(d.reason, HOOKS_DISABLED_REASON);
        }

        #[test]
        fn prop_correction_always_first(conf in 0.0f64..1.0, div in 0.45f64..5.0) {
            let d = choose_belief_action(Some(&DecisionConfig::default()), &BeliefMetrics::new(conf, div));
            prop_assert_eq!(d.branch, DecisionBranch::Correction);
        }

        #[test]
        fn prop_quiet_beliefs_take_no_action(conf in 0.5f64..1.0, div in 0.0f64..0.3) {
            let d = choose_belief_action(Some(&DecisionConfig::default()), &BeliefMetrics::new(conf, div));
            prop_assert_eq!(d.action, None);
        }
    }
}

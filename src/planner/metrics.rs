//! Snapshot da "saúde" das crenças do planner em um passo.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nome da divergência escalar; é sempre servida pelo campo
/// `belief_divergence`, nunca pelo mapa de métricas nomeadas.
pub const BELIEF_DIVERGENCE: &str = "belief_divergence";

/// Métricas agregadas de confiança/divergência, uma instância por decisão.
///
/// | Campo | Default | Significado |
/// |-------|---------|-------------|
/// | `avg_concept_confidence` | `1.0` | confiança média nos conceitos (0..1) |
/// | `belief_divergence` | `0.0` | divergência escalar (≥ 0) |
/// | `divergence_metrics` | `None` | divergências nomeadas (ex: `concept_js_divergence`) |
/// | `note` | `""` | razão devolvida quando nenhuma ação dispara |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeliefMetrics {
    pub avg_concept_confidence: f64,
    pub belief_divergence: f64,
    pub divergence_metrics: Option<BTreeMap<String, f64>>,
    pub note: String,
}

impl Default for BeliefMetrics {
    fn default() -> Self {
        Self {
            avg_concept_confidence: 1.0,
            belief_divergence: 0.0,
            divergence_metrics: None,
            note: String::new(),
        }
    }
}

impl BeliefMetrics {
    pub fn new(avg_concept_confidence: f64, belief_divergence: f64) -> Self {
        Self {
            avg_concept_confidence,
            belief_divergence,
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.divergence_metrics
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Divergência pedida pelo planner.
    ///
    /// `"belief_divergence"` devolve sempre o campo escalar, mesmo que o mapa
    /// também tenha essa chave. Métricas desconhecidas caem no escalar.
    pub fn get_divergence(&self, metric_type: &str) -> f64 {
        if metric_type == BELIEF_DIVERGENCE {
            return self.belief_divergence;
        }
        self.divergence_metrics
            .as_ref()
            .and_then(|metrics| metrics.get(metric_type))
            .copied()
            .unwrap_or(self.belief_divergence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_fully_trusting() {
        let m = BeliefMetrics::default();
        assert_eq!(m.avg_concept_confidence, 1.0);
        assert_eq!(m.belief_divergence, 0.0);
        assert!(m.divergence_metrics.is_none());
        assert!(m.note.is_empty());
    }

    #[test]
    fn test_scalar_wins_for_belief_divergence() {
        let m = BeliefMetrics::new(0.9, 0.2).with_metric("belief_divergence", 0.8);
        assert_eq!(m.get_divergence("belief_divergence"), 0.2);
    }

    #[test]
    fn test_named_metric_lookup_and_fallback() {
        let m = BeliefMetrics::new(0.9, 0.2).with_metric("concept_js_divergence", 0.6);
        assert_eq!(m.get_divergence("concept_js_divergence"), 0.6);
        assert_eq!(m.get_divergence("concept_kl_divergence"), 0.2);
        assert_eq!(BeliefMetrics::new(1.0, 0.4).get_divergence("anything"), 0.4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let m: BeliefMetrics = serde_json::from_str(r#"{"belief_divergence": 0.35}"#).unwrap();
        assert_eq!(m.avg_concept_confidence, 1.0);
        assert_eq!(m.belief_divergence, 0.35);
    }
}

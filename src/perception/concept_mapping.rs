//! # ConceptMapper — Categoria Detectada → Rótulos de Conceito
//!
//! Função pura que espelha a categoria semântica detectada no espaço de
//! conceitos com confiança máxima, e acrescenta um rótulo `"unknown"` de
//! baixa confiança quando a categoria não pertence ao [`Lexicon`] conhecido.
//!
//! | Entrada | Lexicon | Labels | Confidences |
//! |---------|---------|--------|-------------|
//! | `None` | qualquer | `[]` | `[]` |
//! | `"chair"` | ausente | `["chair"]` | `[1.0]` |
//! | `"chair"` | contém | `["chair"]` | `[1.0]` |
//! | `"blender"` | não contém | `["blender", "unknown"]` | `[1.0, 0.1]` |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ConceptAnnotation;

/// Rótulo acrescentado para categorias fora do lexicon.
pub const UNKNOWN_LABEL: &str = "unknown";

pub const UNKNOWN_CONFIDENCE: f64 = 0.1;

/// Confiança atribuída à própria categoria detectada.
pub const DETECTED_CONFIDENCE: f64 = 1.0;

/// Conjunto de categorias semânticas conhecidas pelo simulador/dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    categories: HashSet<String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>) -> bool {
        self.categories.insert(category.into())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Lexicon {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Saída efêmera da percepção, consumida uma única vez.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub detected_type: Option<String>,
}

impl DetectionResult {
    pub fn detected(detected_type: impl Into<String>) -> Self {
        Self {
            detected_type: Some(detected_type.into()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// Lê uma detecção de um registro JSON arbitrário.
    ///
    /// Entrada malformada nunca é erro: `detected_type` ausente, nulo, não
    /// textual ou em branco vira "sem detecção".
    pub fn from_json(value: &Value) -> Self {
        let detected_type = value
            .get("detected_type")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { detected_type }
    }

    pub fn to_concepts(&self, lexicon: Option<&Lexicon>) -> ConceptAnnotation {
        map_detection_to_concepts(self.detected_type.as_deref(), lexicon)
    }
}

/// Traduz uma categoria detectada em rótulos e confianças de conceito.
///
/// Labels e confidences crescem sempre juntos, mantendo o alinhamento por
/// índice.
///
/// # Exemplo
///
/// ```rust
/// use cbwm_core::perception::{map_detection_to_concepts, Lexicon};
///
/// let lexicon: Lexicon = ["chair", "table"].into_iter().collect();
/// let concepts = map_detection_to_concepts(Some("blender"), Some(&lexicon));
/// assert_eq!(concepts.labels, vec!["blender", "unknown"]);
/// assert_eq!(concepts.confidences, vec![1.0, 0.1]);
/// ```
pub fn map_detection_to_concepts(
    detected_type: Option<&str>,
    lexicon: Option<&Lexicon>,
) -> ConceptAnnotation {
    let Some(detected_type) = detected_type else {
        return ConceptAnnotation::default();
    };

    let mut labels = vec![detected_type.to_string()];
    let mut confidences = vec![DETECTED_CONFIDENCE];

    if lexicon.is_some_and(|lex| !lex.contains(detected_type)) {
        labels.push(UNKNOWN_LABEL.to_string());
        confidences.push(UNKNOWN_CONFIDENCE);
    }

    ConceptAnnotation::new(labels, confidences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn lexicon() -> Lexicon {
        ["chair", "table", "mug"].into_iter().collect()
    }

    #[test]
    fn test_no_detection_is_empty() {
        let concepts = map_detection_to_concepts(None, Some(&lexicon()));
        assert!(concepts.labels.is_empty());
        assert!(concepts.confidences.is_empty());
    }

    #[test]
    fn test_without_lexicon_mirrors_detection() {
        let concepts = map_detection_to_concepts(Some("chair"), None);
        assert_eq!(concepts.labels, vec!["chair"]);
        assert_eq!(concepts.confidences, vec![1.0]);
    }

    #[test]
    fn test_from_json_treats_malformed_as_no_detection() {
        assert_eq!(DetectionResult::from_json(&json!({})), DetectionResult::none());
        assert_eq!(DetectionResult::from_json(&json!({"detected_type": 7})), DetectionResult::none());
        assert_eq!(DetectionResult::from_json(&json!({"detected_type": "  "})), DetectionResult::none());
        assert_eq!(
            DetectionResult::from_json(&json!({"detected_type": "mug"})),
            DetectionResult::detected("mug")
        );
    }

    #[test]
    fn test_detection_result_to_concepts() {
        let concepts = DetectionResult::detected("sofa").to_concepts(Some(&lexicon()));
        assert_eq!(concepts.labels, vec!["sofa", "unknown"]);
        assert!(DetectionResult::none().to_concepts(None).is_empty());
    }

    proptest! {
        #[test]
        fn prop_unknown_category_gets_fallback(t in "[a-z_]{1,12}") {
            prop_assume!(!lexicon().contains(&t));
            let concepts = map_detection_to_concepts(Some(&t), Some(&lexicon()));
            prop_assert_eq!(concepts.labels, vec![t.clone(), UNKNOWN_LABEL.to_string()]);
            prop_assert_eq!(concepts.confidences, vec![1.0, 0.1]);
        }

        #[test]
        fn prop_known_category_single_label(idx in 0usize..3) {
            let t = ["chair", "table", "mug"][idx];
            let concepts = map_detection_to_concepts(Some(t), Some(&lexicon()));
            prop_assert_eq!(concepts.labels, vec![t.to_string()]);
            prop_assert_eq!(concepts.confidences, vec![1.0]);
        }
    }
}

//! # Relation — Rótulos de Aresta do World Graph
//!
//! Arestas são **dirigidas** e carregam um único rótulo [`Relation`].
//! A camada de conceitos usa apenas [`Relation::Describes`]
//! (Concept → Entity); as relações espaciais do planner (`on`, `in`,
//! `next_to`, ...) entram como [`Relation::Custom`].
//!
//! | Relação | Label | Exemplo |
//! |---------|-------|---------|
//! | `Describes` | `"describes"` | concept_cup_1 → cup_1 |
//! | `Custom` | livre | cup_1 →`on` table_3 |

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::node::NodeId;

/// Label fixo da aresta Concept → Entity.
pub const DESCRIBES_LABEL: &str = "describes";

/// Rótulo de uma aresta dirigida.
///
/// Serializado como string simples: `"describes"` volta como `Describes`,
/// qualquer outro valor como `Custom`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Describes,
    Custom(String),
}

impl Relation {
    pub fn custom(label: impl Into<String>) -> Self {
        let label = label.into();
        if label == DESCRIBES_LABEL {
            Relation::Describes
        } else {
            Relation::Custom(label)
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Relation::Describes => DESCRIBES_LABEL,
            Relation::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Relation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Relation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Relation::custom(label))
    }
}

/// Aresta dirigida `source --relation--> target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: Relation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describes_label_is_fixed() {
        assert_eq!(Relation::Describes.label(), "describes");
        assert_eq!(Relation::custom("describes"), Relation::Describes);
    }

    #[test]
    fn test_relation_serde_as_plain_string() {
        let json = serde_json::to_string(&Relation::custom("on")).unwrap();
        assert_eq!(json, "\"on\"");
        let back: Relation = serde_json::from_str("\"describes\"").unwrap();
        assert_eq!(back, Relation::Describes);
    }
}

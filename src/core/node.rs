//! # Node — Entidades e Conceitos do World Graph
//!
//! Um [`Node`] é qualquer vértice do grafo simbólico que o planner mantém
//! sobre o ambiente: cômodos, móveis, objetos, agentes e, desde a camada
//! de conceitos, os próprios nós [`NodeKind::Concept`].
//!
//! ## Campos Principais
//!
//! | Campo | Tipo | Descrição |
//! |-------|------|-----------|
//! | `id` | UUID | Identificador estável dentro da arena |
//! | `name` | String | Nome/handle do objeto no simulador (ex: "cup_1") |
//! | `kind` | [NodeKind] | Categoria do nó |
//! | `properties` | JSON map | Propriedades livres (ex: `type`, `concept_labels`) |
//! | `created_at` / `updated_at` | DateTime | Carimbos de criação e última mutação |
//!
//! Os nós **não** guardam ponteiros para vizinhos: as arestas vivem no
//! [`WorldGraph`](super::WorldGraph), endereçadas por [`NodeId`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Identificador estável de um nó na arena do grafo.
///
/// Serializado como a string UUID pura.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Categoria de um nó do world graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Room,
    Furniture,
    Object,
    Agent,
    /// Nó da camada de conceitos; descreve exatamente uma entidade.
    Concept,
}

impl NodeKind {
    /// Entidades são todos os nós que podem receber anotações de conceito.
    pub fn is_entity(&self) -> bool {
        !matches!(self, NodeKind::Concept)
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Room => "room",
            NodeKind::Furniture => "furniture",
            NodeKind::Object => "object",
            NodeKind::Agent => "agent",
            NodeKind::Concept => "concept",
        }
    }
}

/// Vértice do world graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Nome legível; para objetos do simulador é o handle da instância.
    pub name: String,

    pub kind: NodeKind,

    /// Propriedades livres do nó.
    ///
    /// Após uma anotação de conceito, entidades carregam sempre as chaves
    /// `concept_labels` e `concept_confidence`, escritas juntas.
    #[serde(default)]
    pub properties: Map<String, Value>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Cria um nó sem propriedades, com `id` novo e carimbos `now()`.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        let now = Utc::now();
        Self {
            id: NodeId::new(),
            name: name.into(),
            kind,
            properties: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Atalho para `Node::new(name, NodeKind::Object)` com a propriedade `type`.
    ///
    /// # Exemplo
    ///
    /// ```rust
    /// use cbwm_core::core::Node;
    ///
    /// let mug = Node::object("cup_1", "mug");
    /// assert_eq!(mug.property_str("type"), Some("mug"));
    /// ```
    pub fn object(name: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Object).with_property("type", Value::String(object_type.into()))
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Escreve uma propriedade substituindo qualquer valor anterior e
    /// atualiza `updated_at`.
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
        self.touch();
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn is_entity(&self) -> bool {
        self.kind.is_entity()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_property_replaces_value() {
        let mut node = Node::object("cup_1", "mug");
        node.set_property("type", Value::String("cup".into()));
        assert_eq!(node.property_str("type"), Some("cup"));
        assert!(node.updated_at >= node.created_at);
    }

    #[test]
    fn test_concept_kind_is_not_entity() {
        assert!(!Node::new("c", NodeKind::Concept).is_entity());
        assert!(Node::new("kitchen", NodeKind::Room).is_entity());
    }

    #[test]
    fn test_node_id_serializes_as_plain_uuid() {
        let id = NodeId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, Value::String(id.0.to_string()));
    }
}

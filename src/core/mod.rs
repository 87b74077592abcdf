//! # Módulo Core — O World Graph e a Camada de Conceitos
//!
//! Tipos fundamentais do estado simbólico mantido pelo planner:
//!
//! - [`Node`] / [`NodeKind`] / [`NodeId`] — vértices da arena (entidades e conceitos)
//! - [`Relation`] / [`Edge`] — arestas dirigidas e rotuladas
//! - [`WorldGraph`] — arena de nós com índices de adjacência
//! - [`ConceptAnnotation`] — rótulos + confianças de uma entidade
//! - [`ConceptLayerSnapshot`] — a camada de conceitos serializada
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use cbwm_core::core::{ConceptAnnotation, Node, WorldGraph};
//!
//! let mut wg = WorldGraph::new();
//! let cup = wg.add_node(Node::object("cup_1", "mug"));
//! wg.add_or_update_concept_annotation(cup, &ConceptAnnotation::new(vec!["cup".into()], vec![0.8]))
//!     .unwrap();
//!
//! let layer = wg.serialize_concept_layer();
//! assert_eq!(layer.entity_concepts[0].concept_labels, vec!["cup"]);
//! ```

pub mod concept_layer;
pub mod graph;
pub mod node;
pub mod relation;

pub use concept_layer::{
    ConceptAnnotation, ConceptLayerSnapshot, EntityConcepts, CONCEPT_CONFIDENCE_KEY,
    CONCEPT_LABELS_KEY,
};
pub use graph::{SharedWorldGraph, WorldGraph};
pub use node::{Node, NodeId, NodeKind};
pub use relation::{Edge, Relation, DESCRIBES_LABEL};

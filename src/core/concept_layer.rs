//! # Camada de Conceitos — Anotações Persistentes por Entidade
//!
//! A camada de conceitos é o subconjunto do [`WorldGraph`] formado pelos nós
//! [`NodeKind::Concept`], suas arestas `"describes"` e as propriedades
//! `concept_labels` / `concept_confidence` gravadas nas entidades.
//!
//! ## Ciclo de Vida
//!
//! ```text
//! 1ª detecção de cup_1:
//!   cup_1.properties ← {concept_labels: ["cup"], concept_confidence: [0.8]}
//!   cria concept_cup_1 ──describes──▶ cup_1
//!
//! nova detecção de cup_1:
//!   cup_1.properties ← {concept_labels: ["cup"], concept_confidence: [0.9]}
//!   reutiliza concept_cup_1 (nunca duplica)
//! ```
//!
//! A última observação **sempre** vence: confianças são substituídas, nunca
//! somadas nem mediadas entre chamadas.
//!
//! ## Formato Serializado
//!
//! ```json
//! {
//!   "entity_concepts": [
//!     {
//!       "entity_id": "1b4e...",
//!       "entity_name": "cup_1",
//!       "concept_id": "9f0a...",
//!       "concept_labels": ["cup"],
//!       "concept_confidence": [0.9]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::graph::WorldGraph;
use super::node::{Node, NodeId, NodeKind};
use super::relation::Relation;
use crate::error::{CbwmError, Result};
use crate::perception::{DetectionResult, Lexicon};

/// Chave da propriedade com os rótulos de conceito da entidade.
pub const CONCEPT_LABELS_KEY: &str = "concept_labels";

/// Chave da propriedade com as confianças, alinhadas por índice aos rótulos.
pub const CONCEPT_CONFIDENCE_KEY: &str = "concept_confidence";

/// Rótulos de conceito e suas confianças, alinhados por índice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptAnnotation {
    pub labels: Vec<String>,
    pub confidences: Vec<f64>,
}

impl ConceptAnnotation {
    /// # Panics
    ///
    /// Se `labels` e `confidences` tiverem tamanhos diferentes: erro de
    /// programação do chamador, não condição recuperável.
    pub fn new(labels: Vec<String>, confidences: Vec<f64>) -> Self {
        assert_eq!(
            labels.len(),
            confidences.len(),
            "concept labels and confidences must be index-aligned"
        );
        Self { labels, confidences }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Rótulo de maior confiança; empates ficam com o primeiro.
    pub fn top(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, &conf) in self.labels.iter().zip(&self.confidences) {
            if best.map_or(true, |(_, best_conf)| conf > best_conf) {
                best = Some((label.as_str(), conf));
            }
        }
        best
    }

    pub fn mean_confidence(&self) -> Option<f64> {
        if self.confidences.is_empty() {
            return None;
        }
        Some(self.confidences.iter().sum::<f64>() / self.confidences.len() as f64)
    }
}

/// Uma entrada de `entity_concepts` no snapshot serializado.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityConcepts {
    pub entity_id: NodeId,
    pub entity_name: String,
    #[serde(default)]
    pub concept_id: Option<NodeId>,
    pub concept_labels: Vec<String>,
    pub concept_confidence: Vec<f64>,
}

/// Snapshot da camada de conceitos inteira.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptLayerSnapshot {
    pub entity_concepts: Vec<EntityConcepts>,
}

impl WorldGraph {
    /// Grava rótulos/confianças na entidade e garante o nó Concept dela.
    ///
    /// As duas propriedades são substituídas por inteiro. O nó Concept é
    /// criado na primeira anotação, ligado por `Concept --describes--> entity`,
    /// e reutilizado em todas as seguintes.
    ///
    /// # Erros
    ///
    /// - [`CbwmError::UnknownNode`] — a entidade não está no grafo
    /// - [`CbwmError::NotAnEntity`] — o alvo é ele próprio um nó Concept
    /// - [`CbwmError::InvalidConfidence`] — alguma confiança é NaN ou infinita;
    ///   nada é gravado
    ///
    /// # Exemplo
    ///
    /// ```rust
    /// use cbwm_core::core::{ConceptAnnotation, Node, WorldGraph};
    ///
    /// let mut wg = WorldGraph::new();
    /// let cup = wg.add_node(Node::object("obj", "mug"));
    ///
    /// let first = wg
    ///     .add_or_update_concept_annotation(cup, &ConceptAnnotation::new(vec!["cup".into()], vec![0.8]))
    ///     .unwrap();
    /// let second = wg
    ///     .add_or_update_concept_annotation(cup, &ConceptAnnotation::new(vec!["cup".into()], vec![0.9]))
    ///     .unwrap();
    ///
    /// assert_eq!(first, second);
    /// assert_eq!(wg.concept_annotation(cup).unwrap().confidences, vec![0.9]);
    /// ```
    pub fn add_or_update_concept_annotation(
        &mut self,
        entity: NodeId,
        annotation: &ConceptAnnotation,
    ) -> Result<NodeId> {
        assert_eq!(
            annotation.labels.len(),
            annotation.confidences.len(),
            "concept labels and confidences must be index-aligned"
        );
        if let Some(&value) = annotation.confidences.iter().find(|c| !c.is_finite()) {
            return Err(CbwmError::InvalidConfidence { entity, value });
        }

        let node = self.node_mut(entity).ok_or(CbwmError::UnknownNode(entity))?;
        if !node.is_entity() {
            return Err(CbwmError::NotAnEntity(entity));
        }
        node.set_property(CONCEPT_LABELS_KEY, Value::from(annotation.labels.clone()));
        node.set_property(CONCEPT_CONFIDENCE_KEY, Value::from(annotation.confidences.clone()));
        let entity_name = node.name.clone();

        let concept_id = match self.concept_node_for(entity) {
            Some(existing) => {
                if let Some(concept) = self.node_mut(existing) {
                    concept.touch();
                }
                existing
            }
            None => {
                let concept = Node::new(format!("concept_{entity_name}"), NodeKind::Concept);
                let concept_id = self.add_node(concept);
                self.add_edge(concept_id, entity, Relation::Describes)?;
                concept_id
            }
        };

        tracing::debug!(
            entity = %entity_name,
            concept = %concept_id,
            labels = ?annotation.labels,
            confidences = ?annotation.confidences,
            "Camada de conceitos: anotação atualizada"
        );
        Ok(concept_id)
    }

    /// Mapeia uma detecção e anota a entidade com o resultado.
    ///
    /// Sem detecção, a entidade fica intocada e o retorno é `Ok(None)`.
    pub fn annotate_detection(
        &mut self,
        entity: NodeId,
        detection: &DetectionResult,
        lexicon: Option<&Lexicon>,
    ) -> Result<Option<NodeId>> {
        let annotation = detection.to_concepts(lexicon);
        if annotation.is_empty() {
            tracing::debug!(entity = %entity, "Camada de conceitos: sem detecção, nada a anotar");
            return Ok(None);
        }
        self.add_or_update_concept_annotation(entity, &annotation).map(Some)
    }

    /// Nó Concept que descreve `entity`, se já existir.
    pub fn concept_node_for(&self, entity: NodeId) -> Option<NodeId> {
        self.sources(entity, &Relation::Describes)
            .into_iter()
            .find(|id| self.node(*id).is_some_and(|n| n.kind == NodeKind::Concept))
    }

    /// Lê de volta a anotação gravada nas propriedades da entidade.
    pub fn concept_annotation(&self, entity: NodeId) -> Option<ConceptAnnotation> {
        self.node(entity).and_then(read_annotation)
    }

    /// Coleta a anotação de toda entidade anotada, em ordem de inserção.
    pub fn serialize_concept_layer(&self) -> ConceptLayerSnapshot {
        let entity_concepts = self
            .nodes()
            .filter(|n| n.is_entity())
            .filter_map(|n| {
                let annotation = read_annotation(n)?;
                Some(EntityConcepts {
                    entity_id: n.id,
                    entity_name: n.name.clone(),
                    concept_id: self.concept_node_for(n.id),
                    concept_labels: annotation.labels,
                    concept_confidence: annotation.confidences,
                })
            })
            .collect();
        ConceptLayerSnapshot { entity_concepts }
    }

    /// Média de todas as confianças gravadas na camada de conceitos.
    ///
    /// É o valor natural para `BeliefMetrics::avg_concept_confidence`;
    /// `None` quando nenhuma entidade tem confiança gravada.
    pub fn average_concept_confidence(&self) -> Option<f64> {
        let (sum, count) = self
            .nodes()
            .filter(|n| n.is_entity())
            .filter_map(read_annotation)
            .flat_map(|a| a.confidences)
            .fold((0.0, 0usize), |(sum, count), c| (sum + c, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// Persiste [`serialize_concept_layer`](Self::serialize_concept_layer)
    /// como JSON em `path`. Veja [`crate::persistence::log_concept_layer`].
    pub fn log_concept_layer(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::persistence::log_concept_layer(self, path)
    }
}

fn read_annotation(node: &Node) -> Option<ConceptAnnotation> {
    let labels = node.property(CONCEPT_LABELS_KEY)?.clone();
    let confidences = node.property(CONCEPT_CONFIDENCE_KEY)?.clone();
    let parsed = serde_json::from_value::<Vec<String>>(labels)
        .and_then(|labels| Ok((labels, serde_json::from_value::<Vec<f64>>(confidences)?)));
    let (labels, confidences) = match parsed {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(entity = %node.name, error = %e, "Camada de conceitos: propriedades ilegíveis ignoradas");
            return None;
        }
    };
    if labels.len() != confidences.len() {
        tracing::warn!(entity = %node.name, "Camada de conceitos: propriedades desalinhadas ignoradas");
        return None;
    }
    Some(ConceptAnnotation { labels, confidences })
}

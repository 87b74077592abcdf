//! # WorldGraph — Arena de Nós e Arestas Rotuladas
//!
//! O [`WorldGraph`] é o contêiner do estado simbólico que o planner mantém
//! sobre o mundo percebido. É um grafo dirigido e rotulado pequeno,
//! implementado como **arena**: os nós ficam num mapa endereçado por
//! [`NodeId`] e as arestas referenciam apenas ids, nunca ponteiros. Assim
//! não existem ciclos de ownership entre um Concept e a entidade que ele
//! descreve.
//!
//! ## Armazenamento
//!
//! - **Nós**: `IndexMap<NodeId, Node>` — busca O(1) e ordem de inserção estável
//! - **Arestas**: `Vec<Edge>` — fonte da verdade, serializada
//! - **Índice de saída**: `(source, label) → [target]`
//! - **Índice de entrada**: `(target, label) → [source]`
//!
//! Os dois índices são marcados `#[serde(skip)]` e reconstruídos via
//! [`rebuild_index()`](WorldGraph::rebuild_index) após desserialização.
//!
//! ## Concorrência
//!
//! O grafo não tem lock interno. Quem compartilha o grafo entre threads usa
//! [`SharedWorldGraph`] e serializa as escritas por fora.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use cbwm_core::core::{Node, NodeKind, Relation, WorldGraph};
//!
//! let mut wg = WorldGraph::new();
//! let cup = wg.add_node(Node::object("cup_1", "mug"));
//! let table = wg.add_node(Node::new("table_3", NodeKind::Furniture));
//! wg.add_edge(cup, table, Relation::custom("on")).unwrap();
//!
//! assert_eq!(wg.targets(cup, &Relation::custom("on")), vec![table]);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::node::{Node, NodeId, NodeKind};
use super::relation::{Edge, Relation};
use crate::error::{CbwmError, Result};

/// Handle compartilhado do grafo; o lock é responsabilidade do chamador.
pub type SharedWorldGraph = Arc<RwLock<WorldGraph>>;

type IndexKey = (NodeId, Relation);

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorldGraph {
    /// Arena de nós, em ordem de inserção.
    pub(crate) nodes: IndexMap<NodeId, Node>,

    pub(crate) edges: Vec<Edge>,

    #[serde(skip, default)]
    outgoing: HashMap<IndexKey, Vec<NodeId>>,

    #[serde(skip, default)]
    incoming: HashMap<IndexKey, Vec<NodeId>>,
}

impl WorldGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Envolve o grafo num [`SharedWorldGraph`].
    pub fn into_shared(self) -> SharedWorldGraph {
        Arc::new(RwLock::new(self))
    }

    /// Reconstrói os índices de adjacência a partir de `edges`.
    ///
    /// **Deve ser chamado após desserialização**: os índices não são
    /// persistidos e estarão vazios depois de `load_world_graph()`.
    pub fn rebuild_index(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
        let edges = std::mem::take(&mut self.edges);
        for edge in &edges {
            self.index_edge(edge);
        }
        self.edges = edges;
    }

    /// Adiciona um nó e retorna seu [NodeId].
    ///
    /// Um nó com o mesmo id substitui o anterior, preservando a posição
    /// original na ordem de inserção.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        tracing::debug!(id = %id, name = %node.name, kind = node.kind.label(), "WorldGraph: nó armazenado");
        self.nodes.insert(id, node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Busca o primeiro nó com `name` exato (case-sensitive, handles do
    /// simulador diferenciam maiúsculas).
    pub fn find_node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    /// Itera sobre os nós em ordem de inserção.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.nodes.values().filter(|n| n.kind == kind).collect()
    }

    /// Adiciona a aresta `source --relation--> target`.
    ///
    /// # Erros
    ///
    /// [`CbwmError::UnknownNode`] se algum dos extremos não existir.
    /// Uma aresta idêntica já presente não é duplicada.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, relation: Relation) -> Result<()> {
        for id in [source, target] {
            if !self.contains(id) {
                return Err(CbwmError::UnknownNode(id));
            }
        }
        if self.has_edge(source, target, &relation) {
            return Ok(());
        }
        let edge = Edge { source, target, relation };
        tracing::debug!(source = %source, target = %target, relation = %edge.relation, "WorldGraph: aresta armazenada");
        self.index_edge(&edge);
        self.edges.push(edge);
        Ok(())
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId, relation: &Relation) -> bool {
        self.outgoing
            .get(&(source, relation.clone()))
            .is_some_and(|targets| targets.contains(&target))
    }

    /// Alvos das arestas `source --relation--> *`.
    pub fn targets(&self, source: NodeId, relation: &Relation) -> Vec<NodeId> {
        self.outgoing
            .get(&(source, relation.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Origens das arestas `* --relation--> target`.
    pub fn sources(&self, target: NodeId, relation: &Relation) -> Vec<NodeId> {
        self.incoming
            .get(&(target, relation.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Rótulo da primeira aresta `source → target`, se houver.
    pub fn edge_label(&self, source: NodeId, target: NodeId) -> Option<&Relation> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
            .map(|e| &e.relation)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn index_edge(&mut self, edge: &Edge) {
        self.outgoing
            .entry((edge.source, edge.relation.clone()))
            .or_default()
            .push(edge.target);
        self.incoming
            .entry((edge.target, edge.relation.clone()))
            .or_default()
            .push(edge.source);
    }
}

//! # Persistência — Camada de Conceitos e World Graph em Disco
//!
//! Dois formatos, ambos JSON "pretty-printed" para inspeção manual:
//!
//! | Função | Conteúdo | Consumidor |
//! |--------|----------|------------|
//! | [`log_concept_layer`] | `{"entity_concepts": [...]}` | ferramentas de visualização/análise |
//! | [`save_world_graph`] | nós + arestas do grafo inteiro | o próprio planner, ao retomar |
//!
//! Diretórios pai são criados quando faltam. Falhas de I/O sobem como
//! [`CbwmError::Io`] para o chamador, sem retry interno.
//!
//! ## ⚠️ Atomicidade
//!
//! A escrita **não é atômica**: um crash no meio pode deixar o arquivo
//! truncado.

use std::path::Path;

use crate::core::{ConceptLayerSnapshot, SharedWorldGraph, WorldGraph};
use crate::error::{CbwmError, Result};

/// Serializa a camada de conceitos de `graph` e grava em `path`.
pub fn log_concept_layer(graph: &WorldGraph, path: impl AsRef<Path>) -> Result<()> {
    let snapshot = graph.serialize_concept_layer();
    write_json(path.as_ref(), &snapshot)?;
    tracing::info!(
        path = %path.as_ref().display(),
        entities = snapshot.entity_concepts.len(),
        "Camada de conceitos registrada"
    );
    Ok(())
}

/// Lê um arquivo escrito por [`log_concept_layer`].
pub fn load_concept_layer(path: impl AsRef<Path>) -> Result<ConceptLayerSnapshot> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(CbwmError::io(path))?;
    Ok(serde_json::from_str(&json)?)
}

/// Salva o grafo inteiro. Adquire apenas um read lock.
pub fn save_world_graph(graph: &SharedWorldGraph, path: impl AsRef<Path>) -> Result<()> {
    let graph = graph.read();
    write_json(path.as_ref(), &*graph)
}

/// Carrega o grafo do disco, ou devolve um grafo vazio se o arquivo não existir.
///
/// Os índices de adjacência são reconstruídos após desserializar.
pub fn load_world_graph(path: impl AsRef<Path>) -> Result<WorldGraph> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("Nenhum {} encontrado, iniciando grafo vazio", path.display());
        return Ok(WorldGraph::new());
    }
    let json = std::fs::read_to_string(path).map_err(CbwmError::io(path))?;
    let mut graph: WorldGraph = serde_json::from_str(&json)?;
    graph.rebuild_index();
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "World graph carregado do disco"
    );
    Ok(graph)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(CbwmError::io(parent))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(CbwmError::io(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConceptAnnotation, Node, Relation};

    fn annotated_graph(confidence: f64) -> (WorldGraph, crate::core::NodeId) {
        let mut wg = WorldGraph::new();
        let obj = wg.add_node(Node::object("obj", "mug"));
        wg.add_or_update_concept_annotation(obj, &ConceptAnnotation::new(vec!["cup".into()], vec![confidence]))
            .unwrap();
        (wg, obj)
    }

    #[test]
    fn test_log_concept_layer_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("concepts.json");
        let (wg, _) = annotated_graph(0.5);

        wg.log_concept_layer(&path).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["entity_concepts"][0]["concept_labels"], serde_json::json!(["cup"]));

        let snapshot = load_concept_layer(&path).unwrap();
        assert_eq!(snapshot, wg.serialize_concept_layer());
    }

    #[test]
    fn test_log_write_failure_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // o "diretório pai" é um arquivo comum, então create_dir_all falha
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let (wg, _) = annotated_graph(0.5);

        let err = wg.log_concept_layer(blocker.join("concepts.json")).unwrap_err();
        assert!(matches!(err, CbwmError::Io { .. }));
    }

    #[test]
    fn test_world_graph_round_trip_rebuilds_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let (wg, obj) = annotated_graph(0.7);
        let concept = wg.concept_node_for(obj).unwrap();
        let shared = wg.into_shared();

        save_world_graph(&shared, &path).unwrap();
        let loaded = load_world_graph(&path).unwrap();

        assert_eq!(loaded.node_count(), 2);
        assert_eq!(loaded.concept_node_for(obj), Some(concept));
        assert_eq!(loaded.targets(concept, &Relation::Describes), vec![obj]);
        assert_eq!(loaded.concept_annotation(obj).unwrap().confidences, vec![0.7]);
    }

    #[test]
    fn test_missing_graph_file_gives_empty_graph() {
        let dir = tempfile::tempdir().unwrap();
        let graph = load_world_graph(dir.path().join("absent.json")).unwrap();
        assert_eq!(graph.node_count(), 0);
    }
}

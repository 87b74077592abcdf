//! # Erros do CBWM
//!
//! Um único enum [`CbwmError`] cobre as falhas recuperáveis da crate:
//! I/O de persistência, JSON, configuração e operações no grafo.
//!
//! Entradas ausentes (detecção vazia, config parcial, métrica desconhecida)
//! **não** são erros; têm defaults documentados em cada módulo.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::NodeId;

/// Alias de resultado usado em toda a biblioteca.
pub type Result<T> = std::result::Result<T, CbwmError>;

#[derive(Debug, Error)]
pub enum CbwmError {
    /// Falha ao ler ou escrever um arquivo. Nunca é engolida nem re-tentada.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Valor fora do domínio detectado em [`DecisionConfig::validate`](crate::planner::DecisionConfig::validate).
    #[error("invalid decision config: {0}")]
    InvalidConfig(String),

    #[error("node {0} is not in the world graph")]
    UnknownNode(NodeId),

    /// Tentativa de anotar um nó Concept como se fosse uma entidade.
    #[error("node {0} is a concept node and cannot carry concept annotations")]
    NotAnEntity(NodeId),

    /// Confiança NaN ou infinita; JSON não a representa.
    #[error("concept confidence for node {entity} must be finite (got {value})")]
    InvalidConfidence { entity: NodeId, value: f64 },

    #[error("no JSON/JSONL logs found under {}", .0.display())]
    NoLogFiles(PathBuf),

    #[error("no readable JSON records found in {files} files")]
    NoRecords { files: usize },
}

impl CbwmError {
    /// Atalho para `map_err` em operações de arquivo.
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| CbwmError::Io { path, source }
    }
}

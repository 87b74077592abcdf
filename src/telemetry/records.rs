//! Registros de log → séries de confiança/divergência.
//!
//! Cada arquivo é lido linha a linha (JSONL). Na primeira linha inválida o
//! arquivo inteiro é tentado como um único documento JSON (objeto ou lista
//! de objetos) e o resto das linhas é descartado. Arquivos que não rendem
//! nenhum registro são falha dura em [`load_records`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CbwmError, Result};
use crate::planner::BeliefMetrics;

/// Extensões aceitas ao varrer um diretório, na ordem de coleta.
const LOG_EXTENSIONS: [&str; 3] = ["json", "jsonl", "log"];

const STEP_KEYS: [&str; 3] = ["step", "timestep", "episode_step"];

pub type Record = Map<String, Value>;

/// Um ponto das séries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BeliefSample {
    pub step: i64,
    pub avg_concept_confidence: f64,
    pub divergence: f64,
}

impl BeliefSample {
    /// Snapshot de métricas para o hook de decisão.
    ///
    /// A divergência entra como escalar e também sob `divergence_key`, para
    /// que o hook a encontre qualquer que seja a métrica configurada.
    pub fn to_metrics(&self, divergence_key: &str) -> BeliefMetrics {
        BeliefMetrics::new(self.avg_concept_confidence, self.divergence)
            .with_metric(divergence_key, self.divergence)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BeliefSeries {
    pub divergence_key: String,
    pub samples: Vec<BeliefSample>,
}

impl BeliefSeries {
    pub fn steps(&self) -> Vec<i64> {
        self.samples.iter().map(|s| s.step).collect()
    }

    pub fn confidences(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.avg_concept_confidence).collect()
    }

    pub fn divergences(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.divergence).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Um arquivo vira `[path]`; um diretório vira seus `*.json`, `*.jsonl` e
/// `*.log` (exceto ocultos), cada grupo de extensão em ordem alfabética.
pub fn collect_log_files(input: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(input).map_err(CbwmError::io(input))? {
        let path = entry.map_err(CbwmError::io(input))?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if path.is_file() && !hidden {
            entries.push(path);
        }
    }

    let mut files = Vec::new();
    for ext in LOG_EXTENSIONS {
        let mut group: Vec<PathBuf> = entries
            .iter()
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
            .cloned()
            .collect();
        group.sort();
        files.extend(group);
    }
    Ok(files)
}

/// Lê todos os registros (objetos JSON) dos arquivos, em ordem.
pub fn read_records(files: &[PathBuf]) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for path in files {
        let content = std::fs::read_to_string(path).map_err(CbwmError::io(path))?;
        parse_records(path, &content, &mut records);
    }
    Ok(records)
}

fn parse_records(path: &Path, content: &str, out: &mut Vec<Record>) {
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(record)) => out.push(record),
            Ok(_) => {}
            Err(_) => {
                // JSON multi-linha: tenta o arquivo inteiro e encerra o arquivo
                match serde_json::from_str::<Value>(content) {
                    Ok(Value::Object(record)) => out.push(record),
                    Ok(Value::Array(items)) => out.extend(items.into_iter().filter_map(|item| match item {
                        Value::Object(record) => Some(record),
                        _ => None,
                    })),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Linhas ilegíveis ignoradas");
                    }
                }
                break;
            }
        }
    }
}

/// Coleta e lê os registros sob `input`.
///
/// # Erros
///
/// - [`CbwmError::NoLogFiles`] — nenhum arquivo casou
/// - [`CbwmError::NoRecords`] — os arquivos não renderam registro algum
pub fn load_records(input: impl AsRef<Path>) -> Result<Vec<Record>> {
    let input = input.as_ref();
    let files = collect_log_files(input)?;
    if files.is_empty() {
        return Err(CbwmError::NoLogFiles(input.to_path_buf()));
    }
    let records = read_records(&files)?;
    if records.is_empty() {
        return Err(CbwmError::NoRecords { files: files.len() });
    }
    tracing::info!(files = files.len(), records = records.len(), "Registros de crença carregados");
    Ok(records)
}

/// Métrica numérica no topo do registro ou sob `metrics`.
pub fn extract_metric(record: &Record, key: &str) -> Option<f64> {
    if let Some(v) = record.get(key).and_then(Value::as_f64) {
        return Some(v);
    }
    record
        .get("metrics")
        .and_then(Value::as_object)
        .and_then(|metrics| metrics.get(key))
        .and_then(Value::as_f64)
}

/// Média de um mapa `concept_confidence` não vazio; senão a métrica
/// `avg_concept_confidence`.
pub fn average_concept_confidence(record: &Record) -> Option<f64> {
    if let Some(concepts) = record.get("concept_confidence").and_then(Value::as_object) {
        let values: Vec<f64> = concepts.values().filter_map(Value::as_f64).collect();
        if !values.is_empty() {
            return Some(values.iter().sum::<f64>() / values.len() as f64);
        }
    }
    extract_metric(record, "avg_concept_confidence")
}

fn record_step(record: &Record) -> Option<i64> {
    STEP_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))))
}

fn record_divergence(record: &Record, key: &str) -> Option<f64> {
    extract_metric(record, key).or_else(|| {
        ["divergence", "belief_divergence"]
            .iter()
            .find_map(|name| {
                record
                    .get(*name)
                    .and_then(Value::as_object)
                    .filter(|map| !map.is_empty())
            })
            .and_then(|metrics| metrics.get(key))
            .and_then(Value::as_f64)
    })
}

/// Monta as séries: passo (ou índice), confiança (default 1.0) e
/// divergência `divergence_key` (default 0.0).
pub fn prepare_series(records: &[Record], divergence_key: &str) -> BeliefSeries {
    let samples = records
        .iter()
        .enumerate()
        .map(|(idx, record)| BeliefSample {
            step: record_step(record).unwrap_or(idx as i64),
            avg_concept_confidence: average_concept_confidence(record).unwrap_or(1.0),
            divergence: record_divergence(record, divergence_key).unwrap_or(0.0),
        })
        .collect();
    BeliefSeries {
        divergence_key: divergence_key.to_string(),
        samples,
    }
}

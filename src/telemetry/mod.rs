//! # Módulo Telemetry — Leitura dos Logs de Crença
//!
//! Lê os registros JSON/JSONL que o planner grava a cada passo e os
//! transforma em duas séries temporais: confiança média de conceitos e
//! divergência de crenças. A renderização (gráficos) fica fora desta crate;
//! aqui só existe o contrato de formato dos registros.
//!
//! ## Formato Tolerado
//!
//! ```json
//! {"step": 3, "metrics": {"belief_divergence": 0.21}, "concept_confidence": {"cup": 0.9, "mug": 0.4}}
//! {"timestep": 4, "avg_concept_confidence": 0.7, "divergence": {"concept_js_divergence": 0.12}}
//! ```

pub mod records;

pub use records::{
    average_concept_confidence, collect_log_files, extract_metric, load_records, prepare_series,
    read_records, BeliefSample, BeliefSeries, Record,
};

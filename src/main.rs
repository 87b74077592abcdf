//! # cbwm-report — Linha do Tempo de Decisões CBWM
//!
//! Lê os logs de crença gravados pelo planner, reavalia o hook de decisão
//! em cada passo e imprime uma linha por passo.
//!
//! ```bash
//! # logs em um diretório, config padrão
//! cbwm-report outputs/belief_logs
//!
//! # arquivo único com config TOML e logs detalhados
//! RUST_LOG=debug cbwm-report outputs/run.jsonl cbwm.toml
//! ```
//!
//! Saída:
//!
//! ```text
//! step  conf  div   action             reason
//! 0     0.92  0.05  -
//! 1     0.88  0.51  CorrectHuman       Belief divergence (belief_divergence) 0.51 exceeds correction threshold 0.45.
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cbwm_core::planner::{BeliefDecisionHook, DecisionConfig};
use cbwm_core::telemetry::{load_records, prepare_series};

const DEFAULT_LOG_PATH: &str = "outputs";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_LOG_PATH.to_string()));
    let config = match args.next() {
        Some(path) => DecisionConfig::load(&path)
            .with_context(|| format!("Falha ao carregar config {path}"))?,
        None => DecisionConfig::from_env().context("Overrides de ambiente inválidos")?,
    };

    let hook = BeliefDecisionHook::new(config).context("Config de decisão inválida")?;
    let metric = hook.config().divergence_metric_type.clone();

    let records = load_records(&input)
        .with_context(|| format!("Falha ao ler logs de crença em {}", input.display()))?;
    let series = prepare_series(&records, &metric);

    println!("{:<6}{:<6}{:<6}{:<19}reason", "step", "conf", "div", "action");
    let mut triggered = 0usize;
    for sample in &series.samples {
        let decision = hook.decide(&sample.to_metrics(&metric));
        if decision.should_act() {
            triggered += 1;
        }
        println!(
            "{:<6}{:<6.2}{:<6.2}{:<19}{}",
            sample.step,
            sample.avg_concept_confidence,
            sample.divergence,
            decision.action.as_deref().unwrap_or("-"),
            decision.reason
        );
    }

    tracing::info!(steps = series.len(), triggered, metric = %metric, "Relatório CBWM concluído");
    Ok(())
}

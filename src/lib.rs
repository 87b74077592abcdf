//! # CBWM — Confidence-Based World Model Hooks
//!
//! Núcleo de decisão de um planner embarcado que mantém um **world graph**
//! simbólico dos objetos percebidos. A cada passo o planner precisa decidir
//! se confia nas crenças atuais ou se invoca uma ação corretiva: perguntar a
//! um humano, observar mais, ou olhar de novo para desambiguar.
//!
//! ## Fluxo
//!
//! ```text
//! percepção ── detected_type ──▶ perception::map_detection_to_concepts
//!                                   │ labels + confidences
//!                                   ▼
//!                          core::WorldGraph (camada de conceitos)
//!                                   │ estatísticas agregadas pelo planner
//!                                   ▼
//!                          planner::BeliefMetrics
//!                                   │ + DecisionConfig
//!                                   ▼
//!                          planner::BeliefDecisionHook ──▶ ação? + razão
//! ```
//!
//! ## Módulos
//!
//! - [`core`] — world graph em arena, nós Concept e a camada de conceitos
//! - [`perception`] — categoria detectada → rótulos de conceito
//! - [`planner`] — métricas de crença, config e o hook de decisão
//! - [`persistence`] — JSON em disco (camada de conceitos, grafo inteiro)
//! - [`telemetry`] — leitura dos logs de crença em séries temporais
//! - [`error`] — [`CbwmError`] e o alias [`Result`]

pub mod core;
pub mod error;
pub mod perception;
pub mod persistence;
pub mod planner;
pub mod telemetry;

pub use error::{CbwmError, Result};

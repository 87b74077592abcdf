//! # Módulo Planner — Confiar nas Crenças ou Corrigir?
//!
//! A cada passo o planner agrega confiança de conceitos e divergência de
//! crenças num [`BeliefMetrics`] e consulta o [`BeliefDecisionHook`]. O hook
//! devolve, no máximo, **uma** ação corretiva (perguntar a um humano,
//! observar mais, olhar para desambiguar) e a razão legível da escolha.
//!
//! | Tipo | Papel |
//! |------|-------|
//! | [`BeliefMetrics`] | snapshot imutável de confiança/divergência |
//! | [`DecisionConfig`] | limiares e nomes de ações, com defaults |
//! | [`BeliefDecisionHook`] | hook com config validada na construção |
//! | [`choose_belief_action`] | avaliação avulsa, por chamada |

pub mod config;
pub mod hooks;
pub mod metrics;

pub use config::DecisionConfig;
pub use hooks::{
    choose_belief_action, BeliefDecision, BeliefDecisionHook, DecisionBranch, Thresholds,
    HOOKS_DISABLED_REASON,
};
pub use metrics::{BeliefMetrics, BELIEF_DIVERGENCE};

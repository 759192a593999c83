//! Shared CLI types for the simulator.

use clap::ValueEnum;
use spy_engine::behavior::{AgentPlayer, VoteStrategy, WorkflowPlayer};

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per game, plus the CSV summary
    Jsonl,
    /// CSV summary only
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Workflow,
    Agent,
}

impl ModeArg {
    pub fn name(self) -> &'static str {
        match self {
            ModeArg::Workflow => WorkflowPlayer::MODE,
            ModeArg::Agent => AgentPlayer::MODE,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    EliminatePrime,
    Consensus,
    Defensive,
}

impl StrategyArg {
    pub fn strategy(self) -> VoteStrategy {
        match self {
            StrategyArg::EliminatePrime => VoteStrategy::EliminatePrime,
            StrategyArg::Consensus => VoteStrategy::Consensus,
            StrategyArg::Defensive => VoteStrategy::Defensive,
        }
    }
}

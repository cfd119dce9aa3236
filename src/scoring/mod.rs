//! Quantile scoring: pinball loss, CRPS and skill scores.

mod crps;
mod engine;
mod pinball;
mod skill;

pub use crps::{crps, sample_crps, CrpsMethod};
pub use engine::{EvaluationReport, ModelScore, QuantileScores, ScoreEngine, ScoringConfig};
pub use pinball::{pinball_loss, pinball_loss_with};
pub use skill::skill_score;

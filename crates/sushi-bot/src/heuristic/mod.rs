mod components;

pub use components::{
    interference_score, long_horizon_score, marginal_dumpling_value, potential_score,
    raw_potential, score_differential,
};

use serde::{Deserialize, Serialize};
use sushi_core::game::GameView;
use sushi_core::model::player::PlayerId;
use tracing::{Level, event};

pub const DEFAULT_TOTAL_ROUNDS: u32 = 3;

/// Scores a fully observed state from one player's perspective.
///
/// Implementations must be pure: the same state and player always produce
/// the same value.
pub trait StateHeuristic<S: ?Sized> {
    fn evaluate(&self, state: &S, player: PlayerId) -> f64;
}

impl<S, F> StateHeuristic<S> for F
where
    S: ?Sized,
    F: Fn(&S, PlayerId) -> f64,
{
    fn evaluate(&self, state: &S, player: PlayerId) -> f64 {
        self(state, player)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    pub current_score: f64,
    pub potential: f64,
    pub interference: f64,
    pub long_horizon: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            current_score: 0.57,
            potential: 0.18,
            interference: 0.15,
            long_horizon: 0.10,
        }
    }
}

impl HeuristicWeights {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("current_score", self.current_score),
            ("potential", self.potential),
            ("interference", self.interference),
            ("long_horizon", self.long_horizon),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub weights: HeuristicWeights,
    /// Rounds in a game; the last one switches the pudding term to its
    /// end-of-game form.
    pub total_rounds: u32,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            weights: HeuristicWeights::default(),
            total_rounds: DEFAULT_TOTAL_ROUNDS,
        }
    }
}

/// The four sub-scores and their weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeuristicBreakdown {
    pub current_score: f64,
    pub potential: f64,
    pub interference: f64,
    pub long_horizon: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SushiHeuristic {
    config: HeuristicConfig,
}

impl SushiHeuristic {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    pub fn with_weights(weights: HeuristicWeights) -> Self {
        Self::new(HeuristicConfig {
            weights,
            ..HeuristicConfig::default()
        })
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    pub fn breakdown<S>(&self, state: &S, player: PlayerId) -> HeuristicBreakdown
    where
        S: GameView + ?Sized,
    {
        let weights = &self.config.weights;
        let current_score = score_differential(state, player);
        let potential = potential_score(state, player);
        let interference = interference_score(state, player);
        let long_horizon = long_horizon_score(state, player, self.config.total_rounds);

        let total = weights.current_score * current_score
            + weights.potential * potential
            + weights.interference * interference
            + weights.long_horizon * long_horizon;

        HeuristicBreakdown {
            current_score,
            potential,
            interference,
            long_horizon,
            total,
        }
    }
}

impl<S> StateHeuristic<S> for SushiHeuristic
where
    S: GameView + ?Sized,
{
    fn evaluate(&self, state: &S, player: PlayerId) -> f64 {
        let parts = self.breakdown(state, player);
        if tracing::enabled!(target: "sushi_bot::heuristic", Level::TRACE) {
            event!(
                target: "sushi_bot::heuristic",
                Level::TRACE,
                player = %player,
                round = state.round_index(),
                total = parts.total,
                current_score = parts.current_score,
                potential = parts.potential,
                interference = parts.interference,
                long_horizon = parts.long_horizon,
            );
        }
        parts.total
    }
}

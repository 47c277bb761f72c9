use crate::heuristic::StateHeuristic;
use rand::RngCore;
use sushi_core::game::{ApplyAction, Determinize};
use sushi_core::model::player::PlayerId;

/// Diagnostic score for a candidate action, reported next to the ensemble mean.
pub trait ActionScorer<S, A> {
    /// `None` when the action could not be scored on a sampled world.
    fn score(&self, state: &S, player: PlayerId, action: &A, rng: &mut dyn RngCore)
    -> Option<f64>;
}

/// Applies the action to a fresh determinization and evaluates the result.
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer<H> {
    heuristic: H,
}

impl<H> HeuristicScorer<H> {
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }
}

impl<S, A, H> ActionScorer<S, A> for HeuristicScorer<H>
where
    S: Determinize,
    A: ApplyAction<S>,
    H: StateHeuristic<S>,
{
    fn score(
        &self,
        state: &S,
        player: PlayerId,
        action: &A,
        rng: &mut dyn RngCore,
    ) -> Option<f64> {
        let mut world = state.determinize(player, rng).ok()?;
        action.apply_to(&mut world).ok()?;
        Some(self.heuristic.evaluate(&world, player))
    }
}

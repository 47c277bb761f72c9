use super::{Decision, DecisionError, DecisionStats, EnsembleConfig, TARGET};
use crate::policy::DecisionPolicy;
use crate::search::{SearchProcedure, SearchTree, action_value};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::time::Instant;
use sushi_core::game::GameView;
use sushi_core::model::player::PlayerId;
use tracing::{Level, event};

/// Single search on the true state; the procedure handles hidden information.
pub struct DelegatingPlanner<P> {
    player: PlayerId,
    search: P,
    config: EnsembleConfig,
    rng: SmallRng,
    stats: DecisionStats,
}

impl<P> DelegatingPlanner<P> {
    pub fn new(player: PlayerId, search: P) -> Self {
        Self {
            player,
            search,
            config: EnsembleConfig::default(),
            rng: SmallRng::from_entropy(),
            stats: DecisionStats::default(),
        }
    }

    pub fn with_config(mut self, config: EnsembleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn stats(&self) -> DecisionStats {
        self.stats
    }

    pub fn decide_with_report<S, A>(
        &mut self,
        state: &S,
        legal: &[A],
    ) -> Result<Decision<A>, DecisionError>
    where
        S: GameView + Clone,
        A: Clone + PartialEq + fmt::Display,
        P: SearchProcedure<S, A>,
    {
        let started = Instant::now();
        let Some(first) = legal.first() else {
            return Err(DecisionError::NoLegalActions);
        };
        if legal.len() == 1 && self.config.short_circuit_single {
            let decision = Decision {
                action: first.clone(),
                completed_samples: 0,
                failed_samples: 0,
                timed_out: false,
                fallback: false,
                short_circuit: true,
                elapsed: started.elapsed(),
                action_values: vec![(first.clone(), None)],
            };
            self.stats.absorb(&decision);
            return Ok(decision);
        }

        let budget = self
            .config
            .time_budget()
            .saturating_sub(self.config.safety_margin());
        let outcome = self.search.run(state.clone(), legal, budget);

        let mut best: Option<(usize, f64)> = None;
        let mut action_values = Vec::with_capacity(legal.len());
        let (completed, failed) = match &outcome {
            Ok(tree) => {
                let expanded = tree.has_children();
                for (index, action) in legal.iter().enumerate() {
                    let value = action_value(tree, action);
                    action_values.push((action.clone(), expanded.then_some(value)));
                    if !value.is_nan() && best.is_none_or(|(_, current)| value > current) {
                        best = Some((index, value));
                    }
                }
                (1, 0)
            }
            Err(err) => {
                event!(
                    target: TARGET,
                    Level::WARN,
                    agent = %self.player,
                    error = %err,
                    "delegated search failed"
                );
                action_values.extend(legal.iter().map(|action| (action.clone(), None)));
                (0, 1)
            }
        };

        let (action, fallback) = match best {
            Some((index, _)) => (legal[index].clone(), false),
            None => (legal[self.rng.gen_range(0..legal.len())].clone(), true),
        };

        let decision = Decision {
            action,
            completed_samples: completed,
            failed_samples: failed,
            timed_out: false,
            fallback,
            short_circuit: false,
            elapsed: started.elapsed(),
            action_values,
        };
        self.stats.absorb(&decision);
        event!(
            target: TARGET,
            Level::INFO,
            agent = %self.player,
            round = state.round_index(),
            turn = state.turn_index(),
            fallback,
            chosen = %decision.action,
            "delegated decision"
        );
        Ok(decision)
    }
}

impl<S, A, P> DecisionPolicy<S, A> for DelegatingPlanner<P>
where
    S: GameView + Clone,
    A: Clone + PartialEq + fmt::Display,
    P: SearchProcedure<S, A>,
{
    fn decide(&mut self, state: &S, legal: &[A]) -> Result<A, DecisionError> {
        self.decide_with_report(state, legal)
            .map(|decision| decision.action)
    }

    fn stats(&self) -> DecisionStats {
        self.stats
    }
}

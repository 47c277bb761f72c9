//! Ensemble determinization planner.
//!
//! Each decision samples up to `samples` determinizations of the true state,
//! runs the search procedure once per determinization and averages the root
//! action values across the samples that completed. The timeout is checked
//! between samples only; a search that is already running is never cut short.
//! When nothing completes, a legal action is drawn uniformly at random.

mod accumulator;
mod delegating;
mod scoring;

pub use accumulator::ActionValueAccumulator;
pub use delegating::DelegatingPlanner;
pub use scoring::{ActionScorer, HeuristicScorer};

use crate::policy::DecisionPolicy;
use crate::search::{SearchError, SearchProcedure, action_value};
use crate::telemetry::{self, CandidateScore, DecisionLogger, DecisionRecord};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use sushi_core::game::{Determinize, GameView, SamplingError};
use sushi_core::model::player::PlayerId;
use thiserror::Error;
use tracing::{Level, event};

const TARGET: &str = "sushi_bot::ensemble";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub samples: usize,
    pub time_budget_ms: u64,
    pub safety_margin_ms: u64,
    /// Budget handed to each search call; `None` splits the decision budget
    /// evenly across samples.
    pub search_budget_ms: Option<u64>,
    pub short_circuit_single: bool,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            samples: 10,
            time_budget_ms: 1000,
            safety_margin_ms: 50,
            search_budget_ms: None,
            short_circuit_single: true,
        }
    }
}

impl EnsembleConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn safety_margin(&self) -> Duration {
        Duration::from_millis(self.safety_margin_ms)
    }

    /// Per-search budget for a decision with the given sample count and budget.
    pub fn search_budget(&self, samples: usize, budget: Duration) -> Duration {
        let floor = Duration::from_millis(1);
        match self.search_budget_ms {
            Some(ms) => Duration::from_millis(ms).max(floor),
            None => {
                let parts = u32::try_from(samples.max(1)).unwrap_or(u32::MAX);
                (budget / parts).max(floor)
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("no legal actions to choose from")]
    NoLegalActions,
}

/// Outcome of one decision, with the evidence it was based on.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<A> {
    pub action: A,
    pub completed_samples: usize,
    pub failed_samples: usize,
    pub timed_out: bool,
    pub fallback: bool,
    pub short_circuit: bool,
    pub elapsed: Duration,
    /// Mean value per legal action in legal order; `None` where no sample contributed.
    pub action_values: Vec<(A, Option<f64>)>,
}

/// Counters accumulated over a planner's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionStats {
    pub decisions: u64,
    pub short_circuits: u64,
    pub degraded: u64,
    pub completed_samples: u64,
    pub failed_samples: u64,
    pub timeouts: u64,
    pub log_failures: u64,
}

impl DecisionStats {
    fn absorb<A>(&mut self, decision: &Decision<A>) {
        self.decisions += 1;
        self.short_circuits += u64::from(decision.short_circuit);
        self.degraded += u64::from(decision.fallback);
        self.timeouts += u64::from(decision.timed_out);
        self.completed_samples += decision.completed_samples as u64;
        self.failed_samples += decision.failed_samples as u64;
    }
}

enum SampleFailure {
    Determinize(SamplingError),
    Search(SearchError),
}

impl fmt::Display for SampleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleFailure::Determinize(err) => write!(f, "determinization failed: {err}"),
            SampleFailure::Search(err) => write!(f, "{err}"),
        }
    }
}

pub struct EnsemblePlanner<S, A, P> {
    player: PlayerId,
    search: P,
    config: EnsembleConfig,
    rng: SmallRng,
    logger: Option<Box<dyn DecisionLogger + Send>>,
    scorer: Option<Box<dyn ActionScorer<S, A> + Send>>,
    stats: DecisionStats,
}

impl<S, A, P> EnsemblePlanner<S, A, P>
where
    S: GameView + Determinize,
    A: Clone + PartialEq + fmt::Display,
    P: SearchProcedure<S, A>,
{
    pub fn new(player: PlayerId, search: P) -> Self {
        Self {
            player,
            search,
            config: EnsembleConfig::default(),
            rng: SmallRng::from_entropy(),
            logger: None,
            scorer: None,
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

    pub fn with_logger(mut self, logger: impl DecisionLogger + Send + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn with_scorer(mut self, scorer: impl ActionScorer<S, A> + Send + 'static) -> Self {
        self.scorer = Some(Box::new(scorer));
        self
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn stats(&self) -> DecisionStats {
        self.stats
    }

    pub fn search(&self) -> &P {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut P {
        &mut self.search
    }

    /// Chooses an action with the configured sample count and time budget.
    pub fn decide(&mut self, state: &S, legal: &[A]) -> Result<A, DecisionError> {
        let samples = self.config.samples;
        let budget = self.config.time_budget();
        self.decide_with(state, legal, samples, budget)
    }

    pub fn decide_with(
        &mut self,
        state: &S,
        legal: &[A],
        samples: usize,
        budget: Duration,
    ) -> Result<A, DecisionError> {
        self.decide_with_report(state, legal, samples, budget)
            .map(|decision| decision.action)
    }

    pub fn decide_with_report(
        &mut self,
        state: &S,
        legal: &[A],
        samples: usize,
        budget: Duration,
    ) -> Result<Decision<A>, DecisionError> {
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
            event!(
                target: TARGET,
                Level::DEBUG,
                agent = %self.player,
                chosen = %decision.action,
                "single legal action"
            );
            return Ok(decision);
        }

        let deadline = budget.saturating_sub(self.config.safety_margin());
        let search_budget = self.config.search_budget(samples, budget);
        let mut accumulator = ActionValueAccumulator::new(legal);
        let mut completed = 0usize;
        let mut failed = 0usize;
        let mut timed_out = false;

        for sample in 0..samples {
            if started.elapsed() >= deadline {
                timed_out = true;
                break;
            }
            match self.run_sample(state, legal, search_budget) {
                Ok(tree) => {
                    for action in legal {
                        accumulator.add(action, action_value(&tree, action));
                    }
                    completed += 1;
                    if tracing::enabled!(target: TARGET, Level::TRACE) {
                        event!(
                            target: TARGET,
                            Level::TRACE,
                            agent = %self.player,
                            sample,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "sample completed"
                        );
                    }
                }
                Err(failure) => {
                    failed += 1;
                    self.report_failure(sample, &failure);
                }
            }
        }

        let (action, fallback) = match accumulator.best() {
            Some(best) => (best.clone(), false),
            None => (self.random_action(legal), true),
        };

        let decision = Decision {
            action,
            completed_samples: completed,
            failed_samples: failed,
            timed_out,
            fallback,
            short_circuit: false,
            elapsed: started.elapsed(),
            action_values: accumulator.means(),
        };
        self.stats.absorb(&decision);
        self.log_decision_event(state, legal.len(), &decision);
        self.record(state, &decision);
        Ok(decision)
    }

    fn run_sample(
        &mut self,
        state: &S,
        legal: &[A],
        budget: Duration,
    ) -> Result<P::Tree, SampleFailure> {
        let world = state
            .determinize(self.player, &mut self.rng)
            .map_err(SampleFailure::Determinize)?;
        self.search
            .run(world, legal, budget)
            .map_err(SampleFailure::Search)
    }

    fn random_action(&mut self, legal: &[A]) -> A {
        let index = self.rng.gen_range(0..legal.len());
        legal[index].clone()
    }

    fn report_failure(&self, sample: usize, failure: &SampleFailure) {
        match failure {
            SampleFailure::Search(SearchError::CorruptedState { .. }) => {
                event!(
                    target: TARGET,
                    Level::WARN,
                    agent = %self.player,
                    sample,
                    error = %failure,
                    "search corrupted its determinization; discarded"
                );
            }
            _ => {
                event!(
                    target: TARGET,
                    Level::WARN,
                    agent = %self.player,
                    sample,
                    error = %failure,
                    "sample failed"
                );
            }
        }
    }

    fn log_decision_event(&self, state: &S, legal_count: usize, decision: &Decision<A>) {
        if decision.fallback {
            event!(
                target: TARGET,
                Level::WARN,
                agent = %self.player,
                round = state.round_index(),
                turn = state.turn_index(),
                completed = decision.completed_samples,
                failed = decision.failed_samples,
                timed_out = decision.timed_out,
                chosen = %decision.action,
                "no sample completed; chose uniformly at random"
            );
            return;
        }

        if !tracing::enabled!(target: TARGET, Level::INFO) {
            return;
        }

        event!(
            target: TARGET,
            Level::INFO,
            agent = %self.player,
            round = state.round_index(),
            turn = state.turn_index(),
            legal_count,
            completed = decision.completed_samples,
            failed = decision.failed_samples,
            timed_out = decision.timed_out,
            elapsed_ms = decision.elapsed.as_millis() as u64,
            chosen = %decision.action,
        );
    }

    fn record(&mut self, state: &S, decision: &Decision<A>) {
        if self.logger.is_none() {
            return;
        }

        let mut candidates = Vec::with_capacity(decision.action_values.len());
        for (action, mean_value) in &decision.action_values {
            let heuristic = match &self.scorer {
                Some(scorer) => scorer.score(state, self.player, action, &mut self.rng),
                None => None,
            };
            candidates.push(CandidateScore {
                action: action.to_string(),
                mean_value: *mean_value,
                heuristic,
            });
        }

        let record = DecisionRecord {
            timestamp_ms: telemetry::now_ms(),
            decision_index: self.stats.decisions,
            agent: self.player.to_string(),
            round: state.round_index(),
            turn: state.turn_index(),
            player_count: state.player_count(),
            chosen: decision.action.to_string(),
            candidates,
            completed_samples: decision.completed_samples,
            failed_samples: decision.failed_samples,
            timed_out: decision.timed_out,
            fallback: decision.fallback,
            elapsed_ms: decision.elapsed.as_millis() as u64,
        };

        let Some(logger) = &self.logger else {
            return;
        };
        if let Err(err) = logger.record(&record) {
            self.stats.log_failures += 1;
            event!(
                target: "sushi_bot::telemetry",
                Level::WARN,
                agent = %self.player,
                error = %err,
                "decision record dropped"
            );
        }
    }
}

impl<S, A, P> DecisionPolicy<S, A> for EnsemblePlanner<S, A, P>
where
    S: GameView + Determinize,
    A: Clone + PartialEq + fmt::Display,
    P: SearchProcedure<S, A>,
{
    fn decide(&mut self, state: &S, legal: &[A]) -> Result<A, DecisionError> {
        EnsemblePlanner::decide(self, state, legal)
    }

    fn stats(&self) -> DecisionStats {
        self.stats
    }
}

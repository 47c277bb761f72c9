pub mod config;
pub mod ensemble;
pub mod heuristic;
pub mod logging;
pub mod policy;
pub mod search;
pub mod telemetry;

pub use config::{BotConfig, ConfigError, ValidationError};
pub use ensemble::{
    ActionScorer, ActionValueAccumulator, Decision, DecisionError, DecisionStats,
    DelegatingPlanner, EnsembleConfig, EnsemblePlanner, HeuristicScorer,
};
pub use heuristic::{HeuristicConfig, HeuristicWeights, StateHeuristic, SushiHeuristic};
pub use policy::DecisionPolicy;
pub use search::{ChildStats, RootStats, SearchError, SearchProcedure, SearchTree, action_value};
pub use telemetry::{DecisionLogger, DecisionRecord, TelemetryError};

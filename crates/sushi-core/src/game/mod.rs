pub mod serialization;
pub mod table;
pub mod view;

pub use table::{PlayCard, RulesError, TableError, TableState};
pub use view::{ApplyAction, Determinize, GameView, SamplingError};

//! Read and sampling contracts a game state exposes to decision code.
//!
//! - [`GameView`]: public accessors the state heuristic reads.
//! - [`Determinize`]: re-samples information hidden from one observer.
//! - [`ApplyAction`]: commits an action to a cloned state (diagnostics only).

use crate::model::card::CardType;
use crate::model::player::PlayerId;
use rand::Rng;
use std::fmt;

/// Read-only view over a fully or partially observed game snapshot.
pub trait GameView {
    fn player_count(&self) -> usize;

    fn score(&self, player: PlayerId) -> i32;

    /// One-based round counter; the first round is round 1.
    fn round_index(&self) -> u32;

    fn turn_index(&self) -> u32;

    /// Cards of `card` kind `player` has played this round.
    fn played_count(&self, card: CardType, player: PlayerId) -> u32;

    /// Cards of `card` kind `player` has played across the whole game.
    fn cumulative_played_count(&self, card: CardType, player: PlayerId) -> u32;
}

/// Produces a determinization: a copy in which everything `observer` cannot
/// see is freshly randomized, consistent with public information.
///
/// The returned state is independent of `self`; mutating it never affects the
/// original.
pub trait Determinize: Sized {
    fn determinize<R: Rng + ?Sized>(
        &self,
        observer: PlayerId,
        rng: &mut R,
    ) -> Result<Self, SamplingError>;
}

/// Applies an action to a state in place.
pub trait ApplyAction<S> {
    type Error: std::error::Error;

    fn apply_to(&self, state: &mut S) -> Result<(), Self::Error>;
}

/// Errors that can arise while re-sampling hidden information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplingError {
    UnknownObserver { observer: PlayerId },
    InsufficientPool { seat: PlayerId, needed: usize, available: usize },
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::UnknownObserver { observer } => {
                write!(f, "observer {observer} is not seated at this table")
            }
            SamplingError::InsufficientPool {
                seat,
                needed,
                available,
            } => write!(
                f,
                "cannot deal {needed} hidden cards to {seat}: only {available} left in pool"
            ),
        }
    }
}

impl std::error::Error for SamplingError {}

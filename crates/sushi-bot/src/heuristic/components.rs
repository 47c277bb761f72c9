//! The four sub-scores combined by [`SushiHeuristic`](super::SushiHeuristic).
//!
//! Each is a pure function of the observed table and the evaluated seat, and
//! each is squashed (tanh or fixed steps) into roughly `[-1, 1]`.

use sushi_core::game::GameView;
use sushi_core::model::card::CardType;
use sushi_core::model::player::PlayerId;

pub const SCORE_SCALE: f64 = 20.0;
pub const POTENTIAL_SCALE: f64 = 15.0;
pub const INTERFERENCE_SCALE: f64 = 5.0;

/// Lost value per wasabi with no nigiri left to dip.
pub const WASABI_WASTE_PENALTY: f64 = 0.8;

pub const TEMPURA_HALF_SET: f64 = 2.5;
pub const SASHIMI_ONE_OF_THREE: f64 = 2.0;
pub const SASHIMI_TWO_OF_THREE: f64 = 5.0;

pub const LONG_HORIZON_NUDGE: f64 = 0.125;

/// Cumulative dumpling points for 0..=5 dumplings; five or more is capped.
const DUMPLING_TOTALS: [u32; 6] = [0, 1, 3, 6, 10, 15];

/// `tanh((mine - best opponent) / 20)`. A table with no opponents compares
/// against zero.
pub fn score_differential<S>(state: &S, player: PlayerId) -> f64
where
    S: GameView + ?Sized,
{
    let mine = f64::from(state.score(player));
    let best_opponent = player
        .opponents(state.player_count())
        .map(|other| state.score(other))
        .max()
        .unwrap_or(0);
    ((mine - f64::from(best_opponent)) / SCORE_SCALE).tanh()
}

/// Points the next dumpling would add on top of `count` already played.
pub fn marginal_dumpling_value(count: u32) -> f64 {
    let current = DUMPLING_TOTALS[(count as usize).min(5)];
    let next = DUMPLING_TOTALS[(count as usize).saturating_add(1).min(5)];
    f64::from(next - current)
}

/// Unsquashed near-term potential: partial sets, the next dumpling, and
/// wasted wasabi.
pub fn raw_potential<S>(state: &S, player: PlayerId) -> f64
where
    S: GameView + ?Sized,
{
    let mut potential = 0.0;

    if state.played_count(CardType::Tempura, player) == 1 {
        potential += TEMPURA_HALF_SET;
    }

    match state.played_count(CardType::Sashimi, player) {
        1 => potential += SASHIMI_ONE_OF_THREE,
        2 => potential += SASHIMI_TWO_OF_THREE,
        _ => {}
    }

    potential += marginal_dumpling_value(state.played_count(CardType::Dumpling, player));

    let wasabi = state.played_count(CardType::Wasabi, player);
    let nigiri: u32 = CardType::NIGIRI
        .iter()
        .map(|kind| state.played_count(*kind, player))
        .sum();
    potential -= f64::from(wasabi.saturating_sub(nigiri)) * WASABI_WASTE_PENALTY;

    potential
}

pub fn potential_score<S>(state: &S, player: PlayerId) -> f64
where
    S: GameView + ?Sized,
{
    (raw_potential(state, player) / POTENTIAL_SCALE).tanh()
}

/// Maki race against the single strongest opponent only; the majority pays
/// first and second place, so the rest of the field is ignored.
pub fn interference_score<S>(state: &S, player: PlayerId) -> f64
where
    S: GameView + ?Sized,
{
    let mine = i64::from(state.played_count(CardType::Maki, player));
    let leader = player
        .opponents(state.player_count())
        .map(|other| i64::from(state.played_count(CardType::Maki, other)))
        .max()
        .unwrap_or(0);
    ((mine - leader) as f64 / INTERFERENCE_SCALE).tanh()
}

/// Whole-game pudding standing.
///
/// Before the final round this is a small symmetric nudge. In the final round
/// it is `+1` when strictly ahead of every opponent, `-1` when strictly behind
/// every opponent or level with the entire field, and `0` otherwise.
pub fn long_horizon_score<S>(state: &S, player: PlayerId, total_rounds: u32) -> f64
where
    S: GameView + ?Sized,
{
    let mine = state.cumulative_played_count(CardType::Pudding, player);
    let mut opponents = player
        .opponents(state.player_count())
        .map(|other| state.cumulative_played_count(CardType::Pudding, other));
    let Some(first) = opponents.next() else {
        return 0.0;
    };
    let (min_opponent, max_opponent) =
        opponents.fold((first, first), |(lo, hi), value| (lo.min(value), hi.max(value)));

    if state.round_index() < total_rounds {
        return if mine < min_opponent {
            -LONG_HORIZON_NUDGE
        } else {
            LONG_HORIZON_NUDGE
        };
    }

    if mine > max_opponent {
        1.0
    } else if mine < min_opponent || (mine == min_opponent && mine == max_opponent) {
        -1.0
    } else {
        0.0
    }
}

#![allow(dead_code)]

use std::time::Duration;
use sushi_bot::heuristic::{StateHeuristic, SushiHeuristic};
use sushi_bot::search::{RootStats, SearchError, SearchProcedure};
use sushi_core::game::{ApplyAction, PlayCard, TableState};
use sushi_core::model::card::CardType;
use sushi_core::model::hand::Hand;
use sushi_core::model::player::PlayerId;

pub const ME: PlayerId = PlayerId::new(0);

/// Three-player table dealt from a seeded deck.
pub fn dealt_table(seed: u64) -> TableState {
    TableState::with_seed(3, seed).expect("three seats")
}

/// Dealt table where `ME` holds exactly `cards`.
pub fn table_with_hand(seed: u64, cards: &[CardType]) -> TableState {
    let mut table = dealt_table(seed);
    table.set_hand(ME, Hand::with_cards(cards.to_vec()));
    table
}

pub fn plays(cards: &[CardType]) -> Vec<PlayCard> {
    cards.iter().map(|&card| PlayCard::new(ME, card)).collect()
}

/// One `PlayCard` per distinct card kind in `player`'s hand, in hand order.
pub fn legal_plays(table: &TableState, player: PlayerId) -> Vec<PlayCard> {
    let mut plays: Vec<PlayCard> = table
        .hand(player)
        .map(|hand| hand.iter().map(|&card| PlayCard::new(player, card)).collect())
        .unwrap_or_default();
    plays.dedup();
    plays
}

/// Search procedure whose result per call is decided by a closure.
pub struct Scripted<F> {
    pub calls: usize,
    pub budgets: Vec<Duration>,
    script: F,
}

impl<F> Scripted<F>
where
    F: FnMut(usize, &TableState) -> Result<RootStats<PlayCard>, SearchError>,
{
    pub fn new(script: F) -> Self {
        Self {
            calls: 0,
            budgets: Vec::new(),
            script,
        }
    }
}

impl<F> SearchProcedure<TableState, PlayCard> for Scripted<F>
where
    F: FnMut(usize, &TableState) -> Result<RootStats<PlayCard>, SearchError>,
{
    type Tree = RootStats<PlayCard>;

    fn run(
        &mut self,
        state: TableState,
        _actions: &[PlayCard],
        budget: Duration,
    ) -> Result<Self::Tree, SearchError> {
        let call = self.calls;
        self.calls += 1;
        self.budgets.push(budget);
        (self.script)(call, &state)
    }
}

/// One-ply lookahead: every action is applied and the result scored once.
pub struct GreedyLookahead {
    pub player: PlayerId,
    pub heuristic: SushiHeuristic,
}

impl GreedyLookahead {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            heuristic: SushiHeuristic::default(),
        }
    }
}

impl SearchProcedure<TableState, PlayCard> for GreedyLookahead {
    type Tree = RootStats<PlayCard>;

    fn run(
        &mut self,
        state: TableState,
        actions: &[PlayCard],
        _budget: Duration,
    ) -> Result<Self::Tree, SearchError> {
        let mut root = RootStats::new();
        for action in actions {
            let mut next = state.clone();
            action
                .apply_to(&mut next)
                .map_err(|err| SearchError::failed(err.to_string()))?;
            root.backup(*action, self.heuristic.evaluate(&next, self.player));
        }
        Ok(root)
    }
}

use super::view::{ApplyAction, Determinize, GameView, SamplingError};
use crate::model::card::CardType;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::{MAX_PLAYERS, MIN_PLAYERS, PlayerId};
use crate::model::score::ScoreBoard;
use crate::model::tally::CardTally;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Concrete table snapshot: scores, per-round and whole-game tallies, hands
/// and the undealt draw pile.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    round_index: u32,
    turn_index: u32,
    scores: ScoreBoard,
    round_tally: CardTally,
    game_tally: CardTally,
    hands: Vec<Hand>,
    draw_pile: Vec<CardType>,
}

impl TableState {
    /// Empty table at the start of round 1.
    pub fn new(player_count: usize) -> Result<Self, TableError> {
        check_player_count(player_count)?;
        Ok(Self {
            round_index: 1,
            turn_index: 0,
            scores: ScoreBoard::new(player_count),
            round_tally: CardTally::new(player_count),
            game_tally: CardTally::new(player_count),
            hands: vec![Hand::new(); player_count],
            draw_pile: Vec::new(),
        })
    }

    /// Deals a round-1 table from `deck`; undealt cards form the draw pile.
    pub fn deal(deck: Deck, player_count: usize) -> Result<Self, TableError> {
        let mut table = Self::new(player_count)?;
        let mut cards = deck.into_cards();
        let per_hand = Deck::hand_size(player_count);
        for hand in &mut table.hands {
            let split = cards.len().saturating_sub(per_hand);
            *hand = Hand::with_cards(cards.split_off(split));
        }
        table.draw_pile = cards;
        Ok(table)
    }

    pub fn with_seed(player_count: usize, seed: u64) -> Result<Self, TableError> {
        Self::deal(Deck::shuffled_with_seed(seed), player_count)
    }

    pub(crate) fn from_parts(
        round_index: u32,
        turn_index: u32,
        scores: ScoreBoard,
        round_tally: CardTally,
        game_tally: CardTally,
        hands: Vec<Hand>,
        draw_pile: Vec<CardType>,
    ) -> Result<Self, TableError> {
        check_player_count(hands.len())?;
        Ok(Self {
            round_index: round_index.max(1),
            turn_index,
            scores,
            round_tally,
            game_tally,
            hands,
            draw_pile,
        })
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    pub fn round_tally(&self) -> &CardTally {
        &self.round_tally
    }

    pub fn game_tally(&self) -> &CardTally {
        &self.game_tally
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn hand(&self, player: PlayerId) -> Option<&Hand> {
        self.hands.get(player.index())
    }

    pub fn set_hand(&mut self, player: PlayerId, hand: Hand) {
        if let Some(slot) = self.hands.get_mut(player.index()) {
            *slot = hand;
        }
    }

    pub fn draw_pile(&self) -> &[CardType] {
        &self.draw_pile
    }

    pub fn set_draw_pile(&mut self, cards: Vec<CardType>) {
        self.draw_pile = cards;
    }

    pub fn set_round(&mut self, round_index: u32) {
        self.round_index = round_index.max(1);
    }

    pub fn set_turn(&mut self, turn_index: u32) {
        self.turn_index = turn_index;
    }

    /// Records `amount` cards of `card` on `player`'s tableau for this round
    /// and for the whole game.
    pub fn record_play(&mut self, player: PlayerId, card: CardType, amount: u32) {
        self.round_tally.add(card, player, amount);
        self.game_tally.add(card, player, amount);
    }

    pub fn set_round_count(&mut self, player: PlayerId, card: CardType, amount: u32) {
        self.round_tally.set(card, player, amount);
    }

    pub fn set_game_count(&mut self, player: PlayerId, card: CardType, amount: u32) {
        self.game_tally.set(card, player, amount);
    }

    /// Advances to the next round: this-round tallies reset, whole-game
    /// tallies and scores carry over.
    pub fn start_next_round(&mut self) {
        self.round_index += 1;
        self.turn_index = 0;
        self.round_tally.clear();
    }
}

impl GameView for TableState {
    fn player_count(&self) -> usize {
        self.hands.len()
    }

    fn score(&self, player: PlayerId) -> i32 {
        self.scores.score(player)
    }

    fn round_index(&self) -> u32 {
        self.round_index
    }

    fn turn_index(&self) -> u32 {
        self.turn_index
    }

    fn played_count(&self, card: CardType, player: PlayerId) -> u32 {
        self.round_tally.count(card, player)
    }

    fn cumulative_played_count(&self, card: CardType, player: PlayerId) -> u32 {
        self.game_tally.count(card, player)
    }
}

impl Determinize for TableState {
    fn determinize<R: Rng + ?Sized>(
        &self,
        observer: PlayerId,
        rng: &mut R,
    ) -> Result<Self, SamplingError> {
        if observer.index() >= self.hands.len() {
            return Err(SamplingError::UnknownObserver { observer });
        }

        let mut world = self.clone();

        // Everything outside the observer's own hand goes back into one pool.
        let mut pool = std::mem::take(&mut world.draw_pile);
        let mut targets = Vec::with_capacity(world.hands.len());
        for seat in observer.opponents(world.hands.len()) {
            let hidden = world.hands[seat.index()].take_all();
            targets.push((seat, hidden.len()));
            pool.extend(hidden);
        }
        pool.shuffle(rng);

        for (seat, needed) in targets {
            if pool.len() < needed {
                return Err(SamplingError::InsufficientPool {
                    seat,
                    needed,
                    available: pool.len(),
                });
            }
            let split = pool.len() - needed;
            world.hands[seat.index()] = Hand::with_cards(pool.split_off(split));
        }
        world.draw_pile = pool;

        Ok(world)
    }
}

/// Commits one card from `player`'s hand to their tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayCard {
    pub player: PlayerId,
    pub card: CardType,
}

impl PlayCard {
    pub const fn new(player: PlayerId, card: CardType) -> Self {
        Self { player, card }
    }
}

impl fmt::Display for PlayCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.card.as_str())
    }
}

impl ApplyAction<TableState> for PlayCard {
    type Error = RulesError;

    fn apply_to(&self, state: &mut TableState) -> Result<(), RulesError> {
        let hand = state
            .hands
            .get_mut(self.player.index())
            .ok_or(RulesError::UnknownPlayer {
                player: self.player,
            })?;
        if !hand.remove(self.card) {
            return Err(RulesError::NotInHand {
                player: self.player,
                card: self.card,
            });
        }
        state.record_play(self.player, self.card, 1);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    UnknownPlayer { player: PlayerId },
    NotInHand { player: PlayerId, card: CardType },
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesError::UnknownPlayer { player } => {
                write!(f, "{player} is not seated at this table")
            }
            RulesError::NotInHand { player, card } => {
                write!(f, "{player} does not hold {card}")
            }
        }
    }
}

impl std::error::Error for RulesError {}

fn check_player_count(player_count: usize) -> Result<(), TableError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        Ok(())
    } else {
        Err(TableError::PlayerCount { player_count })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    PlayerCount { player_count: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::PlayerCount { player_count } => write!(
                f,
                "a table seats {MIN_PLAYERS} to {MAX_PLAYERS} players, not {player_count}"
            ),
        }
    }
}

impl std::error::Error for TableError {}

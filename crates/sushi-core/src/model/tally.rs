use crate::model::card::CardType;
use crate::model::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Played-card counts per player and card kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTally {
    counts: Vec<[u32; CardType::COUNT]>,
}

impl CardTally {
    pub fn new(player_count: usize) -> Self {
        Self {
            counts: vec![[0; CardType::COUNT]; player_count],
        }
    }

    pub fn player_count(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, card: CardType, player: PlayerId) -> u32 {
        self.counts
            .get(player.index())
            .map(|row| row[card.index()])
            .unwrap_or(0)
    }

    pub fn add(&mut self, card: CardType, player: PlayerId, amount: u32) {
        if let Some(row) = self.counts.get_mut(player.index()) {
            row[card.index()] = row[card.index()].saturating_add(amount);
        }
    }

    pub fn set(&mut self, card: CardType, player: PlayerId, amount: u32) {
        if let Some(row) = self.counts.get_mut(player.index()) {
            row[card.index()] = amount;
        }
    }

    pub fn row(&self, player: PlayerId) -> Option<&[u32; CardType::COUNT]> {
        self.counts.get(player.index())
    }

    pub fn clear(&mut self) {
        for row in &mut self.counts {
            *row = [0; CardType::COUNT];
        }
    }
}

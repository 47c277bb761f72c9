use crate::model::card::CardType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<CardType>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<CardType>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    /// Removes one copy of `card`.
    pub fn remove(&mut self, card: CardType) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardType> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[CardType] {
        &self.cards
    }

    pub(crate) fn take_all(&mut self) -> Vec<CardType> {
        std::mem::take(&mut self.cards)
    }

    fn sort(&mut self) {
        self.cards.sort();
    }
}

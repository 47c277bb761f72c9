use crate::model::card::CardType;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Copies of each kind in the standard deck.
const COMPOSITION: [(CardType, usize); CardType::COUNT] = [
    (CardType::Tempura, 14),
    (CardType::Sashimi, 14),
    (CardType::Dumpling, 14),
    (CardType::Maki, 26),
    (CardType::SquidNigiri, 5),
    (CardType::SalmonNigiri, 10),
    (CardType::EggNigiri, 5),
    (CardType::Wasabi, 6),
    (CardType::Chopsticks, 4),
    (CardType::Pudding, 10),
];

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<CardType>,
}

impl Deck {
    pub fn standard() -> Self {
        let total = COMPOSITION.iter().map(|(_, n)| n).sum();
        let mut cards = Vec::with_capacity(total);
        for (card, copies) in COMPOSITION {
            cards.extend(std::iter::repeat_n(card, copies));
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[CardType] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<CardType> {
        self.cards
    }

    /// Hand size dealt at the start of each round for `player_count` seats.
    pub const fn hand_size(player_count: usize) -> usize {
        match player_count {
            0..=2 => 10,
            3 => 9,
            4 => 8,
            _ => 7,
        }
    }
}

use core::fmt;
use serde::{Deserialize, Serialize};

/// Card kinds tracked on a player's tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CardType {
    Tempura = 0,
    Sashimi = 1,
    Dumpling = 2,
    Maki = 3,
    SquidNigiri = 4,
    SalmonNigiri = 5,
    EggNigiri = 6,
    Wasabi = 7,
    Chopsticks = 8,
    Pudding = 9,
}

impl CardType {
    pub const COUNT: usize = 10;

    pub const ALL: [CardType; CardType::COUNT] = [
        CardType::Tempura,
        CardType::Sashimi,
        CardType::Dumpling,
        CardType::Maki,
        CardType::SquidNigiri,
        CardType::SalmonNigiri,
        CardType::EggNigiri,
        CardType::Wasabi,
        CardType::Chopsticks,
        CardType::Pudding,
    ];

    pub const NIGIRI: [CardType; 3] = [
        CardType::EggNigiri,
        CardType::SalmonNigiri,
        CardType::SquidNigiri,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    pub const fn is_nigiri(self) -> bool {
        matches!(
            self,
            CardType::EggNigiri | CardType::SalmonNigiri | CardType::SquidNigiri
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CardType::Tempura => "Tempura",
            CardType::Sashimi => "Sashimi",
            CardType::Dumpling => "Dumpling",
            CardType::Maki => "Maki",
            CardType::SquidNigiri => "SquidNigiri",
            CardType::SalmonNigiri => "SalmonNigiri",
            CardType::EggNigiri => "EggNigiri",
            CardType::Wasabi => "Wasabi",
            CardType::Chopsticks => "Chopsticks",
            CardType::Pudding => "Pudding",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::CardType;

    #[test]
    fn index_roundtrip() {
        for (i, card) in CardType::ALL.iter().enumerate() {
            assert_eq!(CardType::from_index(i), Some(*card));
            assert_eq!(card.index(), i);
        }
        assert_eq!(CardType::from_index(CardType::COUNT), None);
    }

    #[test]
    fn nigiri_kinds_identified() {
        for card in CardType::NIGIRI {
            assert!(card.is_nigiri());
        }
        assert!(!CardType::Wasabi.is_nigiri());
        assert!(!CardType::Pudding.is_nigiri());
    }

    #[test]
    fn display_uses_variant_name() {
        assert_eq!(CardType::SalmonNigiri.to_string(), "SalmonNigiri");
    }
}

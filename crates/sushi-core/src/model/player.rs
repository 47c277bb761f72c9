use core::fmt;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < MAX_PLAYERS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Seats `0..player_count` in table order. Tables validate the count
    /// against `MIN_PLAYERS..=MAX_PLAYERS` when they are built.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(|i| PlayerId(i as u8))
    }

    /// Every seat except `self`.
    pub fn opponents(self, player_count: usize) -> impl Iterator<Item = PlayerId> {
        Self::all(player_count).filter(move |other| *other != self)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent{}", self.0)
    }
}

use crate::model::player::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: Vec<i32>,
}

impl ScoreBoard {
    pub fn new(player_count: usize) -> Self {
        Self {
            totals: vec![0; player_count],
        }
    }

    pub fn player_count(&self) -> usize {
        self.totals.len()
    }

    pub fn add_points(&mut self, player: PlayerId, points: i32) {
        if let Some(total) = self.totals.get_mut(player.index()) {
            *total += points;
        }
    }

    pub fn set_totals(&mut self, totals: &[i32]) {
        self.totals = totals.to_vec();
    }

    /// Score for `player`, or zero for a seat outside the table.
    pub fn score(&self, player: PlayerId) -> i32 {
        self.totals.get(player.index()).copied().unwrap_or(0)
    }

    pub fn standings(&self) -> &[i32] {
        &self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::ScoreBoard;
    use crate::model::player::PlayerId;

    #[test]
    fn scoreboard_tracks_points() {
        let mut board = ScoreBoard::new(3);
        board.add_points(PlayerId::new(1), 13);
        board.add_points(PlayerId::new(1), 2);
        assert_eq!(board.score(PlayerId::new(1)), 15);
        assert_eq!(board.score(PlayerId::new(0)), 0);
    }

    #[test]
    fn set_totals_replaces_standings() {
        let mut board = ScoreBoard::new(4);
        board.set_totals(&[10, 31, 31, 4]);
        board.add_points(PlayerId::new(3), 5);
        assert_eq!(board.standings(), &[10, 31, 31, 9]);
    }

    #[test]
    fn out_of_range_seat_reads_zero() {
        let board = ScoreBoard::new(2);
        assert_eq!(board.score(PlayerId::new(4)), 0);
    }
}

use super::table::{TableError, TableState};
use super::view::GameView;
use crate::model::card::CardType;
use crate::model::hand::Hand;
use crate::model::score::ScoreBoard;
use crate::model::tally::CardTally;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSnapshot {
    pub round_index: u32,
    #[serde(default)]
    pub turn_index: u32,
    pub scores: Vec<i32>,
    pub round_tally: CardTally,
    pub game_tally: CardTally,
    pub hands: Vec<Hand>,
    #[serde(default)]
    pub draw_pile: Vec<CardType>,
}

impl TableSnapshot {
    pub fn capture(state: &TableState) -> Self {
        TableSnapshot {
            round_index: state.round_index(),
            turn_index: state.turn_index(),
            scores: state.scores().standings().to_vec(),
            round_tally: state.round_tally().clone(),
            game_tally: state.game_tally().clone(),
            hands: state.hands().to_vec(),
            draw_pile: state.draw_pile().to_vec(),
        }
    }

    pub fn restore(self) -> Result<TableState, TableError> {
        let mut scores = ScoreBoard::new(self.hands.len());
        scores.set_totals(&self.scores);
        TableState::from_parts(
            self.round_index,
            self.turn_index,
            scores,
            self.round_tally,
            self.game_tally,
            self.hands,
            self.draw_pile,
        )
    }

    pub fn to_json(state: &TableState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::TableSnapshot;
    use crate::game::table::{TableError, TableState};
    use crate::game::view::GameView;
    use crate::model::card::CardType;
    use crate::model::player::PlayerId;

    #[test]
    fn snapshot_serializes_to_json() {
        let mut state = TableState::with_seed(3, 99).expect("table");
        state.set_round(2);
        let json = TableSnapshot::to_json(&state).unwrap();
        assert!(json.contains("\"round_index\": 2"));
        assert!(json.contains("\"hands\""));
        assert!(json.contains("\"draw_pile\""));
    }

    #[test]
    fn snapshot_restore_preserves_table() {
        let mut state = TableState::with_seed(4, 123).expect("table");
        state.scores_mut().set_totals(&[10, 20, 30, 40]);
        state.record_play(PlayerId::new(2), CardType::Pudding, 3);
        state.set_turn(5);

        let restored = TableSnapshot::capture(&state).restore().expect("restore");
        assert_eq!(restored, state);
        assert_eq!(
            restored.cumulative_played_count(CardType::Pudding, PlayerId::new(2)),
            3
        );
    }

    #[test]
    fn snapshot_from_json_ignores_legacy_fields() {
        let legacy = r#"{
            "round_index": 3,
            "scores": [4, 7],
            "round_tally": { "counts": [[0,0,0,0,0,0,0,0,0,0],[0,0,0,2,0,0,0,0,0,0]] },
            "game_tally": { "counts": [[0,0,0,0,0,0,0,0,0,1],[0,0,0,2,0,0,0,0,0,0]] },
            "hands": [["Tempura"], ["Wasabi"]],
            "agent_label": "legacy"
        }"#;

        let snapshot = TableSnapshot::from_json(legacy).unwrap();
        assert_eq!(snapshot.turn_index, 0);
        assert!(snapshot.draw_pile.is_empty());
        let table = snapshot.restore().expect("restore");
        assert_eq!(table.round_index(), 3);
        assert_eq!(table.score(PlayerId::new(1)), 7);
        assert_eq!(table.played_count(CardType::Maki, PlayerId::new(1)), 2);
    }

    #[test]
    fn snapshot_with_too_many_seats_is_rejected() {
        let mut snapshot = TableSnapshot::capture(&TableState::with_seed(5, 2).expect("table"));
        snapshot.hands.push(Default::default());
        snapshot.scores.push(60);
        assert_eq!(
            snapshot.restore(),
            Err(TableError::PlayerCount { player_count: 6 })
        );
    }
}

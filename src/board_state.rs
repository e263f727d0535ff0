//! Board View State
//!
//! Columns and their cards as last seen from the server, plus the local
//! reorders made by drag-and-drop. Array order is the only ordering truth:
//! after a move every affected list has its positions rewritten to 0..n.

use std::collections::HashMap;

use crate::models::{Board, BoardColumn, Card};

/// A card drop that needs confirming with the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMove {
    pub card_id: String,
    pub from_column: String,
    pub to_column: String,
    /// Index in the target column after the move
    pub to_index: usize,
}

/// A column drop that needs confirming with the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMove {
    pub column_id: String,
    pub from_index: usize,
    pub to_index: usize,
    /// Active columns whose stored position changed, with the new position
    pub renumbered: Vec<(String, i32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    pub board: Board,
    /// Active columns first (by position), then archived ones
    columns: Vec<BoardColumn>,
    /// Unarchived cards per column id, by position
    cards: HashMap<String, Vec<Card>>,
}

fn sort_by_position(cards: &mut [Card]) {
    cards.sort_by_key(|c| c.position);
}

fn renumber(cards: &mut [Card]) {
    for (index, card) in cards.iter_mut().enumerate() {
        card.position = index as i32;
    }
}

impl BoardState {
    pub fn from_parts(board: Board, columns: Vec<BoardColumn>, cards_by_column: HashMap<String, Vec<Card>>) -> Self {
        let mut state = Self {
            board,
            columns,
            cards: HashMap::new(),
        };
        state.sort_columns();
        for column in &state.columns {
            state.cards.entry(column.id.clone()).or_default();
        }
        for (column_id, cards) in cards_by_column {
            let mut cards: Vec<Card> = cards.into_iter().filter(|c| !c.archived).collect();
            sort_by_position(&mut cards);
            state.cards.insert(column_id, cards);
        }
        state
    }

    fn sort_columns(&mut self) {
        self.columns.sort_by_key(|c| (c.archived, c.position));
    }

    pub fn active_columns(&self) -> Vec<BoardColumn> {
        self.columns.iter().filter(|c| !c.archived).cloned().collect()
    }

    pub fn archived_columns(&self) -> Vec<BoardColumn> {
        self.columns.iter().filter(|c| c.archived).cloned().collect()
    }

    pub fn column(&self, id: &str) -> Option<&BoardColumn> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_name(&self, id: &str) -> Option<&str> {
        self.column(id).map(|c| c.name.as_str())
    }

    pub fn cards_for(&self, column_id: &str) -> &[Card] {
        self.cards.get(column_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.values().flatten().find(|c| c.id == card_id)
    }

    pub fn card_count(&self) -> usize {
        self.cards.values().map(Vec::len).sum()
    }

    // ========================
    // Drag-and-drop
    // ========================

    /// Move a card locally. `to_index` is the insertion index in the target
    /// list once the card has been taken out of its source.
    pub fn move_card(&mut self, source_column: &str, from_index: usize, target_column: &str, to_index: usize) -> Option<CardMove> {
        if source_column == target_column {
            let cards = self.cards.get_mut(source_column)?;
            if from_index == to_index || from_index >= cards.len() || to_index >= cards.len() {
                return None;
            }
            let card = cards.remove(from_index);
            let card_id = card.id.clone();
            cards.insert(to_index, card);
            renumber(cards);
            return Some(CardMove {
                card_id,
                from_column: source_column.to_string(),
                to_column: target_column.to_string(),
                to_index,
            });
        }

        if self.column(target_column).is_none()
            || to_index > self.cards_for(target_column).len()
            || from_index >= self.cards_for(source_column).len()
        {
            return None;
        }

        let source = self.cards.get_mut(source_column)?;
        let mut card = source.remove(from_index);
        renumber(source);

        card.column_id = target_column.to_string();
        let card_id = card.id.clone();
        let target = self.cards.entry(target_column.to_string()).or_default();
        target.insert(to_index, card);
        renumber(target);

        Some(CardMove {
            card_id,
            from_column: source_column.to_string(),
            to_column: target_column.to_string(),
            to_index,
        })
    }

    /// Reorder active columns. Indices count active columns only.
    pub fn reorder_column(&mut self, from_index: usize, to_index: usize) -> Option<ColumnMove> {
        let (mut active, archived): (Vec<_>, Vec<_>) = self.columns.drain(..).partition(|c| !c.archived);
        let valid = from_index != to_index && from_index < active.len() && to_index < active.len();

        let result = if valid {
            let column = active.remove(from_index);
            let column_id = column.id.clone();
            active.insert(to_index, column);
            let mut renumbered = Vec::new();
            for (index, column) in active.iter_mut().enumerate() {
                if column.position != index as i32 {
                    column.position = index as i32;
                    renumbered.push((column.id.clone(), column.position));
                }
            }
            Some(ColumnMove {
                column_id,
                from_index,
                to_index,
                renumbered,
            })
        } else {
            None
        };

        self.columns = active;
        self.columns.extend(archived);
        result
    }

    // ========================
    // Local bookkeeping
    // ========================

    pub fn push_column(&mut self, column: BoardColumn) {
        self.cards.entry(column.id.clone()).or_default();
        self.columns.push(column);
        self.sort_columns();
    }

    pub fn replace_column(&mut self, column: BoardColumn) {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.id == column.id) {
            *existing = column;
            self.sort_columns();
        }
    }

    /// Drops the column and its cards
    pub fn remove_column(&mut self, column_id: &str) {
        self.columns.retain(|c| c.id != column_id);
        self.cards.remove(column_id);
    }

    /// Position an archived column would take at the end of the active ones
    pub fn next_column_position(&self) -> i32 {
        self.columns
            .iter()
            .filter(|c| !c.archived)
            .map(|c| c.position + 1)
            .max()
            .unwrap_or(0)
    }

    /// Append a new card to the end of its column
    pub fn push_card(&mut self, card: Card) {
        let cards = self.cards.entry(card.column_id.clone()).or_default();
        cards.push(card);
    }

    /// Replace a card from a server response, following a column change.
    /// Archived cards leave the board view.
    pub fn upsert_card(&mut self, card: Card) {
        self.remove_card(&card.id);
        if card.archived {
            return;
        }
        let cards = self.cards.entry(card.column_id.clone()).or_default();
        cards.push(card);
        sort_by_position(cards);
    }

    pub fn remove_card(&mut self, card_id: &str) -> Option<Card> {
        for cards in self.cards.values_mut() {
            if let Some(index) = cards.iter().position(|c| c.id == card_id) {
                return Some(cards.remove(index));
            }
        }
        None
    }

    /// Put an unarchived card back into its column
    pub fn restore_card(&mut self, mut card: Card) {
        card.archived = false;
        self.upsert_card(card);
    }

    pub fn set_card_achieved(&mut self, card_id: &str, achieved: bool) -> bool {
        match self.cards.values_mut().flatten().find(|c| c.id == card_id) {
            Some(card) => {
                card.achieved = achieved;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{card, column};

    fn board() -> Board {
        serde_json::from_str(r#"{"id":"b1","name":"Roadmap","workspaceId":"w1"}"#).unwrap()
    }

    fn state() -> BoardState {
        let mut cards = HashMap::new();
        cards.insert("todo".to_string(), vec![card("c2", "todo", 1), card("c1", "todo", 0), card("c3", "todo", 2)]);
        cards.insert("done".to_string(), vec![card("c4", "done", 0)]);
        let mut archived = column("old", 0);
        archived.archived = true;
        BoardState::from_parts(board(), vec![column("done", 1), archived, column("todo", 0)], cards)
    }

    fn ids(state: &BoardState, column_id: &str) -> Vec<String> {
        state.cards_for(column_id).iter().map(|c| c.id.clone()).collect()
    }

    fn positions(state: &BoardState, column_id: &str) -> Vec<i32> {
        state.cards_for(column_id).iter().map(|c| c.position).collect()
    }

    #[test]
    fn test_from_parts_sorts() {
        let state = state();
        let active: Vec<_> = state.active_columns().into_iter().map(|c| c.id).collect();
        assert_eq!(active, vec!["todo", "done"]);
        assert_eq!(state.archived_columns().len(), 1);
        assert_eq!(ids(&state, "todo"), vec!["c1", "c2", "c3"]);
        assert_eq!(state.column_name("done"), Some("Column done"));
    }

    #[test]
    fn test_from_parts_drops_archived_cards() {
        let mut archived = card("c9", "todo", 5);
        archived.archived = true;
        let mut cards = HashMap::new();
        cards.insert("todo".to_string(), vec![archived, card("c1", "todo", 0)]);
        let state = BoardState::from_parts(board(), vec![column("todo", 0)], cards);
        assert_eq!(ids(&state, "todo"), vec!["c1"]);
    }

    #[test]
    fn test_move_within_column() {
        let mut state = state();
        let mv = state.move_card("todo", 0, "todo", 2).unwrap();
        assert_eq!(mv.card_id, "c1");
        assert_eq!(mv.to_index, 2);
        assert_eq!(ids(&state, "todo"), vec!["c2", "c3", "c1"]);
        assert_eq!(positions(&state, "todo"), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_across_columns() {
        let mut state = state();
        let mv = state.move_card("todo", 1, "done", 0).unwrap();
        assert_eq!(mv, CardMove {
            card_id: "c2".into(),
            from_column: "todo".into(),
            to_column: "done".into(),
            to_index: 0,
        });
        assert_eq!(ids(&state, "todo"), vec!["c1", "c3"]);
        assert_eq!(positions(&state, "todo"), vec![0, 1]);
        assert_eq!(ids(&state, "done"), vec!["c2", "c4"]);
        assert_eq!(positions(&state, "done"), vec![0, 1]);
        assert_eq!(state.card("c2").map(|c| c.column_id.as_str()), Some("done"));
    }

    #[test]
    fn test_move_to_end_of_other_column() {
        let mut state = state();
        assert!(state.move_card("todo", 0, "done", 1).is_some());
        assert_eq!(ids(&state, "done"), vec!["c4", "c1"]);
    }

    #[test]
    fn test_noop_and_out_of_range_moves() {
        let mut state = state();
        let before = state.clone();
        assert!(state.move_card("todo", 1, "todo", 1).is_none());
        assert!(state.move_card("todo", 7, "done", 0).is_none());
        assert!(state.move_card("todo", 0, "done", 5).is_none());
        assert!(state.move_card("todo", 0, "missing", 0).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_reorder_columns_keeps_archived_last() {
        let mut state = state();
        let mv = state.reorder_column(1, 0).unwrap();
        assert_eq!(mv.column_id, "done");
        assert_eq!(mv.renumbered, vec![("done".to_string(), 0), ("todo".to_string(), 1)]);
        let active: Vec<_> = state.active_columns().into_iter().map(|c| (c.id, c.position)).collect();
        assert_eq!(active, vec![("done".to_string(), 0), ("todo".to_string(), 1)]);
        assert_eq!(state.archived_columns()[0].id, "old");
        assert!(state.reorder_column(0, 0).is_none());
        assert!(state.reorder_column(0, 9).is_none());
        assert_eq!(state.active_columns().len(), 2);
    }

    #[test]
    fn test_reorder_renumbers_only_shifted_columns() {
        let mut state = BoardState::from_parts(
            board(),
            vec![column("a", 0), column("b", 1), column("c", 2), column("d", 3)],
            HashMap::new(),
        );
        let mv = state.reorder_column(2, 1).unwrap();
        assert_eq!(mv.column_id, "c");
        assert_eq!(mv.renumbered, vec![("c".to_string(), 1), ("b".to_string(), 2)]);
    }

    #[test]
    fn test_upsert_follows_column_change() {
        let mut state = state();
        let mut moved = card("c1", "done", 5);
        moved.title = "Renamed".into();
        state.upsert_card(moved);
        assert_eq!(ids(&state, "todo"), vec!["c2", "c3"]);
        assert_eq!(ids(&state, "done"), vec!["c4", "c1"]);
        assert_eq!(state.card("c1").map(|c| c.title.as_str()), Some("Renamed"));
    }

    #[test]
    fn test_archive_and_restore_card() {
        let mut state = state();
        let mut archived = card("c2", "todo", 1);
        archived.archived = true;
        state.upsert_card(archived.clone());
        assert!(state.card("c2").is_none());
        state.restore_card(archived);
        assert_eq!(ids(&state, "todo"), vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_column_bookkeeping() {
        let mut state = state();
        assert_eq!(state.next_column_position(), 2);
        state.push_column(column("review", 2));
        assert_eq!(state.active_columns().last().map(|c| c.id.clone()), Some("review".into()));
        state.push_card(card("c5", "review", 0));
        assert_eq!(ids(&state, "review"), vec!["c5"]);

        let mut renamed = column("review", 2);
        renamed.name = "QA".into();
        state.replace_column(renamed);
        assert_eq!(state.column_name("review"), Some("QA"));

        state.remove_column("review");
        assert!(state.column("review").is_none());
        assert!(state.card("c5").is_none());
    }

    #[test]
    fn test_set_card_achieved() {
        let mut state = state();
        assert!(state.set_card_achieved("c4", true));
        assert!(state.card("c4").map(|c| c.achieved).unwrap_or(false));
        assert!(!state.set_card_achieved("nope", true));
    }
}

//! Board state container
//!
//! Holds every group, card and connection and applies actions to them.
//! All mutation goes through [`Board::dispatch`].

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::model::{Card, CardId, Column, Connection, ConnectionId, Group, GroupId, Selection};
use crate::save::{BoardSnapshot, SNAPSHOT_VERSION};

/// Everything that can change the board
#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    /// Append a new group to a column
    AddGroup { column: Column, name: String },
    /// Append a card to an existing group
    AddCard { group: GroupId, name: String },
    /// Select, reselect or link a card
    ClickCard { card: CardId },
    /// Drop the pending selection, if any
    ClearSelection,
    /// Replace the whole board
    LoadState(BoardSnapshot),
}

/// What a successful action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    GroupAdded(GroupId),
    CardAdded(CardId),
    /// First card picked
    Selected(CardId),
    /// The selected card was clicked again
    Deselected(CardId),
    /// Another card in the same column took over the selection
    SelectionMoved { from: CardId, to: CardId },
    /// A new link, and how many older links it replaced
    Connected { connection: ConnectionId, evicted: usize },
    /// An existing link was toggled off
    Disconnected { left: CardId, right: CardId },
    SelectionCleared,
    Loaded,
}

/// Reasons an action is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),
    #[error("unknown card {0}")]
    UnknownCard(CardId),
    #[error("invalid board snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("no ids left to allocate")]
    IdsExhausted,
}

/// The board: groups, cards, connections and the pending selection
#[derive(Debug, Clone)]
pub struct Board {
    groups: Vec<Group>,
    cards: Vec<Card>,
    connections: Vec<Connection>,
    selection: Option<Selection>,
    /// Next id handed out, shared by all entity kinds
    next_id: u64,
    /// Bumped on every change
    revision: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            cards: Vec::new(),
            connections: Vec::new(),
            selection: None,
            next_id: 1,
            revision: 0,
        }
    }

    /// Apply an action. On error the board is left untouched.
    pub fn dispatch(&mut self, action: BoardAction) -> Result<Outcome, BoardError> {
        let outcome = match action {
            BoardAction::AddGroup { column, name } => self.add_group(column, &name)?,
            BoardAction::AddCard { group, name } => self.add_card(group, &name)?,
            BoardAction::ClickCard { card } => self.click_card(card)?,
            BoardAction::ClearSelection => {
                self.selection = None;
                Outcome::SelectionCleared
            }
            BoardAction::LoadState(snapshot) => self.load(snapshot)?,
        };
        self.revision += 1;
        Ok(outcome)
    }

    fn allocate_id(&mut self) -> Result<u64, BoardError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(BoardError::IdsExhausted)?;
        Ok(id)
    }

    fn add_group(&mut self, column: Column, name: &str) -> Result<Outcome, BoardError> {
        let name = clean_name(name)?;
        let id = GroupId(self.allocate_id()?);
        log::info!("Added group {} '{}' to {:?} column", id, name, column);
        self.groups.push(Group { id, column, name });
        Ok(Outcome::GroupAdded(id))
    }

    fn add_card(&mut self, group: GroupId, name: &str) -> Result<Outcome, BoardError> {
        let name = clean_name(name)?;
        let column = self.group(group).ok_or(BoardError::UnknownGroup(group))?.column;
        let id = CardId(self.allocate_id()?);
        log::info!("Added card {} '{}' to group {}", id, name, group);
        self.cards.push(Card { id, group, column, name });
        Ok(Outcome::CardAdded(id))
    }

    fn click_card(&mut self, card: CardId) -> Result<Outcome, BoardError> {
        let column = self.card(card).ok_or(BoardError::UnknownCard(card))?.column;

        let selected = match self.selection {
            None => {
                self.selection = Some(Selection { card, column });
                return Ok(Outcome::Selected(card));
            }
            Some(selected) => selected,
        };

        if selected.card == card {
            self.selection = None;
            return Ok(Outcome::Deselected(card));
        }

        if selected.column == column {
            self.selection = Some(Selection { card, column });
            return Ok(Outcome::SelectionMoved { from: selected.card, to: card });
        }

        let (left, right) = match column {
            Column::Left => (card, selected.card),
            Column::Right => (selected.card, card),
        };

        let exists = self
            .connections
            .iter()
            .any(|c| c.left == left && c.right == right);

        // Allocate before touching the links so a failure changes nothing
        let new_id = if exists {
            None
        } else {
            Some(ConnectionId(self.allocate_id()?))
        };

        // One link per card: anything sharing an endpoint goes
        let before = self.connections.len();
        self.connections.retain(|c| c.left != left && c.right != right);
        let evicted = before - self.connections.len();

        self.selection = None;

        let outcome = match new_id {
            None => Outcome::Disconnected { left, right },
            Some(id) => {
                self.connections.push(Connection { id, left, right });
                Outcome::Connected { connection: id, evicted }
            }
        };

        log::debug!("[Board] current connections: {:?}", self.connections);
        Ok(outcome)
    }

    fn load(&mut self, snapshot: BoardSnapshot) -> Result<Outcome, BoardError> {
        validate_snapshot(&snapshot)?;

        let max_id = snapshot
            .groups
            .iter()
            .map(|g| g.id.0)
            .chain(snapshot.cards.iter().map(|c| c.id.0))
            .chain(snapshot.connections.iter().map(|c| c.id.0))
            .max()
            .unwrap_or(0);
        let next_id = max_id
            .checked_add(1)
            .ok_or_else(|| BoardError::InvalidSnapshot("id space exhausted".to_string()))?;

        let selection = snapshot.selection.filter(|s| {
            snapshot
                .cards
                .iter()
                .any(|c| c.id == s.card && c.column == s.column)
        });

        self.groups = snapshot.groups;
        self.cards = snapshot.cards;
        self.connections = snapshot.connections;
        self.selection = selection;
        self.next_id = self.next_id.max(next_id);

        log::info!(
            "Loaded board: {} groups, {} cards, {} connections",
            self.groups.len(),
            self.cards.len(),
            self.connections.len()
        );
        log::debug!("[Board] current connections: {:?}", self.connections);
        Ok(Outcome::Loaded)
    }

    /// Capture the board for saving
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            version: SNAPSHOT_VERSION,
            groups: self.groups.clone(),
            cards: self.cards.clone(),
            connections: self.connections.clone(),
            selection: self.selection,
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Changes every time an action succeeds
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Groups of one column, in creation order
    pub fn groups_in(&self, column: Column) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(move |g| g.column == column)
    }

    /// Cards of one group, in creation order
    pub fn cards_in(&self, group: GroupId) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.group == group)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// The link a card takes part in, if any
    pub fn connection_of(&self, card: CardId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.touches(card))
    }

    pub fn is_selected(&self, card: CardId) -> bool {
        self.selection.is_some_and(|s| s.card == card)
    }
}

fn clean_name(name: &str) -> Result<String, BoardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Check a snapshot against the board invariants before it replaces anything
fn validate_snapshot(snapshot: &BoardSnapshot) -> Result<(), BoardError> {
    let invalid = |reason: String| Err(BoardError::InvalidSnapshot(reason));

    let mut seen = HashSet::new();
    let all_ids = snapshot
        .groups
        .iter()
        .map(|g| g.id.0)
        .chain(snapshot.cards.iter().map(|c| c.id.0))
        .chain(snapshot.connections.iter().map(|c| c.id.0));
    for id in all_ids {
        if !seen.insert(id) {
            return invalid(format!("id {} is used twice", id));
        }
    }

    let group_columns: HashMap<GroupId, Column> =
        snapshot.groups.iter().map(|g| (g.id, g.column)).collect();
    let card_columns: HashMap<CardId, Column> =
        snapshot.cards.iter().map(|c| (c.id, c.column)).collect();

    for group in &snapshot.groups {
        if group.name.trim().is_empty() {
            return invalid(format!("group {} has an empty name", group.id));
        }
    }

    for card in &snapshot.cards {
        if card.name.trim().is_empty() {
            return invalid(format!("card {} has an empty name", card.id));
        }
        match group_columns.get(&card.group) {
            None => return invalid(format!("card {} references missing group {}", card.id, card.group)),
            Some(column) if *column != card.column => {
                return invalid(format!("card {} is not in its group's column", card.id));
            }
            Some(_) => {}
        }
    }

    let mut linked = HashSet::new();
    for conn in &snapshot.connections {
        if card_columns.get(&conn.left) != Some(&Column::Left) {
            return invalid(format!("connection {} has no left card {}", conn.id, conn.left));
        }
        if card_columns.get(&conn.right) != Some(&Column::Right) {
            return invalid(format!("connection {} has no right card {}", conn.id, conn.right));
        }
        if !linked.insert(conn.left) || !linked.insert(conn.right) {
            return invalid(format!("connection {} reuses a linked card", conn.id));
        }
    }

    if snapshot.version != SNAPSHOT_VERSION {
        return invalid(format!(
            "version {} is not supported (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Board with one group per column and two cards in each
    fn seeded_board() -> (Board, [CardId; 2], [CardId; 2]) {
        let mut board = Board::new();
        let left_group = match board
            .dispatch(BoardAction::AddGroup { column: Column::Left, name: "Flows".into() })
            .unwrap()
        {
            Outcome::GroupAdded(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        };
        let right_group = match board
            .dispatch(BoardAction::AddGroup { column: Column::Right, name: "Checks".into() })
            .unwrap()
        {
            Outcome::GroupAdded(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        };

        let mut add = |group, name: &str| match board
            .dispatch(BoardAction::AddCard { group, name: name.into() })
            .unwrap()
        {
            Outcome::CardAdded(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        };
        let l1 = add(left_group, "Login");
        let l2 = add(left_group, "Signup");
        let r1 = add(right_group, "Validate copy");
        let r2 = add(right_group, "Check email");
        (board, [l1, l2], [r1, r2])
    }

    fn click(board: &mut Board, card: CardId) -> Outcome {
        board.dispatch(BoardAction::ClickCard { card }).unwrap()
    }

    #[test]
    fn test_add_group_trims_name() {
        let mut board = Board::new();
        board
            .dispatch(BoardAction::AddGroup { column: Column::Left, name: "  Flows  ".into() })
            .unwrap();
        assert_eq!(board.groups()[0].name, "Flows");
        assert_eq!(board.groups_in(Column::Left).count(), 1);
        assert_eq!(board.groups_in(Column::Right).count(), 0);
    }

    #[test]
    fn test_empty_names_rejected() {
        let mut board = Board::new();
        let err = board
            .dispatch(BoardAction::AddGroup { column: Column::Left, name: "   ".into() })
            .unwrap_err();
        assert_eq!(err, BoardError::EmptyName);
        assert!(board.groups().is_empty());
        assert_eq!(board.revision(), 0);
    }

    #[test]
    fn test_card_takes_group_column() {
        let (board, _, right) = seeded_board();
        let card = board.card(right[0]).unwrap();
        assert_eq!(card.column, Column::Right);
        assert_eq!(board.cards_in(card.group).count(), 2);
    }

    #[test]
    fn test_add_card_unknown_group() {
        let mut board = Board::new();
        let err = board
            .dispatch(BoardAction::AddCard { group: GroupId(42), name: "Orphan".into() })
            .unwrap_err();
        assert_eq!(err, BoardError::UnknownGroup(GroupId(42)));
    }

    #[test]
    fn test_click_selects_then_deselects() {
        let (mut board, left, _) = seeded_board();
        assert_eq!(click(&mut board, left[0]), Outcome::Selected(left[0]));
        assert!(board.is_selected(left[0]));
        assert_eq!(click(&mut board, left[0]), Outcome::Deselected(left[0]));
        assert!(board.selection().is_none());
    }

    #[test]
    fn test_same_column_moves_selection() {
        let (mut board, left, _) = seeded_board();
        click(&mut board, left[0]);
        assert_eq!(
            click(&mut board, left[1]),
            Outcome::SelectionMoved { from: left[0], to: left[1] }
        );
        assert_eq!(board.selection().map(|s| s.card), Some(left[1]));
        assert!(board.connections().is_empty());
    }

    #[test]
    fn test_opposite_column_connects() {
        let (mut board, left, right) = seeded_board();
        click(&mut board, right[0]);
        let outcome = click(&mut board, left[0]);
        assert!(matches!(outcome, Outcome::Connected { evicted: 0, .. }));
        assert!(board.selection().is_none());

        let conn = &board.connections()[0];
        // Endpoints are resolved by column, not by click order
        assert_eq!(conn.left, left[0]);
        assert_eq!(conn.right, right[0]);
        assert_eq!(board.connection_of(right[0]).map(|c| c.id), Some(conn.id));
    }

    #[test]
    fn test_clicking_pair_again_disconnects() {
        let (mut board, left, right) = seeded_board();
        click(&mut board, left[0]);
        click(&mut board, right[0]);
        click(&mut board, left[0]);
        assert_eq!(
            click(&mut board, right[0]),
            Outcome::Disconnected { left: left[0], right: right[0] }
        );
        assert!(board.connections().is_empty());
    }

    #[test]
    fn test_new_link_evicts_links_sharing_an_endpoint() {
        let (mut board, left, right) = seeded_board();
        click(&mut board, left[0]);
        click(&mut board, right[0]);
        click(&mut board, left[1]);
        click(&mut board, right[1]);
        assert_eq!(board.connections().len(), 2);

        // l1 -> r2 shares l1 with the first link and r2 with the second
        click(&mut board, left[0]);
        let outcome = click(&mut board, right[1]);
        assert!(matches!(outcome, Outcome::Connected { evicted: 2, .. }));
        assert_eq!(board.connections().len(), 1);
        assert_eq!(board.connections()[0].left, left[0]);
        assert_eq!(board.connections()[0].right, right[1]);
        assert!(board.connection_of(left[1]).is_none());
    }

    #[test]
    fn test_unknown_card_leaves_board_untouched() {
        let (mut board, left, _) = seeded_board();
        click(&mut board, left[0]);
        let revision = board.revision();
        let err = board.dispatch(BoardAction::ClickCard { card: CardId(999) }).unwrap_err();
        assert_eq!(err, BoardError::UnknownCard(CardId(999)));
        assert!(board.is_selected(left[0]));
        assert_eq!(board.revision(), revision);
    }

    #[test]
    fn test_clear_selection() {
        let (mut board, _, right) = seeded_board();
        click(&mut board, right[1]);
        board.dispatch(BoardAction::ClearSelection).unwrap();
        assert!(board.selection().is_none());
    }

    #[test]
    fn test_load_state_replaces_board_and_resumes_ids() {
        let (mut source, left, right) = seeded_board();
        click(&mut source, left[0]);
        click(&mut source, right[0]);
        click(&mut source, right[1]);
        let snapshot = source.snapshot();

        let mut board = Board::new();
        assert_eq!(board.dispatch(BoardAction::LoadState(snapshot)).unwrap(), Outcome::Loaded);
        assert_eq!(board.cards().len(), 4);
        assert_eq!(board.connections().len(), 1);
        assert!(board.is_selected(right[1]));

        let group = board.groups()[0].id;
        let new_card = match board
            .dispatch(BoardAction::AddCard { group, name: "Later".into() })
            .unwrap()
        {
            Outcome::CardAdded(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        };
        let used: HashSet<u64> = source.snapshot().cards.iter().map(|c| c.id.0).collect();
        assert!(!used.contains(&new_card.0));
        assert!(new_card.0 > board.connections()[0].id.0);
    }

    #[test]
    fn test_load_rejects_same_column_connection() {
        let (source, left, _) = seeded_board();
        let mut snapshot = source.snapshot();
        snapshot.connections.push(Connection { id: ConnectionId(100), left: left[0], right: left[1] });

        let mut board = Board::new();
        let err = board.dispatch(BoardAction::LoadState(snapshot)).unwrap_err();
        assert!(matches!(err, BoardError::InvalidSnapshot(_)));
        assert!(board.groups().is_empty());
    }

    #[test]
    fn test_load_rejects_card_linked_twice() {
        let (source, left, right) = seeded_board();
        let mut snapshot = source.snapshot();
        snapshot.connections.push(Connection { id: ConnectionId(100), left: left[0], right: right[0] });
        snapshot.connections.push(Connection { id: ConnectionId(101), left: left[0], right: right[1] });

        let err = Board::new().dispatch(BoardAction::LoadState(snapshot)).unwrap_err();
        assert!(matches!(err, BoardError::InvalidSnapshot(_)));
    }

    #[test]
    fn test_load_drops_dangling_selection() {
        let (source, _, _) = seeded_board();
        let mut snapshot = source.snapshot();
        snapshot.selection = Some(Selection { card: CardId(500), column: Column::Left });

        let mut board = Board::new();
        board.dispatch(BoardAction::LoadState(snapshot)).unwrap();
        assert!(board.selection().is_none());
    }

    /// Dispatch a snapshot that must be rejected and check nothing moved
    fn assert_rejected(snapshot: BoardSnapshot, reason: &str) {
        let (mut board, left, _) = seeded_board();
        click(&mut board, left[0]);
        let before = board.snapshot();
        let revision = board.revision();

        match board.dispatch(BoardAction::LoadState(snapshot)) {
            Err(BoardError::InvalidSnapshot(msg)) => {
                assert!(msg.contains(reason), "expected '{}' in '{}'", reason, msg)
            }
            other => panic!("expected InvalidSnapshot, got {:?}", other),
        }
        assert_eq!(board.snapshot(), before);
        assert_eq!(board.revision(), revision);
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let (source, left, _) = seeded_board();
        let mut snapshot = source.snapshot();
        // A group reusing a card's id
        snapshot.groups.push(Group { id: GroupId(left[0].0), column: Column::Left, name: "Dup".into() });
        assert_rejected(snapshot, "used twice");
    }

    #[test]
    fn test_load_rejects_card_in_missing_group() {
        let (source, _, _) = seeded_board();
        let mut snapshot = source.snapshot();
        snapshot.cards.push(Card {
            id: CardId(200),
            group: GroupId(300),
            column: Column::Left,
            name: "Orphan".into(),
        });
        assert_rejected(snapshot, "missing group");
    }

    #[test]
    fn test_load_rejects_card_outside_group_column() {
        let (source, left, _) = seeded_board();
        let mut snapshot = source.snapshot();
        let card = snapshot.cards.iter_mut().find(|c| c.id == left[1]).unwrap();
        card.column = Column::Right;
        assert_rejected(snapshot, "group's column");
    }

    #[test]
    fn test_load_rejects_blank_names() {
        let (source, _, right) = seeded_board();
        let mut snapshot = source.snapshot();
        snapshot.groups[0].name = "  ".into();
        assert_rejected(snapshot, "empty name");

        let mut snapshot = source.snapshot();
        let card = snapshot.cards.iter_mut().find(|c| c.id == right[0]).unwrap();
        card.name = String::new();
        assert_rejected(snapshot, "empty name");
    }

    #[test]
    fn test_load_rejects_other_versions() {
        let (source, _, _) = seeded_board();
        let mut snapshot = source.snapshot();
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert_rejected(snapshot, "not supported");
    }

    #[test]
    fn test_load_rejects_id_at_end_of_range() {
        let snapshot: BoardSnapshot = serde_json::from_str(
            r#"{"version":1,"groups":[{"id":18446744073709551615,"column":"Left","name":"G"}],"cards":[],"connections":[]}"#,
        )
        .unwrap();
        assert_rejected(snapshot, "id space exhausted");
    }

    #[test]
    fn test_running_out_of_ids_is_an_error() {
        let mut snapshot = BoardSnapshot::default();
        snapshot.groups.push(Group { id: GroupId(u64::MAX - 1), column: Column::Left, name: "G".into() });

        let mut board = Board::new();
        board.dispatch(BoardAction::LoadState(snapshot)).unwrap();
        let revision = board.revision();

        let err = board
            .dispatch(BoardAction::AddCard { group: GroupId(u64::MAX - 1), name: "Late".into() })
            .unwrap_err();
        assert_eq!(err, BoardError::IdsExhausted);
        assert!(board.cards().is_empty());
        assert_eq!(board.revision(), revision);
    }
}

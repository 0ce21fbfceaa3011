//! Board entities
//!
//! Groups, cards and connections, plus the pending selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the board an entity lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Left,
    Right,
}

impl Column {
    /// Both columns, left first
    pub const ALL: [Column; 2] = [Column::Left, Column::Right];

    /// The column across the gutter
    pub fn opposite(self) -> Self {
        match self {
            Column::Left => Column::Right,
            Column::Right => Column::Left,
        }
    }

    /// Role a card in this column plays in a connection
    pub fn role(self) -> &'static str {
        match self {
            Column::Left => "Source",
            Column::Right => "Target",
        }
    }

    /// Index into per-column arrays (left = 0)
    pub fn index(self) -> usize {
        match self {
            Column::Left => 0,
            Column::Right => 1,
        }
    }
}

macro_rules! entity_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(GroupId, "g");
entity_id!(CardId, "c");
entity_id!(ConnectionId, "l");

/// Named cluster of cards within one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub column: Column,
    pub name: String,
}

/// Selectable item belonging to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub group: GroupId,
    /// Always the column of `group`
    pub column: Column,
    pub name: String,
}

/// Link between one left card and one right card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub left: CardId,
    pub right: CardId,
}

impl Connection {
    /// Check whether the card is either endpoint
    pub fn touches(&self, card: CardId) -> bool {
        self.left == card || self.right == card
    }
}

/// The card waiting for its counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub card: CardId,
    pub column: Column,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_opposite_and_role() {
        assert_eq!(Column::Left.opposite(), Column::Right);
        assert_eq!(Column::Right.opposite(), Column::Left);
        assert_eq!(Column::Left.role(), "Source");
        assert_eq!(Column::Right.role(), "Target");
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        let json = serde_json::to_string(&CardId(7)).unwrap();
        assert_eq!(json, "7");
        assert_eq!(CardId(7).to_string(), "c7");
    }

    #[test]
    fn test_connection_touches() {
        let conn = Connection { id: ConnectionId(3), left: CardId(1), right: CardId(2) };
        assert!(conn.touches(CardId(1)));
        assert!(conn.touches(CardId(2)));
        assert!(!conn.touches(CardId(3)));
    }
}

//! Board layout
//!
//! Places the two column panels, their group headers and card rows inside
//! the board area. The result doubles as the hit-test map for mouse input
//! and as the source of card positions for connection lines.

use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders},
};

use crate::board::{Board, CardId, Column, GroupId};

/// Label drawn on a column's top border to create a group
pub const ADD_GROUP_LABEL: &str = " + group ";
/// Label drawn at the end of a group header to create a card
pub const ADD_CARD_LABEL: &str = "+ card";

/// What occupies a laid-out row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    GroupHeader(GroupId),
    Card(CardId),
    /// Placeholder shown for a group without cards
    Empty(GroupId),
}

/// A visible row inside a column panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub column: Column,
    pub rect: Rect,
}

/// Result of a hit test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Card(CardId),
    /// The "+ card" affordance of a group header
    AddCard(GroupId),
    /// Anywhere else on a group header
    GroupHeader(GroupId),
    /// The "+ group" affordance on a column border
    AddGroup(Column),
    /// Empty space inside a column
    Column(Column),
}

/// Geometry of one column panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Whole panel including its border
    pub panel: Rect,
    /// Area inside the border
    pub inner: Rect,
    /// Where the "+ group" label sits on the top border
    pub add_group: Rect,
    /// Total rows of content, visible or not
    pub content_height: u16,
    /// Scroll offset actually applied, after clamping
    pub scroll: u16,
}

impl ColumnLayout {
    /// Largest useful scroll offset for this panel
    pub fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.inner.height)
    }
}

/// Positions of everything drawn on the board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardLayout {
    /// The whole board area; line coordinates are relative to it
    pub container: Rect,
    /// Space between the two panels
    pub gutter: Rect,
    pub columns: [ColumnLayout; 2],
    /// Visible rows of both columns, top to bottom per column
    pub rows: Vec<Row>,
    /// Visible cards only
    cards: HashMap<CardId, Rect>,
}

impl BoardLayout {
    /// Lay the board out inside `area`, with a scroll offset per column
    pub fn compute(board: &Board, area: Rect, scroll: [u16; 2]) -> Self {
        let thirds = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let mut layout = BoardLayout {
            container: area,
            gutter: thirds[1],
            ..Default::default()
        };

        for column in Column::ALL {
            let panel = match column {
                Column::Left => thirds[0],
                Column::Right => thirds[2],
            };
            layout.place_column(board, column, panel, scroll[column.index()]);
        }

        layout
    }

    fn place_column(&mut self, board: &Board, column: Column, panel: Rect, scroll: u16) {
        let inner = Block::default().borders(Borders::ALL).inner(panel);

        let label_width = ADD_GROUP_LABEL.chars().count() as u16;
        let add_group = if panel.width >= label_width + 4 {
            Rect::new(panel.right() - 1 - label_width, panel.y, label_width, 1)
        } else {
            Rect::default()
        };

        let content = column_content(board, column);

        let content_height = content.len().min(u16::MAX as usize) as u16;
        let max_scroll = content_height.saturating_sub(inner.height);
        let scroll = scroll.min(max_scroll);

        for (index, slot) in content.into_iter().enumerate() {
            let Some(visible) = (index as u16).checked_sub(scroll) else {
                continue;
            };
            if visible >= inner.height {
                break;
            }
            let Some(kind) = slot else {
                continue;
            };
            let y = inner.y + visible;
            let rect = match kind {
                RowKind::GroupHeader(_) => Rect::new(inner.x, y, inner.width, 1),
                // One cell of padding either side leaves room for line endpoints
                RowKind::Card(_) | RowKind::Empty(_) => {
                    Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1)
                }
            };
            if let RowKind::Card(id) = kind {
                self.cards.insert(id, rect);
            }
            self.rows.push(Row { kind, column, rect });
        }

        self.columns[column.index()] = ColumnLayout {
            panel,
            inner,
            add_group,
            content_height,
            scroll,
        };
    }

    /// Geometry of one column
    pub fn column(&self, column: Column) -> &ColumnLayout {
        &self.columns[column.index()]
    }

    /// Screen rect of a card, if it is currently visible
    pub fn card_rect(&self, card: CardId) -> Option<Rect> {
        self.cards.get(&card).copied()
    }

    /// Visible rows of one column
    pub fn rows_in(&self, column: Column) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |r| r.column == column)
    }

    /// Rect of the "+ card" label on a group header row
    pub fn add_card_rect(header: Rect) -> Rect {
        let width = ADD_CARD_LABEL.chars().count() as u16;
        if header.width < width + 2 {
            return Rect::default();
        }
        Rect::new(header.right() - width, header.y, width, 1)
    }

    /// Which column panel contains the point
    pub fn column_at(&self, x: u16, y: u16) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|c| contains(self.column(*c).panel, x, y))
    }

    /// The card under the point, if any
    pub fn card_at(&self, x: u16, y: u16) -> Option<CardId> {
        self.cards
            .iter()
            .find(|(_, rect)| contains(**rect, x, y))
            .map(|(id, _)| *id)
    }

    /// Resolve what a click at the point lands on
    pub fn hit_test(&self, x: u16, y: u16) -> Option<Hit> {
        for column in Column::ALL {
            if contains(self.column(column).add_group, x, y) {
                return Some(Hit::AddGroup(column));
            }
        }

        for row in &self.rows {
            match row.kind {
                RowKind::Card(id) if contains(row.rect, x, y) => return Some(Hit::Card(id)),
                RowKind::GroupHeader(group) if contains(row.rect, x, y) => {
                    if contains(Self::add_card_rect(row.rect), x, y) {
                        return Some(Hit::AddCard(group));
                    }
                    return Some(Hit::GroupHeader(group));
                }
                _ => {}
            }
        }

        self.column_at(x, y).map(Hit::Column)
    }
}

/// Content rows of a column in order, before scrolling; `None` is a blank
/// separator between groups
fn column_content(board: &Board, column: Column) -> Vec<Option<RowKind>> {
    let mut content = Vec::new();
    for group in board.groups_in(column) {
        if !content.is_empty() {
            content.push(None);
        }
        content.push(Some(RowKind::GroupHeader(group.id)));
        let before = content.len();
        content.extend(board.cards_in(group.id).map(|c| Some(RowKind::Card(c.id))));
        if content.len() == before {
            content.push(Some(RowKind::Empty(group.id)));
        }
    }
    content
}

/// Unscrolled row index of a card within its column
pub fn content_row(board: &Board, card: CardId) -> Option<u16> {
    let column = board.card(card)?.column;
    column_content(board, column)
        .iter()
        .position(|slot| *slot == Some(RowKind::Card(card)))
        .map(|index| index.min(u16::MAX as usize) as u16)
}

/// Check if a cell lies within a rectangle
pub fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardAction, Outcome};

    fn add_group(board: &mut Board, column: Column, name: &str) -> GroupId {
        match board.dispatch(BoardAction::AddGroup { column, name: name.into() }).unwrap() {
            Outcome::GroupAdded(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    fn add_card(board: &mut Board, group: GroupId, name: &str) -> CardId {
        match board.dispatch(BoardAction::AddCard { group, name: name.into() }).unwrap() {
            Outcome::CardAdded(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_panels_split_into_thirds() {
        let layout = BoardLayout::compute(&Board::new(), Rect::new(0, 0, 90, 20), [0, 0]);
        assert_eq!(layout.column(Column::Left).panel, Rect::new(0, 0, 30, 20));
        assert_eq!(layout.gutter, Rect::new(30, 0, 30, 20));
        assert_eq!(layout.column(Column::Right).panel, Rect::new(60, 0, 30, 20));
        assert_eq!(layout.column(Column::Left).inner, Rect::new(1, 1, 28, 18));
    }

    #[test]
    fn test_rows_stack_groups_and_cards() {
        let mut board = Board::new();
        let flows = add_group(&mut board, Column::Left, "Flows");
        let empty = add_group(&mut board, Column::Left, "Later");
        let login = add_card(&mut board, flows, "Login");
        let signup = add_card(&mut board, flows, "Signup");

        let layout = BoardLayout::compute(&board, Rect::new(0, 0, 90, 20), [0, 0]);
        let kinds: Vec<RowKind> = layout.rows_in(Column::Left).map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::GroupHeader(flows),
                RowKind::Card(login),
                RowKind::Card(signup),
                RowKind::GroupHeader(empty),
                RowKind::Empty(empty),
            ]
        );

        // Separator row between the groups
        assert_eq!(layout.card_rect(login), Some(Rect::new(2, 2, 26, 1)));
        assert_eq!(layout.card_rect(signup), Some(Rect::new(2, 3, 26, 1)));
        let later = layout.rows_in(Column::Left).nth(3).unwrap();
        assert_eq!(later.rect.y, 5);
        assert_eq!(layout.column(Column::Left).content_height, 6);
        assert_eq!(content_row(&board, signup), Some(2));
    }

    #[test]
    fn test_scroll_hides_rows_and_is_clamped() {
        let mut board = Board::new();
        let group = add_group(&mut board, Column::Right, "Checks");
        let cards: Vec<CardId> = (0..10)
            .map(|i| add_card(&mut board, group, &format!("Card {}", i)))
            .collect();

        // Inner height 4, content height 11
        let area = Rect::new(0, 0, 60, 6);
        let layout = BoardLayout::compute(&board, area, [0, 3]);
        assert_eq!(layout.card_rect(cards[0]), None);
        assert_eq!(layout.card_rect(cards[2]).map(|r| r.y), Some(1));
        assert_eq!(layout.card_rect(cards[6]), None);

        let clamped = BoardLayout::compute(&board, area, [0, 50]);
        assert_eq!(clamped.column(Column::Right).scroll, 7);
        assert!(clamped.card_rect(cards[9]).is_some());
    }

    #[test]
    fn test_hit_test() {
        let mut board = Board::new();
        let group = add_group(&mut board, Column::Left, "Flows");
        let card = add_card(&mut board, group, "Login");
        let layout = BoardLayout::compute(&board, Rect::new(0, 0, 90, 20), [0, 0]);

        assert_eq!(layout.hit_test(5, 2), Some(Hit::Card(card)));
        assert_eq!(layout.hit_test(3, 1), Some(Hit::GroupHeader(group)));
        assert_eq!(layout.hit_test(27, 1), Some(Hit::AddCard(group)));
        assert_eq!(layout.hit_test(25, 0), Some(Hit::AddGroup(Column::Left)));
        assert_eq!(layout.hit_test(70, 10), Some(Hit::Column(Column::Right)));
        assert_eq!(layout.hit_test(45, 10), None);
        assert_eq!(layout.card_at(5, 2), Some(card));
    }
}

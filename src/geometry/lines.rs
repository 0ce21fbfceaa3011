//! Connection line endpoints
//!
//! Each connection is drawn from the right edge of its left card to the left
//! edge of its right card, anchored at the vertical middle of both.

use ratatui::layout::Rect;

use super::layout::BoardLayout;
use crate::board::{Connection, ConnectionId};

/// A line to draw, in cells relative to the board container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub connection: ConnectionId,
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl LineSegment {
    /// Start point in absolute screen cells
    pub fn start(&self, container: Rect) -> (u16, u16) {
        (container.x + self.x1, container.y + self.y1)
    }

    /// End point in absolute screen cells
    pub fn end(&self, container: Rect) -> (u16, u16) {
        (container.x + self.x2, container.y + self.y2)
    }
}

/// Compute line endpoints for every connection whose cards are on screen
pub fn compute_lines(connections: &[Connection], layout: &BoardLayout) -> Vec<LineSegment> {
    let origin = layout.container;

    connections
        .iter()
        .filter_map(|conn| {
            // Cards scrolled out of view have no rect; their line is skipped
            let left = layout.card_rect(conn.left)?;
            let right = layout.card_rect(conn.right)?;

            Some(LineSegment {
                connection: conn.id,
                x1: left.right().saturating_sub(origin.x),
                y1: (left.y + left.height / 2).saturating_sub(origin.y),
                x2: right.x.saturating_sub(1).saturating_sub(origin.x),
                y2: (right.y + right.height / 2).saturating_sub(origin.y),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, BoardAction, CardId, Column, GroupId, Outcome};

    fn group(board: &mut Board, column: Column) -> GroupId {
        match board.dispatch(BoardAction::AddGroup { column, name: "G".into() }).unwrap() {
            Outcome::GroupAdded(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    fn card(board: &mut Board, group: GroupId, name: &str) -> CardId {
        match board.dispatch(BoardAction::AddCard { group, name: name.into() }).unwrap() {
            Outcome::CardAdded(id) => id,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    fn link(board: &mut Board, left: CardId, right: CardId) {
        board.dispatch(BoardAction::ClickCard { card: left }).unwrap();
        board.dispatch(BoardAction::ClickCard { card: right }).unwrap();
    }

    #[test]
    fn test_line_runs_between_card_edges() {
        let mut board = Board::new();
        let lg = group(&mut board, Column::Left);
        let rg = group(&mut board, Column::Right);
        let l1 = card(&mut board, lg, "a");
        let _r1 = card(&mut board, rg, "b");
        let r2 = card(&mut board, rg, "c");
        link(&mut board, l1, r2);

        // Board offset from the screen origin to check relative coordinates
        let area = Rect::new(4, 2, 90, 20);
        let layout = BoardLayout::compute(&board, area, [0, 0]);
        let lines = compute_lines(board.connections(), &layout);

        let left = layout.card_rect(l1).unwrap();
        let right = layout.card_rect(r2).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start(area), (left.right(), left.y));
        assert_eq!(lines[0].end(area), (right.x - 1, right.y));
        assert_eq!((lines[0].x1, lines[0].y1), (left.right() - 4, left.y - 2));
        assert!(lines[0].y2 > lines[0].y1);
    }

    #[test]
    fn test_hidden_card_has_no_line() {
        let mut board = Board::new();
        let lg = group(&mut board, Column::Left);
        let rg = group(&mut board, Column::Right);
        let l1 = card(&mut board, lg, "a");
        let cards: Vec<CardId> = (0..6).map(|i| card(&mut board, rg, &format!("r{}", i))).collect();
        link(&mut board, l1, cards[5]);

        let area = Rect::new(0, 0, 60, 6);
        let visible = BoardLayout::compute(&board, area, [0, 10]);
        assert_eq!(compute_lines(board.connections(), &visible).len(), 1);

        let scrolled_away = BoardLayout::compute(&board, area, [0, 0]);
        assert!(compute_lines(board.connections(), &scrolled_away).is_empty());
    }
}

//! Column panel widget
//!
//! Draws one side of the board: its frame, group headers and cards, at the
//! positions the board layout assigned them.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use super::truncate_name;
use crate::board::{Board, CardId, Column};
use crate::geometry::{BoardLayout, RowKind, ADD_CARD_LABEL, ADD_GROUP_LABEL};

const MUTED: Color = Color::Rgb(120, 120, 130);

/// Widget for one column of the board
pub struct ColumnWidget<'a> {
    board: &'a Board,
    layout: &'a BoardLayout,
    column: Column,
    title: &'a str,
    tone: Color,
    accent: Color,
    focused: bool,
    cursor: Option<CardId>,
}

impl<'a> ColumnWidget<'a> {
    pub fn new(board: &'a Board, layout: &'a BoardLayout, column: Column) -> Self {
        Self {
            board,
            layout,
            column,
            title: match column {
                Column::Left => "Left",
                Column::Right => "Right",
            },
            tone: Color::Gray,
            accent: Color::Red,
            focused: false,
            cursor: None,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn tone(mut self, tone: Color) -> Self {
        self.tone = tone;
        self
    }

    pub fn accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Card the keyboard cursor is on
    pub fn cursor(mut self, cursor: Option<CardId>) -> Self {
        self.cursor = cursor;
        self
    }

    fn render_card(&self, card: CardId, rect: Rect, buf: &mut Buffer) {
        let Some(card) = self.board.card(card) else {
            return;
        };

        let selected = self.board.is_selected(card.id);
        let linked = self.board.connection_of(card.id).is_some();
        let under_cursor = self.focused && self.cursor == Some(card.id);

        let mut style = Style::default().fg(Color::White);
        if linked {
            style = style.fg(self.accent);
        }
        if under_cursor {
            style = style.bg(Color::Rgb(40, 40, 50));
        }
        if selected {
            style = Style::default()
                .fg(Color::White)
                .bg(self.accent)
                .add_modifier(Modifier::BOLD);
        }

        // Fill the row so the highlight spans the whole card
        buf.set_style(rect, style);

        let role = card.column.role();
        let role_width = role.chars().count() as u16;
        let name_width = rect.width.saturating_sub(role_width + 3) as usize;
        let dot = Span::styled("● ", style.fg(if selected { Color::White } else { self.accent }));
        let name = Span::styled(truncate_name(&card.name, name_width), style);
        buf.set_line(rect.x, rect.y, &Line::from(vec![dot, name]), rect.width);

        if rect.width > role_width + 3 {
            let role_style = if selected { style } else { style.fg(MUTED) };
            buf.set_string(rect.right() - role_width, rect.y, role, role_style);
        }
    }
}

impl<'a> Widget for ColumnWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let geometry = self.layout.column(self.column);
        let panel = geometry.panel.intersection(area);
        if panel.is_empty() {
            return;
        }

        let mut border_style = Style::default().fg(self.tone);
        if self.focused {
            border_style = border_style.add_modifier(Modifier::BOLD);
        }
        let title = Line::from(Span::styled(
            format!(" {} ", self.title),
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
        ));
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .render(panel, buf);

        if !geometry.add_group.is_empty() {
            let style = Style::default().fg(Color::Black).bg(self.accent);
            buf.set_string(geometry.add_group.x, geometry.add_group.y, ADD_GROUP_LABEL, style);
        }

        for row in self.layout.rows_in(self.column) {
            match row.kind {
                RowKind::GroupHeader(group) => {
                    let Some(group) = self.board.group(group) else {
                        continue;
                    };
                    let add = BoardLayout::add_card_rect(row.rect);
                    let name_width = row.rect.width.saturating_sub(add.width + 1) as usize;
                    buf.set_string(
                        row.rect.x,
                        row.rect.y,
                        truncate_name(&group.name, name_width),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    );
                    if !add.is_empty() {
                        buf.set_string(
                            add.x,
                            add.y,
                            ADD_CARD_LABEL,
                            Style::default().fg(self.accent).add_modifier(Modifier::UNDERLINED),
                        );
                    }
                }
                RowKind::Card(card) => self.render_card(card, row.rect, buf),
                RowKind::Empty(_) => {
                    buf.set_string(
                        row.rect.x,
                        row.rect.y,
                        truncate_name("No cards yet.", row.rect.width as usize),
                        Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
                    );
                }
            }
        }
    }
}

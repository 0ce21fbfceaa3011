//! Main UI Application
//!
//! Owns the board and everything the screen needs to draw it, routes
//! keyboard and mouse input to board actions, and keeps connection lines in
//! step with where the cards were last drawn.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::input::{map_key, InputMode, UiCommand, HELP_LINES};
use super::widgets::{ColumnWidget, ConnectionsLayer, Prompt, PromptTarget, PromptWidget};
use crate::board::{Board, BoardAction, CardId, Column, GroupId, Outcome};
use crate::config::Settings;
use crate::geometry::{content_row, Geometry, Hit};
use crate::render::{detect_glyph_mode, LineGlyphs};
use crate::save::{load_board, save_board};

/// Severity of a status line message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
}

/// Message shown in the bottom bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

/// Main UI application
pub struct App {
    /// The state container everything else derives from
    board: Board,
    /// Card rects and connection lines from the last sync
    geometry: Geometry,
    /// Scroll offset per column (left, right)
    scroll: [u16; 2],
    /// Column the keyboard is working in
    focus: Column,
    /// Keyboard cursor per column, as an index into that column's cards
    cursor: [usize; 2],
    /// Open name prompt, if any
    prompt: Option<Prompt>,
    /// Whether the help overlay is showing
    show_help: bool,
    /// Last status message
    status: Option<Status>,
    settings: Settings,
    glyphs: LineGlyphs,
    /// Where Ctrl+S and Ctrl+O read and write
    board_path: PathBuf,
    /// The board was replaced since the last sync, so the layout does not
    /// describe what is on screen
    layout_stale: bool,
}

impl App {
    pub fn new(settings: Settings, board_path: PathBuf) -> Self {
        let glyph_mode = settings.glyph_mode.unwrap_or_else(detect_glyph_mode);

        Self {
            board: Board::new(),
            geometry: Geometry::new(),
            scroll: [0, 0],
            focus: Column::Left,
            cursor: [0, 0],
            prompt: None,
            show_help: false,
            status: None,
            glyphs: glyph_mode.line_glyphs(),
            settings,
            board_path,
            layout_stale: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn focus(&self) -> Column {
        self.focus
    }

    pub fn board_path(&self) -> &Path {
        &self.board_path
    }

    /// What keyboard input currently drives
    pub fn input_mode(&self) -> InputMode {
        if self.prompt.is_some() {
            InputMode::Prompt
        } else if self.show_help {
            InputMode::Help
        } else {
            InputMode::Board
        }
    }

    /// Apply a board action and describe the result on the status line
    pub fn dispatch(&mut self, action: BoardAction) -> Result<Outcome> {
        let outcome = self.board.dispatch(action)?;
        let text = self.describe(&outcome);
        log::debug!("{}", text);
        self.set_status(text, StatusKind::Info);
        Ok(outcome)
    }

    fn describe(&self, outcome: &Outcome) -> String {
        let card_name = |id: CardId| {
            self.board
                .card(id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        match outcome {
            Outcome::GroupAdded(id) => {
                let name = self.board.group(*id).map(|g| g.name.as_str()).unwrap_or("?");
                format!("Created group '{}'", name)
            }
            Outcome::CardAdded(id) => format!("Created card '{}'", card_name(*id)),
            Outcome::Selected(id) => {
                let role = self.board.card(*id).map(|c| c.column.role()).unwrap_or("Card");
                format!(
                    "Selected '{}' ({}). Pick a card in the other column to link it.",
                    card_name(*id),
                    role
                )
            }
            Outcome::SelectionMoved { to, .. } => format!("Selected '{}'", card_name(*to)),
            Outcome::Deselected(_) | Outcome::SelectionCleared => "Selection cleared".to_string(),
            Outcome::Connected { connection, evicted } => {
                let pair = self
                    .board
                    .connections()
                    .iter()
                    .find(|c| c.id == *connection)
                    .map(|c| (card_name(c.left), card_name(c.right)));
                let mut text = match pair {
                    Some((left, right)) => format!("Linked '{}' → '{}'", left, right),
                    None => "Linked".to_string(),
                };
                if *evicted > 0 {
                    text.push_str(&format!(" (replaced {} link{})", evicted, if *evicted == 1 { "" } else { "s" }));
                }
                text
            }
            Outcome::Disconnected { left, right } => {
                format!("Unlinked '{}' and '{}'", card_name(*left), card_name(*right))
            }
            Outcome::Loaded => format!("Board loaded from {}", self.board_path.display()),
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(Status { text: text.into(), kind });
    }

    /// Put an input-handling error on the status line
    pub fn show_error(&mut self, error: &anyhow::Error) {
        self.set_status(format!("{:#}", error), StatusKind::Warning);
    }

    /// Handle keyboard input, returns true if should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match map_key(key, self.input_mode()) {
            Some(command) => self.run_command(command),
            None => Ok(false),
        }
    }

    /// Execute a UI command, returns true if should quit
    pub fn run_command(&mut self, command: UiCommand) -> Result<bool> {
        match command {
            UiCommand::Quit => return Ok(true),
            UiCommand::ToggleHelp => self.show_help = !self.show_help,

            UiCommand::SwitchColumn => self.focus = self.focus.opposite(),
            UiCommand::FocusColumn(column) => self.focus = column,
            UiCommand::MoveCursor(delta) => self.move_cursor(delta),
            UiCommand::Activate => {
                if let Some(card) = self.cursor_card(self.focus) {
                    self.dispatch(BoardAction::ClickCard { card })?;
                }
            }
            UiCommand::ClearSelection => {
                if self.board.selection().is_some() {
                    self.dispatch(BoardAction::ClearSelection)?;
                }
            }

            UiCommand::NewGroup => self.open_prompt(PromptTarget::Group(self.focus)),
            UiCommand::NewCard => match self.focused_group() {
                Some(group) => self.open_prompt(PromptTarget::Card(group)),
                None => self.set_status("Create a group first (g)", StatusKind::Warning),
            },

            UiCommand::PromptInsert(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.push(c);
                }
            }
            UiCommand::PromptBackspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.backspace();
                }
            }
            UiCommand::PromptCancel => self.prompt = None,
            UiCommand::PromptSubmit => self.submit_prompt()?,

            UiCommand::Save => self.save()?,
            UiCommand::Load => self.load()?,
        }
        Ok(false)
    }

    /// Handle mouse input, returns true if should quit
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<bool> {
        // Overlays swallow the pointer, and so does a layout from before a load
        if self.input_mode() != InputMode::Board || self.layout_stale {
            return Ok(false);
        }

        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self.geometry.layout().hit_test(x, y);
                match hit {
                    Some(Hit::Card(card)) => {
                        self.move_cursor_to(card);
                        self.dispatch(BoardAction::ClickCard { card })?;
                    }
                    Some(Hit::AddGroup(column)) => {
                        self.focus = column;
                        self.open_prompt(PromptTarget::Group(column));
                    }
                    Some(Hit::AddCard(group)) => {
                        if let Some(column) = self.board.group(group).map(|g| g.column) {
                            self.focus = column;
                        }
                        self.open_prompt(PromptTarget::Card(group));
                    }
                    Some(Hit::GroupHeader(group)) => {
                        if let Some(column) = self.board.group(group).map(|g| g.column) {
                            self.focus = column;
                        }
                    }
                    Some(Hit::Column(column)) => self.focus = column,
                    None => {}
                }
            }
            MouseEventKind::ScrollDown => {
                let layout = self.geometry.layout();
                if let Some(column) = layout.column_at(x, y) {
                    let max = layout.column(column).max_scroll();
                    let scroll = &mut self.scroll[column.index()];
                    *scroll = scroll.saturating_add(1).min(max);
                }
            }
            MouseEventKind::ScrollUp => {
                if let Some(column) = self.geometry.layout().column_at(x, y) {
                    let scroll = &mut self.scroll[column.index()];
                    *scroll = scroll.saturating_sub(1);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Terminal was resized; lines are recomputed on the next sync
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        log::debug!("Terminal resized to {}x{}", width, height);
        self.geometry.invalidate();
    }

    /// Recompute card positions and lines for a screen of size `area` if
    /// anything they depend on changed
    pub fn sync_geometry(&mut self, area: Rect) {
        let (_, board_area, _) = screen_areas(area);
        self.layout_stale = false;
        if self.geometry.sync(&self.board, board_area, self.scroll) {
            // Keep stored offsets within what the layout allows
            for column in Column::ALL {
                self.scroll[column.index()] = self.geometry.layout().column(column).scroll;
            }
        }
    }

    fn open_prompt(&mut self, target: PromptTarget) {
        self.show_help = false;
        self.prompt = Some(Prompt::new(target));
    }

    fn submit_prompt(&mut self) -> Result<()> {
        let Some(prompt) = self.prompt.as_ref() else {
            return Ok(());
        };
        // Blank names keep the prompt open
        let Some(name) = prompt.value().map(str::to_string) else {
            return Ok(());
        };

        let action = match prompt.target {
            PromptTarget::Group(column) => BoardAction::AddGroup { column, name },
            PromptTarget::Card(group) => BoardAction::AddCard { group, name },
        };
        self.prompt = None;

        if let Outcome::CardAdded(card) = self.dispatch(action)? {
            self.move_cursor_to(card);
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        save_board(&self.board, &self.board_path)
            .with_context(|| format!("Could not save to {}", self.board_path.display()))?;
        self.set_status(format!("Board saved to {}", self.board_path.display()), StatusKind::Info);
        Ok(())
    }

    /// Replace the board with the contents of the board file
    pub fn load(&mut self) -> Result<()> {
        let snapshot = load_board(&self.board_path)
            .with_context(|| format!("Could not load {}", self.board_path.display()))?;
        self.dispatch(BoardAction::LoadState(snapshot))
            .with_context(|| format!("Could not load {}", self.board_path.display()))?;
        self.scroll = [0, 0];
        self.cursor = [0, 0];
        self.geometry.invalidate();
        self.layout_stale = true;
        Ok(())
    }

    /// Called once when the app is about to exit
    pub fn on_exit(&mut self) -> Result<()> {
        if self.settings.save_on_exit {
            self.save()?;
        }
        Ok(())
    }

    /// Cards of a column in display order
    fn column_cards(&self, column: Column) -> Vec<CardId> {
        self.board
            .groups_in(column)
            .flat_map(|g| self.board.cards_in(g.id).map(|c| c.id))
            .collect()
    }

    /// Card under the keyboard cursor in a column
    pub fn cursor_card(&self, column: Column) -> Option<CardId> {
        let cards = self.column_cards(column);
        let last = cards.len().checked_sub(1)?;
        cards.get(self.cursor[column.index()].min(last)).copied()
    }

    /// Group new cards go into: the cursor card's group, else the last group
    fn focused_group(&self) -> Option<GroupId> {
        self.cursor_card(self.focus)
            .and_then(|card| self.board.card(card).map(|c| c.group))
            .or_else(|| self.board.groups_in(self.focus).last().map(|g| g.id))
    }

    fn move_cursor(&mut self, delta: i32) {
        let count = self.column_cards(self.focus).len();
        if count == 0 {
            return;
        }
        let index = self.focus.index();
        let current = self.cursor[index].min(count - 1) as i64;
        let next = (current + delta as i64).clamp(0, count as i64 - 1) as usize;
        self.cursor[index] = next;

        if let Some(card) = self.cursor_card(self.focus) {
            self.scroll_to(card);
        }
    }

    fn move_cursor_to(&mut self, card: CardId) {
        let Some(column) = self.board.card(card).map(|c| c.column) else {
            return;
        };
        if let Some(index) = self.column_cards(column).iter().position(|c| *c == card) {
            self.focus = column;
            self.cursor[column.index()] = index;
        }
    }

    /// Adjust the column scroll so the card's row is on screen
    fn scroll_to(&mut self, card: CardId) {
        let Some(column) = self.board.card(card).map(|c| c.column) else {
            return;
        };
        let Some(row) = content_row(&self.board, card) else {
            return;
        };
        let height = self.geometry.layout().column(column).inner.height;
        if height == 0 {
            return;
        }

        let scroll = &mut self.scroll[column.index()];
        if row < *scroll {
            *scroll = row;
        } else if row >= *scroll + height {
            *scroll = row + 1 - height;
        }
    }

    /// Render the whole screen
    pub fn render(&self, frame: &mut Frame) {
        let (header, board_area, status) = screen_areas(frame.area());
        let accent = rgb(self.settings.accent);

        self.render_header(frame, header, accent);

        let layout = self.geometry.layout();
        for column in Column::ALL {
            let (title, tone) = match column {
                Column::Left => (self.settings.left_title.as_str(), self.settings.left_tone),
                Column::Right => (self.settings.right_title.as_str(), self.settings.right_tone),
            };
            let widget = ColumnWidget::new(&self.board, layout, column)
                .title(title)
                .tone(rgb(tone))
                .accent(accent)
                .focused(self.focus == column)
                .cursor(self.cursor_card(column));
            frame.render_widget(widget, board_area);
        }

        // Lines go on top so they meet the card edges
        frame.render_widget(
            ConnectionsLayer::new(self.geometry.lines())
                .glyphs(self.glyphs)
                .style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            layout.container,
        );

        self.render_status(frame, status);

        if self.show_help {
            self.render_help(frame, accent);
        }

        if let Some(prompt) = &self.prompt {
            let area = centered_box(44, 5, frame.area());
            frame.render_widget(PromptWidget::new(prompt).accent(accent), area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, accent: Color) {
        let counts = format!(
            "{} groups · {} cards · {} links",
            self.board.groups().len(),
            self.board.cards().len(),
            self.board.connections().len()
        );
        let line = Line::from(vec![
            Span::styled(" linkboard ", Style::default().fg(Color::White).bg(accent).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(counts, Style::default().fg(Color::Gray)),
            Span::raw("   "),
            Span::styled("? help", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(Status { text, kind: StatusKind::Warning }) => {
                Line::from(Span::styled(format!(" ! {}", text), Style::default().fg(Color::Yellow)))
            }
            Some(Status { text, kind: StatusKind::Info }) => {
                Line::from(Span::styled(format!(" {}", text), Style::default().fg(Color::Gray)))
            }
            None => Line::from(Span::styled(
                " Click a card, then a card in the other column to link them.",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help(&self, frame: &mut Frame, accent: Color) {
        let height = HELP_LINES.len() as u16 + 2;
        let area = centered_box(60, height, frame.area());
        frame.render_widget(Clear, area);

        let lines: Vec<Line> = HELP_LINES
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:<8}", key), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    Span::styled(*desc, Style::default().fg(Color::Gray)),
                ])
            })
            .collect();

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Split the screen into header, board and status bar
fn screen_areas(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Create a centered rectangle of at most `width` x `height`
fn centered_box(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

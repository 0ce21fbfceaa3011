//! Name prompt
//!
//! Small single-line form used to name new groups and cards.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::board::{Column, GroupId};

/// What the typed name will create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTarget {
    Group(Column),
    Card(GroupId),
}

/// An open prompt and its text so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub target: PromptTarget,
    pub input: String,
}

impl Prompt {
    pub fn new(target: PromptTarget) -> Self {
        Self { target, input: String::new() }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// The name to submit, or None while it is blank
    pub fn value(&self) -> Option<&str> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    fn label(&self) -> &'static str {
        match self.target {
            PromptTarget::Group(_) => "Group name",
            PromptTarget::Card(_) => "Card name",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self.target {
            PromptTarget::Group(_) => "e.g. Flows",
            PromptTarget::Card(_) => "e.g. Validate copy",
        }
    }
}

/// Widget rendering a prompt as a popup
pub struct PromptWidget<'a> {
    prompt: &'a Prompt,
    accent: Color,
}

impl<'a> PromptWidget<'a> {
    pub fn new(prompt: &'a Prompt) -> Self {
        Self { prompt, accent: Color::Red }
    }

    pub fn accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }
}

impl<'a> Widget for PromptWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.prompt.label()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent));

        let input = if self.prompt.input.is_empty() {
            Line::from(vec![
                Span::styled("▏", Style::default().fg(self.accent)),
                Span::styled(self.prompt.placeholder(), Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(vec![
                Span::styled(self.prompt.input.clone(), Style::default().fg(Color::White)),
                Span::styled("▏", Style::default().fg(self.accent)),
            ])
        };

        let hints = Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" OK   "),
            Span::styled("Esc", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ]);

        Paragraph::new(vec![input, Line::default(), hints])
            .block(block)
            .render(area, buf);
    }
}

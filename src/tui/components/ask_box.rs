//! # Ask Box Component
//!
//! Overlay with a single free-text field for questions to the AI.
//! Opened with `a`; Enter emits the text, Esc cancels. The buffer is
//! emitted as typed: whether a blank question is rejected is up to `update()`.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_rect;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskEvent {
    Submit(String),
    Cancel,
}

#[derive(Debug, Default)]
pub struct AskBox {
    pub buffer: String,
}

impl AskBox {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for AskBox {
    type Event = AskEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<AskEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                // Questions are one line; fold pasted newlines into spaces
                self.buffer
                    .extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Submit => Some(AskEvent::Submit(self.buffer.clone())),
            TuiEvent::Escape => Some(AskEvent::Cancel),
            _ => None,
        }
    }
}

/// The buffer hard-wrapped at a column width, with the cursor after the last character.
#[derive(Debug, PartialEq, Eq)]
struct WrappedInput {
    rows: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
}

/// Wraps by display columns rather than words so the cursor lands exactly
/// where the next character will appear. A full last row pushes the cursor
/// onto a fresh one.
fn wrap_input(text: &str, width: usize) -> WrappedInput {
    let mut rows = vec![String::new()];
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && used > 0 {
            rows.push(String::new());
            used = 0;
        }
        used += w;
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
    }
    let (cursor_row, cursor_col) = if used >= width {
        (rows.len(), 0)
    } else {
        (rows.len() - 1, used)
    };
    WrappedInput {
        rows,
        cursor_row,
        cursor_col,
    }
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

impl Component for AskBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 30, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Ask the AI ")
            .title_bottom(Line::from(" Enter Ask  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);

        frame.render_widget(block, overlay);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.buffer.is_empty() {
            let placeholder =
                Paragraph::new("Type your question...").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(placeholder, inner);
            frame.set_cursor_position(Position::new(inner.x, inner.y));
            return;
        }

        // Long questions scroll so the cursor row stays visible
        let height = inner.height as usize;
        let wrapped = wrap_input(&self.buffer, inner.width as usize);
        let first_visible = (wrapped.cursor_row + 1).saturating_sub(height);
        let lines: Vec<Line> = wrapped
            .rows
            .iter()
            .skip(first_visible)
            .take(height)
            .map(|row| Line::raw(row.clone()))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        let col = to_u16(wrapped.cursor_col).min(inner.width - 1);
        let row = to_u16(wrapped.cursor_row - first_visible).min(inner.height - 1);
        frame.set_cursor_position(Position::new(inner.x + col, inner.y + row));
    }
}

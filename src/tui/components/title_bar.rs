//! # TitleBar Component
//!
//! Top status line: application name, the map's root title, and the current
//! status message. While an outbound request is in flight a spinner frame is
//! prepended to the status.
//!
//! Stateless: every field is a prop copied from `App` each frame.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub struct TitleBar {
    /// Title of the map's root node
    pub map_title: String,
    pub status_message: String,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl TitleBar {
    pub fn new(map_title: String, status_message: String, is_loading: bool) -> Self {
        Self {
            map_title,
            status_message,
            is_loading,
            spinner_frame: 0,
        }
    }

    pub fn with_spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                "Canopy",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" ({})", self.map_title)),
        ];

        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            if self.is_loading {
                let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
                spans.push(Span::styled(
                    format!("{glyph} "),
                    Style::default().fg(Color::Yellow),
                ));
            }
            spans.push(Span::raw(self.status_message.clone()));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

//! # Search Overlay Component
//!
//! Incremental title search over every leaf, opened with `/`.
//! Each keystroke re-runs `search_leaves`; at most `MAX_SEARCH_RESULTS`
//! matches are listed, with the total shown when more exist.
//! Enter emits the selected leaf's key path for `Action::JumpTo`.
//!
//! Same persistent state + transient render shape as the other overlays,
//! except the state renders itself since it needs no outside props.

use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::search::{LeafEntry, MAX_SEARCH_RESULTS, collect_leaves, search_leaves};
use crate::core::tree::Tree;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{centered_rect, truncate_to_width};
use crate::tui::event::TuiEvent;

pub enum SearchEvent {
    Select(Vec<String>),
    Dismiss,
}

pub struct SearchState {
    tree: Arc<Tree>,
    /// Number of leaves in the whole map, shown before anything is typed.
    pub leaf_total: usize,
    pub query: String,
    /// Every match, not just the visible ones.
    pub matches: Vec<LeafEntry>,
    pub selected: usize,
    pub list_state: ListState,
}

impl SearchState {
    pub fn new(tree: Arc<Tree>) -> Self {
        let leaf_total = collect_leaves(&tree).len();
        Self {
            tree,
            leaf_total,
            query: String::new(),
            matches: Vec::new(),
            selected: 0,
            list_state: ListState::default(),
        }
    }

    fn visible_count(&self) -> usize {
        self.matches.len().min(MAX_SEARCH_RESULTS)
    }

    fn refresh(&mut self) {
        self.matches = search_leaves(&self.tree, &self.query);
        self.selected = 0;
        self.list_state
            .select(if self.matches.is_empty() { None } else { Some(0) });
    }
}

impl EventHandler for SearchState {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SearchEvent> {
        match event {
            TuiEvent::Escape => Some(SearchEvent::Dismiss),
            TuiEvent::InputChar(c) => {
                self.query.push(*c);
                self.refresh();
                None
            }
            TuiEvent::Paste(text) => {
                self.query.push_str(text.trim());
                self.refresh();
                None
            }
            TuiEvent::Backspace => {
                self.query.pop();
                self.refresh();
                None
            }
            TuiEvent::CursorUp => {
                if self.visible_count() > 0 {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                let visible = self.visible_count();
                if visible > 0 {
                    self.selected = (self.selected + 1).min(visible - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => self
                .matches
                .get(self.selected)
                .map(|leaf| SearchEvent::Select(leaf.path.clone())),
            _ => None,
        }
    }
}

impl Component for SearchState {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Search leaves ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Enter Go  Esc Back ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [query_area, summary_area, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        frame.render_widget(
            Line::from(vec![
                Span::styled("/ ", Style::default().fg(Color::Cyan)),
                Span::raw(self.query.clone()),
            ]),
            query_area,
        );

        let summary = if self.query.trim().is_empty() {
            format!(
                "There are {} leaves. Type part of a title",
                self.leaf_total
            )
        } else if self.matches.is_empty() {
            "No matching leaves".to_string()
        } else if self.matches.len() > MAX_SEARCH_RESULTS {
            format!(
                "Showing {} of {} matches",
                MAX_SEARCH_RESULTS,
                self.matches.len()
            )
        } else {
            format!("{} match(es)", self.matches.len())
        };
        frame.render_widget(
            Paragraph::new(summary).style(Style::default().fg(Color::DarkGray)),
            summary_area,
        );

        let width = list_area.width as usize;
        let items: Vec<ListItem> = self
            .matches
            .iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|leaf| {
                let location = format!("  {}", leaf.path_label());
                let title_width = width.saturating_sub(location.width()).max(width / 2);
                let title = truncate_to_width(&leaf.title, title_width);
                let location_width = width.saturating_sub(title.width());
                ListItem::new(Line::from(vec![
                    Span::raw(title),
                    Span::styled(
                        truncate_to_width(&location, location_width),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
        frame.render_stateful_widget(list, list_area, &mut self.list_state);
    }
}

//! # Node View Component
//!
//! The main panel: current node title and description, then either the
//! child list (category) or the leaf panel with its message and send hint.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `NodeViewState` lives in `TuiState` and remembers the selected child
//! - `NodeView` is created each frame with the borrowed state and node

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::tree::TreeNode;
use crate::tui::component::Component;
use crate::tui::components::truncate_to_width;

const CATEGORY_ICON: &str = "[+]";
const LEAF_ICON: &str = "[-]";

/// Why the send action is or isn't available on a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendHint {
    Ready,
    Sent,
    Busy,
    NoMessage,
    NotConfigured,
}

impl SendHint {
    fn text(self) -> &'static str {
        match self {
            SendHint::Ready => "Press s to send this message",
            SendHint::Sent => "Message sent! Press s to send it again",
            SendHint::Busy => "Waiting for the current request...",
            SendHint::NoMessage => "This leaf has no message to send",
            SendHint::NotConfigured => {
                "Sending is disabled: set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID"
            }
        }
    }

    fn style(self) -> Style {
        match self {
            SendHint::Ready => Style::default().fg(Color::Cyan),
            SendHint::Sent => Style::default().fg(Color::Green),
            SendHint::Busy => Style::default().fg(Color::Yellow),
            SendHint::NoMessage | SendHint::NotConfigured => Style::default().fg(Color::DarkGray),
        }
    }
}

/// Selected child index, kept across frames.
#[derive(Debug, Default)]
pub struct NodeViewState {
    pub selected: usize,
    pub list_state: ListState,
}

impl NodeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the first child. Called after every successful navigation.
    pub fn reset(&mut self) {
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    /// Select the child with `key`, falling back to the first one.
    pub fn select_key(&mut self, children: &[(String, TreeNode)], key: &str) {
        self.selected = children.iter().position(|(k, _)| k == key).unwrap_or(0);
        self.list_state.select(Some(self.selected));
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.list_state.select(Some(self.selected));
    }

    pub fn select_next(&mut self, child_count: usize) {
        if child_count == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(child_count - 1);
        self.list_state.select(Some(self.selected));
    }

    pub fn selected_key<'a>(&self, children: &'a [(String, TreeNode)]) -> Option<&'a str> {
        children.get(self.selected).map(|(key, _)| key.as_str())
    }
}

/// Transient render wrapper for the current node.
pub struct NodeView<'a> {
    state: &'a mut NodeViewState,
    node: &'a TreeNode,
    hint: SendHint,
}

impl<'a> NodeView<'a> {
    pub fn new(state: &'a mut NodeViewState, node: &'a TreeNode, hint: SendHint) -> Self {
        Self { state, node, hint }
    }

    fn render_children(&mut self, frame: &mut Frame, area: Rect) {
        let children = self.node.children();
        if children.is_empty() {
            let empty = Paragraph::new("No sub-topics available.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        }

        // Keep the selection in range if the panel was drawn for another node
        if self.state.selected >= children.len() {
            self.state.selected = 0;
        }
        self.state.list_state.select(Some(self.state.selected));

        let label_width = (area.width as usize).saturating_sub(CATEGORY_ICON.len() + 3);
        let items: Vec<ListItem> = children
            .iter()
            .map(|(key, child)| {
                let (icon, icon_style) = if child.is_category() {
                    (CATEGORY_ICON, Style::default().fg(Color::Yellow))
                } else {
                    (LEAF_ICON, Style::default().fg(Color::Green))
                };
                let label = if child.title.is_empty() {
                    key.as_str()
                } else {
                    child.title.as_str()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(icon, icon_style),
                    Span::raw(" "),
                    Span::raw(truncate_to_width(label, label_width)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }

    fn render_leaf(&self, frame: &mut Frame, area: Rect) {
        let [banner_area, message_area, hint_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let banner = Paragraph::new("You reached a leaf of the concept map!").style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(banner, banner_area);

        let message_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Message to send ");
        let message = match self.node.message() {
            Some(text) => Paragraph::new(text.to_string()),
            None => Paragraph::new("(none)").style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(
            message.block(message_block).wrap(Wrap { trim: false }),
            message_area,
        );

        frame.render_widget(
            Paragraph::new(self.hint.text()).style(self.hint.style()),
            hint_area,
        );
    }
}

impl Component for NodeView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} ", self.node.title),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let description_height = match &self.node.description {
            Some(text) if inner.width > 0 => {
                (text.width().div_ceil(inner.width as usize).clamp(1, 4) + 1) as u16
            }
            _ => 0,
        };
        let [description_area, body_area] =
            Layout::vertical([Constraint::Length(description_height), Constraint::Min(0)])
                .areas(inner);

        if let Some(description) = &self.node.description {
            let paragraph = Paragraph::new(description.clone())
                .style(Style::default().add_modifier(Modifier::ITALIC))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, description_area);
        }

        if self.node.is_category() {
            self.render_children(frame, body_area);
        } else {
            self.render_leaf(frame, body_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::load;
    use crate::test_support::SAMPLE_MAP;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(node: &TreeNode, state: &mut NodeViewState, hint: SendHint) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal
            .draw(|f| NodeView::new(state, node, hint).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_category_lists_children_with_icons() {
        let tree = load(SAMPLE_MAP).unwrap();
        let mut state = NodeViewState::new();
        let text = draw(tree.root(), &mut state, SendHint::NoMessage);

        assert!(text.contains("Root"));
        assert!(text.contains("Start here"));
        assert!(text.contains("[+] A"));
    }

    #[test]
    fn test_empty_category() {
        let tree = load(r#"{"title":"Lonely","children":{}}"#).unwrap();
        let mut state = NodeViewState::new();
        let text = draw(tree.root(), &mut state, SendHint::NoMessage);
        assert!(text.contains("No sub-topics available."));
    }

    #[test]
    fn test_leaf_shows_message_and_hint() {
        let tree = load(SAMPLE_MAP).unwrap();
        let leaf = tree
            .resolve(&["a".to_string(), "leaf1".to_string()])
            .unwrap();
        let mut state = NodeViewState::new();
        let text = draw(leaf, &mut state, SendHint::Ready);

        assert!(text.contains("You reached a leaf"));
        assert!(text.contains("hi"));
        assert!(text.contains("Press s to send"));
    }

    #[test]
    fn test_leaf_without_configuration_explains_why() {
        let tree = load(SAMPLE_MAP).unwrap();
        let leaf = tree
            .resolve(&["a".to_string(), "leaf1".to_string()])
            .unwrap();
        let mut state = NodeViewState::new();
        let text = draw(leaf, &mut state, SendHint::NotConfigured);
        assert!(text.contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let tree = load(
            r#"{"title":"R","children":{"x":{"title":"X"},"y":{"title":"Y"},"z":{"title":"Z"}}}"#,
        )
        .unwrap();
        let children = tree.root().children();
        let mut state = NodeViewState::new();

        state.select_next(children.len());
        state.select_next(children.len());
        state.select_next(children.len());
        assert_eq!(state.selected_key(children), Some("z"));

        state.select_previous();
        assert_eq!(state.selected_key(children), Some("y"));

        state.select_key(children, "x");
        assert_eq!(state.selected, 0);

        state.reset();
        assert_eq!(state.selected_key(children), Some("x"));
    }
}

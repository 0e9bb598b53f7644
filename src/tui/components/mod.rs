//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive everything as struct fields, copied from `App` each frame:
//! - `TitleBar`: app name, map title, status message, spinner
//! - `Breadcrumb`: `Home > ... > current`
//! - `Sidebar`: statistics and configured services
//!
//! ### Stateful Components (Event-Driven)
//!
//! Keep local state across frames and emit high-level events:
//! - `NodeView` / `NodeViewState`: the current node and the selected child
//! - `AskBox`: question overlay, emits `AskEvent`
//! - `SearchState`: leaf search overlay, emits `SearchEvent`
//!
//! Each file holds the component's state, events, rendering and tests.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file, shared layout helpers)
//! ├── title_bar.rs
//! ├── breadcrumb.rs
//! ├── node_view.rs
//! ├── sidebar.rs
//! ├── ask_box.rs
//! └── search_overlay.rs
//! ```

use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub mod ask_box;
mod breadcrumb;
pub mod node_view;
pub mod search_overlay;
mod sidebar;
mod title_bar;

pub use ask_box::{AskBox, AskEvent};
pub use breadcrumb::Breadcrumb;
pub use node_view::{NodeView, NodeViewState, SendHint};
pub use search_overlay::{SearchEvent, SearchState};
pub use sidebar::Sidebar;
pub use title_bar::TitleBar;

/// Truncate to `max_width` terminal columns, ending in "..." when cut.
pub(crate) fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Spaces", 10), "Spaces");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("Hausdorff spaces", 10), "Hausdor...");
        assert_eq!(truncate_to_width("Hausdorff", 2), "..");
    }

    #[test]
    fn test_truncate_counts_wide_chars() {
        // Each CJK character takes two columns
        assert_eq!(truncate_to_width("拓扑空间定义", 7), "拓扑...");
    }
}

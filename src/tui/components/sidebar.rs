//! Sidebar: whole-map statistics, current depth, and which outbound
//! services are configured.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::core::stats::TreeStatistics;
use crate::tui::component::Component;

pub struct Sidebar {
    pub stats: TreeStatistics,
    /// Length of the current key path
    pub depth: usize,
    pub chat_enabled: bool,
    pub ai_enabled: bool,
}

fn stat_line(label: &str, value: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<14}"), Style::default().fg(Color::Gray)),
        Span::raw(value.to_string()),
    ])
}

fn service_line(label: &str, enabled: bool) -> Line<'static> {
    let (marker, style) = if enabled {
        ("on", Style::default().fg(Color::Green))
    } else {
        ("off", Style::default().fg(Color::DarkGray))
    };
    Line::from(vec![
        Span::styled(format!("{label:<14}"), Style::default().fg(Color::Gray)),
        Span::styled(marker, style),
    ])
}

impl Component for Sidebar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            stat_line("Categories", self.stats.category_count),
            stat_line("Leaves", self.stats.leaf_count),
            stat_line("Total nodes", self.stats.total()),
            stat_line("Sendable", self.stats.sendable_leaf_count),
            stat_line("Max depth", self.stats.max_depth),
            stat_line("Current depth", self.depth),
            Line::raw(""),
            service_line("Chat bot", self.chat_enabled),
            service_line("AI answers", self.ai_enabled),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Statistics ")
            .padding(Padding::horizontal(1));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_sidebar_shows_counts_and_services() {
        let mut sidebar = Sidebar {
            stats: TreeStatistics {
                category_count: 2,
                leaf_count: 1,
                sendable_leaf_count: 1,
                max_depth: 2,
            },
            depth: 1,
            chat_enabled: true,
            ai_enabled: false,
        };
        let mut terminal = Terminal::new(TestBackend::new(30, 12)).unwrap();
        terminal.draw(|f| sidebar.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect();

        assert!(rows.iter().any(|r| r.contains("Categories") && r.contains('2')));
        assert!(rows.iter().any(|r| r.contains("Total nodes") && r.contains('3')));
        assert!(rows.iter().any(|r| r.contains("Current depth") && r.contains('1')));
        assert!(rows.iter().any(|r| r.contains("Chat bot") && r.contains("on")));
        assert!(rows.iter().any(|r| r.contains("AI answers") && r.contains("off")));
    }
}

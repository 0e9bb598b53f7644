//! Breadcrumb bar: `Home > Spaces > Hausdorff`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::navigator::Crumb;
use crate::tui::component::Component;

const SEPARATOR: &str = " > ";

pub struct Breadcrumb {
    pub crumbs: Vec<Crumb>,
}

impl Breadcrumb {
    pub fn new(crumbs: Vec<Crumb>) -> Self {
        Self { crumbs }
    }

    /// Labels in display order. The root always reads "Home".
    fn labels(&self) -> Vec<&str> {
        self.crumbs
            .iter()
            .map(|crumb| match crumb.key {
                None => "Home",
                Some(_) => crumb.title.as_str(),
            })
            .collect()
    }
}

impl Component for Breadcrumb {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let labels = self.labels();
        let last = labels.len().saturating_sub(1);
        let mut spans = Vec::with_capacity(labels.len() * 2);

        for (i, label) in labels.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(SEPARATOR, Style::default().fg(Color::DarkGray)));
            }
            let style = if i == last {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(label.to_string(), style));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn crumb(key: Option<&str>, title: &str) -> Crumb {
        Crumb {
            key: key.map(str::to_string),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_root_reads_home() {
        let breadcrumb = Breadcrumb::new(vec![crumb(None, "Topology")]);
        assert_eq!(breadcrumb.labels(), vec!["Home"]);
    }

    #[test]
    fn test_renders_full_trail() {
        let mut breadcrumb = Breadcrumb::new(vec![
            crumb(None, "Topology"),
            crumb(Some("spaces"), "Spaces"),
            crumb(Some("hausdorff"), "Hausdorff"),
        ]);
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal.draw(|f| breadcrumb.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();

        assert!(text.starts_with("Home > Spaces > Hausdorff"));
    }
}

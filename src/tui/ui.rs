use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{Breadcrumb, NodeView, SendHint, Sidebar, TitleBar};
use crate::tui::{Overlay, TuiState};

const SIDEBAR_WIDTH: u16 = 30;
const ANSWER_HEIGHT: u16 = 8;

/// Which send hint the leaf panel shows, derived from core state.
pub fn send_hint(app: &App) -> SendHint {
    if app.navigator.sendable_message().is_none() {
        SendHint::NoMessage
    } else if app.notifier.is_none() {
        SendHint::NotConfigured
    } else if app.is_loading {
        SendHint::Busy
    } else if app.message_sent {
        SendHint::Sent
    } else {
        SendHint::Ready
    }
}

fn footer_text(tui: &TuiState) -> &'static str {
    match tui.overlay {
        Overlay::Ask(_) => " Enter Ask  Esc Cancel",
        Overlay::Search(_) => " Type to search  Up/Down Select  Enter Go  Esc Back",
        Overlay::None => {
            " Up/Down Select  Enter Open  Left Back  h Home  s Send  a Ask  / Search  q Quit"
        }
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let error_height = if app.error.is_some() { 3 } else { 0 };
    let [title_area, crumb_area, body_area, error_area, footer_area] = Layout::vertical([
        Length(1),
        Length(1),
        Min(0),
        Length(error_height),
        Length(1),
    ])
    .areas(frame.area());

    TitleBar::new(
        app.navigator.tree().root().title.clone(),
        app.status_message.clone(),
        app.is_loading,
    )
    .with_spinner_frame(spinner_frame)
    .render(frame, title_area);

    Breadcrumb::new(app.navigator.breadcrumb()).render(frame, crumb_area);

    let [main_area, sidebar_area] =
        Layout::horizontal([Min(0), Length(SIDEBAR_WIDTH)]).areas(body_area);

    let answer_height = if app.last_answer.is_some() {
        ANSWER_HEIGHT
    } else {
        0
    };
    let [node_area, answer_area] =
        Layout::vertical([Min(0), Length(answer_height)]).areas(main_area);

    NodeView::new(&mut tui.node_view, app.navigator.current(), send_hint(app))
        .render(frame, node_area);

    if let Some(answer) = &app.last_answer {
        draw_answer(frame, answer_area, &answer.text());
    }

    Sidebar {
        stats: app.stats,
        depth: app.navigator.depth(),
        chat_enabled: app.notifier.is_some(),
        ai_enabled: app.completion.is_some(),
    }
    .render(frame, sidebar_area);

    if let Some(error) = &app.error {
        draw_error(frame, error_area, error);
    }

    frame.render_widget(
        Line::styled(footer_text(tui), Style::default().fg(Color::DarkGray)),
        footer_area,
    );

    // Overlays last so they sit on top
    let full_area = frame.area();
    match &mut tui.overlay {
        Overlay::Ask(ask) => ask.render(frame, full_area),
        Overlay::Search(search) => search.render(frame, full_area),
        Overlay::None => {}
    }
}

fn draw_answer(frame: &mut Frame, area: Rect, text: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" AI answer ")
        .padding(Padding::horizontal(1));
    frame.render_widget(
        Paragraph::new(text.to_string())
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_error(frame: &mut Frame, area: Rect, error: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error (x to dismiss) ");
    frame.render_widget(
        Paragraph::new(error.to_string())
            .style(Style::default().fg(Color::Red))
            .block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::outbound::{Answer, AskOutcome, DeliveryError};
    use crate::test_support::test_app;
    use crate::tui::components::AskBox;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_root_screen() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);

        assert!(text.contains("Canopy (Root)"));
        assert!(text.contains("Welcome to Canopy!"));
        assert!(text.contains("Home"));
        assert!(text.contains("[+] A"));
        assert!(text.contains("Statistics"));
        assert!(text.contains("s Send"));
    }

    #[test]
    fn test_leaf_screen_and_breadcrumb() {
        let mut app = test_app();
        update(&mut app, Action::Enter("a".to_string()));
        update(&mut app, Action::Enter("leaf1".to_string()));
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);

        assert!(text.contains("Home > A > Leaf"));
        assert!(text.contains("You reached a leaf"));
        assert!(text.contains("Press s to send"));
    }

    #[test]
    fn test_error_and_answer_panels() {
        let mut app = test_app();
        update(&mut app, Action::Ask("Why?".to_string()));
        update(
            &mut app,
            Action::AskFinished(Ok(AskOutcome {
                answer: Answer::new(vec!["Because trees.".to_string()]),
                forwarded: Some(Err(DeliveryError::Network("offline".to_string()))),
            })),
        );
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);

        assert!(text.contains("AI answer"));
        assert!(text.contains("Because trees."));
        assert!(text.contains("offline"));
    }

    #[test]
    fn test_ask_overlay_changes_footer() {
        let app = test_app();
        let mut tui = TuiState::new();
        tui.overlay = Overlay::Ask(AskBox::new());
        let text = screen(&app, &mut tui);
        assert!(text.contains("Ask the AI"));
        assert!(text.contains("Enter Ask  Esc Cancel"));
    }

    #[test]
    fn test_send_hint_follows_state() {
        let mut app = test_app();
        assert_eq!(send_hint(&app), SendHint::NoMessage);

        app.navigator.enter("a").unwrap();
        app.navigator.enter("leaf1").unwrap();
        assert_eq!(send_hint(&app), SendHint::Ready);

        app.message_sent = true;
        assert_eq!(send_hint(&app), SendHint::Sent);

        app.is_loading = true;
        assert_eq!(send_hint(&app), SendHint::Busy);

        app.notifier = None;
        assert_eq!(send_hint(&app), SendHint::NotConfigured);
    }
}

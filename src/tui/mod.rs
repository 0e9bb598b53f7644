//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Focus
//!
//! At most one overlay is open. While it is, every event goes to it; letter
//! keys are text there, and commands only in browse mode:
//!
//! ```text
//! Browse ──a──▶ Ask overlay    ──Enter/Esc──▶ Browse
//!        ──/──▶ Search overlay ──Enter/Esc──▶ Browse
//! ```
//!
//! ## Outbound calls
//!
//! `update()` returns `Effect::Deliver` / `Effect::Ask`; the loop spawns a
//! tokio task for it, and the task reports back as an `Action` over a std
//! mpsc channel that is drained every iteration.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner moves.
//! - **Idle**: sleeps up to 500ms, only redraws on events or background results.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::tree::Tree;
use crate::outbound::{
    ChatNotifier, CompletionProvider, OpenAiProvider, TelegramNotifier, ask_and_forward,
};
use crate::tui::component::EventHandler;
use crate::tui::components::{AskBox, AskEvent, NodeViewState, SearchEvent, SearchState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// The overlay that currently has focus, if any.
pub enum Overlay {
    None,
    Ask(AskBox),
    Search(SearchState),
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub node_view: NodeViewState,
    pub overlay: Overlay,
}

impl TuiState {
    pub fn new() -> Self {
        let mut node_view = NodeViewState::new();
        node_view.reset();
        Self {
            node_view,
            overlay: Overlay::None,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Release events are filtered in event.rs; the protocol is ignored by
        // terminals that don't support it
        execute!(
            stdout(),
            EnableBracketedPaste,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Chat delivery, when both the bot token and the chat id are configured.
pub fn build_notifier(config: &ResolvedConfig) -> Option<Arc<dyn ChatNotifier>> {
    match (&config.telegram_bot_token, &config.telegram_chat_id) {
        (Some(token), Some(chat_id)) => Some(Arc::new(TelegramNotifier::new(
            token.clone(),
            chat_id.clone(),
            config.telegram_base_url.clone(),
        ))),
        _ => {
            info!("Chat delivery disabled: Telegram credentials not configured");
            None
        }
    }
}

/// The completion service, when an API key is configured.
pub fn build_completion(config: &ResolvedConfig) -> Option<Arc<dyn CompletionProvider>> {
    let Some(api_key) = &config.openai_api_key else {
        info!("AI answers disabled: OPENAI_API_KEY not configured");
        return None;
    };
    Some(Arc::new(
        OpenAiProvider::new(api_key.clone(), config.openai_base_url.clone())
            .with_model(config.model.clone(), config.temperature)
            .with_prompt_template(config.prompt_template.clone()),
    ))
}

/// Build the core state for one session from a loaded tree and resolved config.
pub fn build_app(tree: Tree, config: &ResolvedConfig) -> App {
    let mut app = App::new(Arc::new(tree)).with_send_pause(config.send_pause);
    if let Some(notifier) = build_notifier(config) {
        app = app.with_notifier(notifier);
    }
    if let Some(completion) = build_completion(config) {
        app = app.with_completion(completion);
    }
    app
}

/// Route one terminal event: to the open overlay if there is one, otherwise
/// through the browse-mode key map. Returns the effect the loop must start.
pub(crate) fn handle_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Effect {
    // Ctrl+C quits from anywhere
    if matches!(event, TuiEvent::ForceQuit) {
        return update(app, Action::Quit);
    }

    match &mut tui.overlay {
        Overlay::Ask(ask) => match ask.handle_event(event) {
            Some(AskEvent::Submit(question)) => {
                // A rejected question stays in the box; update() sets the reason
                let effect = update(app, Action::Ask(question));
                if matches!(effect, Effect::Ask(_)) {
                    tui.overlay = Overlay::None;
                }
                effect
            }
            Some(AskEvent::Cancel) => {
                tui.overlay = Overlay::None;
                Effect::None
            }
            None => Effect::None,
        },
        Overlay::Search(search) => match search.handle_event(event) {
            Some(SearchEvent::Select(path)) => {
                tui.overlay = Overlay::None;
                navigate(app, tui, Action::JumpTo(path))
            }
            Some(SearchEvent::Dismiss) => {
                tui.overlay = Overlay::None;
                Effect::None
            }
            None => Effect::None,
        },
        Overlay::None => handle_browse_event(app, tui, event),
    }
}

fn handle_browse_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Effect {
    match event {
        TuiEvent::CursorUp => {
            tui.node_view.select_previous();
            Effect::None
        }
        TuiEvent::CursorDown => {
            tui.node_view
                .select_next(app.navigator.children().len());
            Effect::None
        }
        TuiEvent::Submit | TuiEvent::CursorRight => {
            match tui.node_view.selected_key(app.navigator.children()) {
                Some(key) => {
                    let key = key.to_string();
                    navigate(app, tui, Action::Enter(key))
                }
                None => {
                    app.status_message = "Nothing to open here".to_string();
                    Effect::None
                }
            }
        }
        TuiEvent::CursorLeft | TuiEvent::Backspace => {
            let came_from = app.navigator.path().last().cloned();
            let effect = navigate(app, tui, Action::Back);
            // Keep the cursor on the child we just left
            if let Some(key) = came_from {
                tui.node_view.select_key(app.navigator.children(), &key);
            }
            effect
        }
        TuiEvent::Home | TuiEvent::InputChar('h') => navigate(app, tui, Action::Home),
        TuiEvent::InputChar('s') => update(app, Action::SendLeaf),
        TuiEvent::InputChar('a') => {
            tui.overlay = Overlay::Ask(AskBox::new());
            Effect::None
        }
        TuiEvent::InputChar('/') => {
            tui.overlay = Overlay::Search(SearchState::new(app.navigator.shared_tree()));
            Effect::None
        }
        TuiEvent::InputChar('x') => update(app, Action::DismissError),
        TuiEvent::InputChar('q') | TuiEvent::Escape => update(app, Action::Quit),
        _ => Effect::None,
    }
}

/// Dispatch a navigation action, resetting the child selection when the path changed.
fn navigate(app: &mut App, tui: &mut TuiState, action: Action) -> Effect {
    let before = app.navigator.path().to_vec();
    let effect = update(app, action);
    if app.navigator.path() != before.as_slice() {
        tui.node_view.reset();
    }
    effect
}

pub fn run(tree: Tree, config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = build_app(tree, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'event_loop: loop {
        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = handle_event(&mut app, &mut tui, &event);
            if run_effect(&app, effect, &tx) {
                break 'event_loop;
            }
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if run_effect(&app, effect, &tx) {
                break 'event_loop;
            }
        }
    }

    info!("Canopy shutting down");
    ratatui::restore();
    Ok(())
}

/// Start whatever I/O `effect` asks for. Returns true when the loop should quit.
fn run_effect(app: &App, effect: Effect, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::Deliver(text) => {
            spawn_delivery(app, text, tx.clone());
            false
        }
        Effect::Ask(question) => {
            spawn_ask(app, question, tx.clone());
            false
        }
    }
}

fn spawn_delivery(app: &App, text: String, tx: mpsc::Sender<Action>) {
    let Some(notifier) = app.notifier.clone() else {
        warn!("Deliver effect without a notifier");
        return;
    };
    info!("Spawning delivery via {}", notifier.name());
    tokio::spawn(async move {
        let result = notifier.send_message(&text).await;
        if tx.send(Action::DeliveryFinished(result)).is_err() {
            warn!("Failed to report delivery result: receiver dropped");
        }
    });
}

fn spawn_ask(app: &App, question: String, tx: mpsc::Sender<Action>) {
    let Some(completion) = app.completion.clone() else {
        warn!("Ask effect without a completion provider");
        return;
    };
    let notifier = app.notifier.clone();
    let pause = app.send_pause;
    info!("Spawning question to {}", completion.name());
    tokio::spawn(async move {
        let result =
            ask_and_forward(&question, completion.as_ref(), notifier.as_deref(), pause).await;
        if tx.send(Action::AskFinished(result)).is_err() {
            warn!("Failed to report answer: receiver dropped");
        }
    });
}

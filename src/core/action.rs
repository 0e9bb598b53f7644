//! # Actions
//!
//! Everything that can happen in Canopy becomes an `Action`.
//! User presses Enter on a child? That's `Action::Enter(key)`.
//! The chat bot replies? That's `Action::DeliveryFinished(result)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing any I/O the adapter must start.
//! No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Navigation and outbound failures land in `status_message` / `error`.
//! They never touch the navigation path.

use log::{debug, info, warn};

use crate::core::navigator::InvalidTransition;
use crate::core::state::App;
use crate::outbound::{AskOutcome, CompletionError, DeliveryError};

#[derive(Debug)]
pub enum Action {
    /// Move into the child with this key.
    Enter(String),
    Back,
    Home,
    /// Jump straight to a full key path (search results).
    JumpTo(Vec<String>),
    /// Deliver the current leaf's message.
    SendLeaf,
    /// Ask the completion service a free-text question.
    Ask(String),
    DeliveryFinished(Result<(), DeliveryError>),
    AskFinished(Result<AskOutcome, CompletionError>),
    DismissError,
    Quit,
}

/// I/O the adapter must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Send this exact text through the chat notifier.
    Deliver(String),
    /// Ask this question and forward the answer.
    Ask(String),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Enter(key) => {
            let result = app.navigator.enter(&key);
            after_navigation(app, result);
            Effect::None
        }
        Action::Back => {
            let result = app.navigator.back();
            after_navigation(app, result);
            Effect::None
        }
        Action::Home => {
            app.navigator.reset_to_root();
            after_navigation(app, Ok(()));
            Effect::None
        }
        Action::JumpTo(path) => {
            let result = app.navigator.jump_to(&path);
            after_navigation(app, result);
            Effect::None
        }
        Action::SendLeaf => {
            if app.is_loading {
                app.status_message = "Please wait for the current request".to_string();
                return Effect::None;
            }
            if app.notifier.is_none() {
                app.status_message =
                    "Chat delivery is not configured (TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID)"
                        .to_string();
                return Effect::None;
            }
            match app.navigator.sendable_message() {
                Some(message) => {
                    let message = message.to_string();
                    app.is_loading = true;
                    app.error = None;
                    app.sending_path = Some(app.navigator.path().to_vec());
                    app.status_message = "Sending...".to_string();
                    Effect::Deliver(message)
                }
                None => {
                    app.status_message = "This node has no message to send".to_string();
                    Effect::None
                }
            }
        }
        Action::Ask(question) => {
            if app.is_loading {
                app.status_message = "Please wait for the current request".to_string();
                return Effect::None;
            }
            if question.trim().is_empty() {
                app.status_message = "Write a question before sending".to_string();
                return Effect::None;
            }
            if app.completion.is_none() {
                app.status_message = "AI is not configured (OPENAI_API_KEY)".to_string();
                return Effect::None;
            }
            app.is_loading = true;
            app.error = None;
            app.status_message = "Thinking...".to_string();
            Effect::Ask(question)
        }
        Action::DeliveryFinished(result) => {
            app.is_loading = false;
            let sent_from = app.sending_path.take();
            match result {
                Ok(()) => {
                    info!("Leaf message delivered");
                    // Only mark the leaf that was actually sent
                    if sent_from.as_deref() == Some(app.navigator.path()) {
                        app.message_sent = true;
                    }
                    app.status_message = "Message sent!".to_string();
                }
                Err(e) => {
                    warn!("Leaf delivery failed: {}", e);
                    app.status_message = "Send failed".to_string();
                    app.error = Some(format!("Delivery failed: {e}"));
                }
            }
            Effect::None
        }
        Action::AskFinished(result) => {
            app.is_loading = false;
            match result {
                Ok(outcome) => {
                    app.status_message = match &outcome.forwarded {
                        None => "Answer received".to_string(),
                        Some(Ok(())) => format!(
                            "Answer received and forwarded ({} message(s))",
                            outcome.answer.parts.len() + 1
                        ),
                        Some(Err(e)) => {
                            warn!("Forwarding answer failed: {}", e);
                            app.error = Some(format!("Forwarding failed: {e}"));
                            "Answer received, forwarding failed".to_string()
                        }
                    };
                    app.last_answer = Some(outcome.answer);
                }
                Err(e) => {
                    warn!("Completion failed: {}", e);
                    app.status_message = "AI request failed".to_string();
                    app.error = Some(format!("AI request failed: {e}"));
                }
            }
            Effect::None
        }
        Action::DismissError => {
            app.error = None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn after_navigation(app: &mut App, result: Result<(), InvalidTransition>) {
    match result {
        Ok(()) => {
            app.message_sent = false;
            app.status_message = app.navigator.current().title.clone();
        }
        Err(e) => {
            debug!("Rejected transition: {}", e);
            app.status_message = capitalize(&e.to_string());
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

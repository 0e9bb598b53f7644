//! Glue between the navigator and the outbound traits: send the current leaf,
//! send a batch, ask a question and forward the answer.
//!
//! None of these retry. A failure comes back to the caller as-is and the
//! navigation path is never touched.

use std::fmt;
use std::time::Duration;

use log::{info, warn};

use crate::core::navigator::Navigator;
use crate::outbound::{Answer, ChatNotifier, CompletionError, CompletionProvider, DeliveryError};

/// Pause between consecutive messages of a batch, to stay under chat rate limits.
pub const DEFAULT_SEND_PAUSE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub enum SendError {
    /// The current node is not a leaf with a message.
    NotSendable,
    Delivery(DeliveryError),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::NotSendable => write!(f, "this node has no message to send"),
            SendError::Delivery(e) => write!(f, "delivery failed: {e}"),
        }
    }
}

impl std::error::Error for SendError {}

impl From<DeliveryError> for SendError {
    fn from(e: DeliveryError) -> Self {
        SendError::Delivery(e)
    }
}

/// Delivers the current leaf's message, exactly as written in the map.
pub async fn send_leaf(nav: &Navigator, notifier: &dyn ChatNotifier) -> Result<(), SendError> {
    let message = nav.sendable_message().ok_or(SendError::NotSendable)?;
    info!("Sending leaf message via {}", notifier.name());
    notifier.send_message(message).await?;
    Ok(())
}

/// Sends `messages` in order, pausing between them. Keeps going after a
/// failure; a single-message batch reports its own error directly.
pub async fn send_all(
    notifier: &dyn ChatNotifier,
    messages: &[String],
    pause: Duration,
) -> Result<(), DeliveryError> {
    let mut failed = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        if i > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        if let Err(e) = notifier.send_message(message).await {
            warn!("Message {}/{} failed: {}", i + 1, messages.len(), e);
            if messages.len() == 1 {
                return Err(e);
            }
            failed.push((i + 1, e.to_string()));
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(DeliveryError::Partial {
            failed,
            total: messages.len(),
        })
    }
}

/// A successful answer, plus how forwarding it went (`None` = no notifier configured).
#[derive(Debug, Clone, PartialEq)]
pub struct AskOutcome {
    pub answer: Answer,
    pub forwarded: Option<Result<(), DeliveryError>>,
}

pub async fn ask_and_forward(
    question: &str,
    completion: &dyn CompletionProvider,
    notifier: Option<&dyn ChatNotifier>,
    pause: Duration,
) -> Result<AskOutcome, CompletionError> {
    info!("Asking {}", completion.name());
    let answer = completion.ask(question).await?;

    let forwarded = match notifier {
        Some(notifier) => {
            let messages = answer.forward_messages(question);
            Some(send_all(notifier, &messages, pause).await)
        }
        None => None,
    };

    Ok(AskOutcome { answer, forwarded })
}

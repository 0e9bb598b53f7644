use std::fmt;

use async_trait::async_trait;

use super::types::Answer;

/// Errors from delivering text to the chat bot.
/// Never retried automatically; the user may retry by hand.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryError {
    /// Notifier misconfigured (missing token or chat id).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The chat API rejected the message.
    Api { status: u16, message: String },
    /// Some messages of a batch failed. Indices are 1-based.
    Partial {
        failed: Vec<(usize, String)>,
        total: usize,
    },
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Config(msg) => write!(f, "config error: {msg}"),
            DeliveryError::Network(msg) => write!(f, "network error: {msg}"),
            DeliveryError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            DeliveryError::Partial { failed, total } => {
                write!(f, "{} of {} messages failed", failed.len(), total)?;
                for (index, reason) in failed {
                    write!(f, "; msg {index}: {reason}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Errors from the completion service.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// Provider misconfigured (missing API key, bad URL).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned an error response (auth, quota, bad request).
    Api { status: u16, message: String },
    /// The reply could not be turned into an answer.
    Parse(String),
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Config(msg) => write!(f, "config error: {msg}"),
            CompletionError::Network(msg) => write!(f, "network error: {msg}"),
            CompletionError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            CompletionError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for CompletionError {}

#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Returns the name of the notifier.
    fn name(&self) -> &str;

    /// Delivers `text` verbatim to the configured destination.
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError>;
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Wraps `question` in the instruction template and returns the model's answer.
    async fn ask(&self, question: &str) -> Result<Answer, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_display_lists_failures() {
        let err = DeliveryError::Partial {
            failed: vec![(2, "network error: reset".to_string())],
            total: 3,
        };
        assert_eq!(
            err.to_string(),
            "1 of 3 messages failed; msg 2: network error: reset"
        );
    }

    #[test]
    fn test_api_display() {
        let err = CompletionError::Api {
            status: 429,
            message: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 429): quota");
    }
}

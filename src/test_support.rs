//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::state::App;
use crate::core::tree::load;
use crate::outbound::{Answer, ChatNotifier, CompletionError, CompletionProvider, DeliveryError};

/// Root with one category `a` holding one leaf `leaf1`.
pub const SAMPLE_MAP: &str = r#"{
    "title": "Root",
    "description": "Start here",
    "children": {
        "a": {
            "title": "A",
            "children": {
                "leaf1": { "title": "Leaf", "message": "hi" }
            }
        }
    }
}"#;

/// Records every delivered message. Can be told to fail on given calls.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    calls: Mutex<usize>,
    fail_on: Vec<usize>,
    fail_all: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every call with a network error.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Fails the given 1-based calls, delivers the rest.
    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_on: calls.to_vec(),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatNotifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail_all || self.fail_on.contains(&call) {
            return Err(DeliveryError::Network("connection reset".to_string()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Returns a fixed answer, or a fixed API error.
pub struct CannedCompletion {
    reply: Result<Answer, CompletionError>,
}

impl CannedCompletion {
    pub fn answering(parts: &[&str]) -> Self {
        Self {
            reply: Ok(Answer::new(parts.iter().map(|p| p.to_string()).collect())),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(CompletionError::Api {
                status: 429,
                message: "quota exceeded".to_string(),
            }),
        }
    }
}

#[async_trait]
impl CompletionProvider for CannedCompletion {
    fn name(&self) -> &str {
        "canned"
    }

    async fn ask(&self, _question: &str) -> Result<Answer, CompletionError> {
        self.reply.clone()
    }
}

/// Creates a test App over `SAMPLE_MAP` with both collaborators wired to fakes.
pub fn test_app() -> App {
    let tree = Arc::new(load(SAMPLE_MAP).unwrap());
    App::new(tree)
        .with_notifier(Arc::new(RecordingNotifier::new()))
        .with_completion(Arc::new(CannedCompletion::answering(&["ok"])))
}

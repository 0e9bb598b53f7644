//! # Application State
//!
//! Core business state for one session. No terminal types here;
//! presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── navigator: Navigator                          // path into the shared Arc<Tree>
//! ├── stats: TreeStatistics                         // computed once, tree never changes
//! ├── notifier: Option<Arc<dyn ChatNotifier>>       // None = delivery not configured
//! ├── completion: Option<Arc<dyn CompletionProvider>>
//! ├── status_message: String                        // status bar text
//! ├── error: Option<String>                         // last outbound failure
//! ├── is_loading: bool                              // an outbound call is in flight
//! ├── message_sent: bool                            // current leaf was delivered
//! ├── sending_path: Option<Vec<String>>             // leaf of the delivery in flight
//! ├── last_answer: Option<Answer>                   // most recent AI answer
//! └── send_pause: Duration                          // gap between batched messages
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Duration;

use crate::core::navigator::Navigator;
use crate::core::stats::{TreeStatistics, compute_statistics};
use crate::core::tree::Tree;
use crate::outbound::relay::DEFAULT_SEND_PAUSE;
use crate::outbound::{Answer, ChatNotifier, CompletionProvider};

pub struct App {
    pub navigator: Navigator,
    pub stats: TreeStatistics,
    pub notifier: Option<Arc<dyn ChatNotifier>>,
    pub completion: Option<Arc<dyn CompletionProvider>>,
    pub status_message: String,
    pub error: Option<String>,
    pub is_loading: bool,
    pub message_sent: bool,
    /// Path of the leaf whose delivery is in flight. Navigation may move on meanwhile.
    pub sending_path: Option<Vec<String>>,
    pub last_answer: Option<Answer>,
    pub send_pause: Duration,
}

impl App {
    pub fn new(tree: Arc<Tree>) -> Self {
        let stats = compute_statistics(&tree);
        Self {
            navigator: Navigator::new(tree),
            stats,
            notifier: None,
            completion: None,
            status_message: String::from("Welcome to Canopy!"),
            error: None,
            is_loading: false,
            message_sent: false,
            sending_path: None,
            last_answer: None,
            send_pause: DEFAULT_SEND_PAUSE,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn ChatNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_completion(mut self, completion: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn with_send_pause(mut self, pause: Duration) -> Self {
        self.send_pause = pause;
        self
    }

    /// True when the current node is a leaf with a message and a notifier exists.
    pub fn can_send(&self) -> bool {
        self.notifier.is_some() && self.navigator.sendable_message().is_some()
    }
}

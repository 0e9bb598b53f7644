//! # Outbound Boundary
//!
//! The two network collaborators the core talks to, behind narrow traits:
//!
//! - [`ChatNotifier`]: delivers plain text to a chat bot (Telegram).
//! - [`CompletionProvider`]: turns a question into an [`Answer`] (OpenAI).
//!
//! Tree and navigation logic never see HTTP. Tests swap in fakes.

pub mod provider;
pub mod providers;
pub mod relay;
pub mod types;

pub use provider::{ChatNotifier, CompletionError, CompletionProvider, DeliveryError};
pub use providers::{OpenAiProvider, TelegramNotifier};
pub use relay::{AskOutcome, SendError, ask_and_forward, send_all, send_leaf};
pub use types::{Answer, DEFAULT_PROMPT_TEMPLATE, build_prompt};

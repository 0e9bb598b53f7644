//! Canopy: browse a JSON concept map in the terminal, send leaf messages to a
//! chat bot, and ask an AI questions whose answers are forwarded to the same chat.

pub mod core;
pub mod outbound;
pub mod tui;

#[cfg(test)]
pub mod test_support;

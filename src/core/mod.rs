//! # Core Application Logic
//!
//! This module contains Canopy's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Tree (loaded map)    │
//!                    │  • Navigator (path)     │
//!                    │  • State + Action       │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No network. No UI.     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  Outbound  │
//!     │  Adapter   │                          │ (telegram, │
//!     │ (ratatui)  │                          │   openai)  │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tree`]: Loading and validating the concept map
//! - [`navigator`]: The per-session path through the tree
//! - [`stats`]: Category/leaf counts
//! - [`search`]: Leaf title search
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: The `Action` enum, everything that can happen in the app
//! - [`config`]: Layered settings

pub mod action;
pub mod config;
pub mod navigator;
pub mod search;
pub mod state;
pub mod stats;
pub mod tree;

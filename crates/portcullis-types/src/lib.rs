//! Portcullis Types - Shared domain types
//!
//! This crate contains domain types used across Portcullis crates:
//! - Subject identity and claims
//! - Session resolution status
//! - Cross-tab authentication events

pub mod event;
pub mod session;
pub mod subject;

pub use event::*;
pub use session::*;
pub use subject::*;

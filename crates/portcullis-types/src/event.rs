//! Cross-tab authentication events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one execution context (browser tab) of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub Uuid);

impl TabId {
    /// Create a new random tab ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened in the originating tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
}

/// Message carried on the cross-tab auth channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub origin_tab_id: TabId,
    pub timestamp: DateTime<Utc>,
}

impl AuthEvent {
    /// Build an event originating from `tab` at `timestamp`
    pub fn new(kind: AuthEventKind, tab: TabId, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            origin_tab_id: tab,
            timestamp,
        }
    }

    /// Sign-out event stamped with the current time
    pub fn signed_out(tab: TabId) -> Self {
        Self::new(AuthEventKind::SignedOut, tab, Utc::now())
    }

    /// Sign-in event stamped with the current time
    pub fn signed_in(tab: TabId) -> Self {
        Self::new(AuthEventKind::SignedIn, tab, Utc::now())
    }

    /// Whether this event was published by `tab`
    pub fn is_from(&self, tab: TabId) -> bool {
        self.origin_tab_id == tab
    }
}

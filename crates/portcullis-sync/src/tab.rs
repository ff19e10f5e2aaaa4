//! Per-tab sign-in state and event handling
//!
//! Events from other tabs only ever change local state and ask for a status
//! refetch; they are never re-broadcast. A tab's own sign-in or sign-out is
//! published once and applied to its own state directly.

use portcullis_types::{AuthEvent, AuthEventKind, SessionStatus, SubjectId, TabId};
use std::sync::Arc;

use crate::channel::{AuthChannel, AuthSubscription};

/// What the tab believes about its session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TabState {
    /// Not fetched yet, or another tab signed in
    #[default]
    Unknown,
    SignedIn(SubjectId),
    SignedOut,
}

/// What the application should do after an event was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SyncAction {
    /// Event came from this tab
    Ignored,
    /// Nothing changed
    NoOp,
    /// Cached auth UI state was invalidated; fetch session status again
    Refetch,
}

/// Cross-tab sync for one tab
pub struct TabSync {
    tab_id: TabId,
    state: TabState,
    channel: Option<Arc<dyn AuthChannel>>,
    subscription: Option<AuthSubscription>,
}

impl TabSync {
    /// New unmounted tab with a fresh id
    pub fn new() -> Self {
        Self::with_tab_id(TabId::new())
    }

    pub fn with_tab_id(tab_id: TabId) -> Self {
        Self {
            tab_id,
            state: TabState::Unknown,
            channel: None,
            subscription: None,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn state(&self) -> &TabState {
        &self.state
    }

    /// Whether events are being exchanged with other tabs
    pub fn is_synced(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|subscription| !subscription.is_closed())
    }

    /// Join `channel`. Without one the tab runs unsynced.
    pub fn mount(&mut self, channel: Option<Arc<dyn AuthChannel>>) {
        match channel {
            Some(channel) => {
                tracing::debug!(tab = %self.tab_id, channel = channel.name(), "Tab joined auth channel");
                self.subscription = Some(channel.subscribe());
                self.channel = Some(channel);
            }
            None => {
                tracing::info!(tab = %self.tab_id, "No auth channel; cross-tab sync disabled");
                self.subscription = None;
                self.channel = None;
            }
        }
    }

    /// Leave the channel
    pub fn unmount(&mut self) {
        self.subscription = None;
        self.channel = None;
    }

    /// Record the result of a session status fetch
    pub fn observe(&mut self, status: &SessionStatus) {
        self.state = match status {
            SessionStatus::Authenticated(subject) => TabState::SignedIn(subject.clone()),
            SessionStatus::Anonymous | SessionStatus::Invalid(_) => TabState::SignedOut,
        };
    }

    /// Apply one event received from the channel
    pub fn apply(&mut self, event: &AuthEvent) -> SyncAction {
        if event.is_from(self.tab_id) {
            return SyncAction::Ignored;
        }

        let action = match (event.kind, &self.state) {
            (AuthEventKind::SignedOut, TabState::SignedOut) => SyncAction::NoOp,
            (AuthEventKind::SignedOut, _) => {
                self.state = TabState::SignedOut;
                SyncAction::Refetch
            }
            (AuthEventKind::SignedIn, TabState::SignedIn(_)) => SyncAction::NoOp,
            (AuthEventKind::SignedIn, _) => {
                self.state = TabState::Unknown;
                SyncAction::Refetch
            }
        };

        tracing::debug!(
            tab = %self.tab_id,
            origin = %event.origin_tab_id,
            kind = ?event.kind,
            ?action,
            "Applied auth event from another tab"
        );
        action
    }

    /// This tab finished signing out: update state and tell the other tabs once
    pub fn sign_out_completed(&mut self) {
        self.state = TabState::SignedOut;
        self.broadcast(AuthEvent::signed_out(self.tab_id));
    }

    /// This tab finished signing in as `subject`
    pub fn sign_in_completed(&mut self, subject: SubjectId) {
        self.state = TabState::SignedIn(subject);
        self.broadcast(AuthEvent::signed_in(self.tab_id));
    }

    /// Apply every pending event. `Refetch` if any of them asked for one.
    pub fn drain(&mut self) -> SyncAction {
        let mut result = SyncAction::NoOp;
        while let Some(event) = self.subscription.as_mut().and_then(AuthSubscription::try_next) {
            result = result.max(self.apply(&event));
        }
        result
    }

    /// Wait for the next event and apply it. `None` when unsynced.
    pub async fn next_action(&mut self) -> Option<SyncAction> {
        let event = self.subscription.as_mut()?.next().await?;
        Some(self.apply(&event))
    }

    fn broadcast(&self, event: AuthEvent) {
        if let Some(channel) = &self.channel {
            channel.publish(&event);
        }
    }
}

impl Default for TabSync {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TabSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabSync")
            .field("tab_id", &self.tab_id)
            .field("state", &self.state)
            .field("synced", &self.is_synced())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portcullis_types::InvalidReason;

    fn signed_in_tab() -> TabSync {
        let mut tab = TabSync::new();
        tab.observe(&SessionStatus::Authenticated(SubjectId::new("user-1")));
        tab
    }

    #[test]
    fn test_own_events_are_ignored() {
        let mut tab = signed_in_tab();
        let own = AuthEvent::signed_out(tab.tab_id());

        assert_eq!(tab.apply(&own), SyncAction::Ignored);
        assert_eq!(tab.state(), &TabState::SignedIn(SubjectId::new("user-1")));
    }

    #[test]
    fn test_external_sign_out_invalidates() {
        let mut tab = signed_in_tab();
        let event = AuthEvent::signed_out(TabId::new());

        assert_eq!(tab.apply(&event), SyncAction::Refetch);
        assert_eq!(tab.state(), &TabState::SignedOut);
        // Idempotent
        assert_eq!(tab.apply(&event), SyncAction::NoOp);
        assert_eq!(tab.apply(&AuthEvent::signed_out(TabId::new())), SyncAction::NoOp);
    }

    #[test]
    fn test_unknown_state_refetches_on_sign_out() {
        let mut tab = TabSync::new();
        assert_eq!(tab.state(), &TabState::Unknown);
        assert_eq!(
            tab.apply(&AuthEvent::signed_out(TabId::new())),
            SyncAction::Refetch
        );
    }

    #[test]
    fn test_external_sign_in() {
        let mut tab = TabSync::new();
        tab.observe(&SessionStatus::Invalid(InvalidReason::Expired));
        assert_eq!(tab.state(), &TabState::SignedOut);

        assert_eq!(
            tab.apply(&AuthEvent::signed_in(TabId::new())),
            SyncAction::Refetch
        );
        assert_eq!(tab.state(), &TabState::Unknown);

        let mut tab = signed_in_tab();
        assert_eq!(
            tab.apply(&AuthEvent::signed_in(TabId::new())),
            SyncAction::NoOp
        );
    }

    #[test]
    fn test_unmounted_tab_is_a_noop() {
        let mut tab = signed_in_tab();
        tab.mount(None);
        assert!(!tab.is_synced());

        tab.sign_out_completed();
        assert_eq!(tab.state(), &TabState::SignedOut);
        assert_eq!(tab.drain(), SyncAction::NoOp);
    }

    #[test]
    fn test_action_ordering() {
        assert!(SyncAction::Refetch > SyncAction::NoOp);
        assert!(SyncAction::NoOp > SyncAction::Ignored);
    }
}

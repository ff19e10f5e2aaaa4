//! Broadcast channel for cross-tab auth events

use portcullis_types::AuthEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Name of the channel every tab of a client joins
pub const AUTH_CHANNEL_NAME: &str = "portcullis-auth";

const DEFAULT_CAPACITY: usize = 64;

/// Publish/subscribe capability shared by the tabs of one client.
///
/// Delivery is best effort: an event published with no subscribers is
/// dropped.
pub trait AuthChannel: Send + Sync {
    /// Channel name
    fn name(&self) -> &str;

    /// Send `event` to every current subscriber, returning how many there were
    fn publish(&self, event: &AuthEvent) -> usize;

    /// Start receiving events published from now on
    fn subscribe(&self) -> AuthSubscription;
}

/// Receiving end of an [`AuthChannel`]
#[derive(Debug)]
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
    closed: bool,
}

impl AuthSubscription {
    pub fn new(receiver: broadcast::Receiver<AuthEvent>) -> Self {
        Self {
            receiver,
            closed: false,
        }
    }

    /// Next pending event without waiting. Lagged events are skipped.
    pub fn try_next(&mut self) -> Option<AuthEvent> {
        if self.closed {
            return None;
        }
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Auth event subscriber lagged; skipping missed events");
                }
                Err(TryRecvError::Closed) => {
                    tracing::debug!("Auth channel closed");
                    self.closed = true;
                    return None;
                }
            }
        }
    }

    /// Wait for the next event. `None` once the channel is closed.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        if self.closed {
            return None;
        }
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Auth event subscriber lagged; skipping missed events");
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Auth channel closed");
                    self.closed = true;
                    return None;
                }
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// In-process [`AuthChannel`] on a tokio broadcast channel
#[derive(Clone)]
pub struct LocalAuthChannel {
    name: Arc<str>,
    sender: broadcast::Sender<AuthEvent>,
}

impl LocalAuthChannel {
    /// The standard `portcullis-auth` channel
    pub fn new() -> Self {
        Self::with_capacity(AUTH_CHANNEL_NAME, DEFAULT_CAPACITY)
    }

    /// A named channel buffering up to `capacity` events per subscriber
    pub fn with_capacity(name: &str, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            name: Arc::from(name),
            sender,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LocalAuthChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthChannel for LocalAuthChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn publish(&self, event: &AuthEvent) -> usize {
        let delivered = self.sender.send(event.clone()).unwrap_or(0);
        tracing::debug!(
            channel = %self.name,
            kind = ?event.kind,
            origin = %event.origin_tab_id,
            delivered,
            "Auth event published"
        );
        delivered
    }

    fn subscribe(&self) -> AuthSubscription {
        AuthSubscription::new(self.sender.subscribe())
    }
}

impl std::fmt::Debug for LocalAuthChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAuthChannel")
            .field("name", &self.name)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

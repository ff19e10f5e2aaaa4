//! Portcullis Cross-Tab Sync
//!
//! Keeps the tabs of one client consistent about sign-in state. Each tab owns
//! a [`TabSync`]; tabs exchange [`AuthEvent`](portcullis_types::AuthEvent)s
//! over an [`AuthChannel`]. Without a channel every tab still works, it just
//! learns about other tabs' sign-outs on its next fetch.

pub mod channel;
pub mod tab;

pub use channel::{AuthChannel, AuthSubscription, LocalAuthChannel, AUTH_CHANNEL_NAME};
pub use tab::{SyncAction, TabState, TabSync};

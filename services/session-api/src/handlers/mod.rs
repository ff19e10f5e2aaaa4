//! HTTP handlers

mod health;
mod me;
mod session;

pub use health::{health, ready};
pub use me::{account, me};
pub use session::{issue_session, revoke_session};

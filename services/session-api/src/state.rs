//! Application state

use std::sync::Arc;

use portcullis_auth_core::{AuthService, IdentityProvider, JwksIdentityProvider};

use crate::config::Config;

/// Application state shared across handlers
pub struct AppState<P = JwksIdentityProvider> {
    /// Session issuance, revocation and the guard
    pub auth: Arc<AuthService<P>>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl<P: IdentityProvider> AppState<P> {
    /// Create new application state
    pub fn new(auth: AuthService<P>, config: Config) -> Self {
        Self {
            auth: Arc::new(auth),
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            config: Arc::clone(&self.config),
        }
    }
}

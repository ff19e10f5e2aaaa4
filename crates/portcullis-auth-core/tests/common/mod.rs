//! Common test utilities for portcullis-auth-core integration tests

pub mod fake_provider;
pub mod jwks_mock;

#[allow(unused_imports)]
pub use fake_provider::FakeIdentityProvider;
#[allow(unused_imports)]
pub use jwks_mock::{JwksMockServer, TestIdTokenClaims, TestKeyPair, TEST_AUDIENCE};

#[allow(dead_code)]
pub const TEST_SECRET: &str = "portcullis-test-secret-0123456789abcdef";

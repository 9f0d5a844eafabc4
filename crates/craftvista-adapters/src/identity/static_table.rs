//! Fixed credential table for demos and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use craftvista_core::{
    application::{AuthError, Credential, IdentityProvider},
    domain::{Principal, Role},
};
use tracing::debug;

/// Credential accepted by [`StaticIdentityProvider::demo`].
pub const DEMO_CREDENTIAL: &str = "demo";

/// Maps literal credentials to principals.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    accounts: HashMap<String, Principal>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// One artisan account reachable with [`DEMO_CREDENTIAL`].
    pub fn demo() -> Self {
        Self::new().with_account(DEMO_CREDENTIAL, demo_artisan())
    }

    pub fn with_account(mut self, credential: impl Into<String>, principal: Principal) -> Self {
        self.accounts.insert(credential.into(), principal);
        self
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn exchange_credential(&self, credential: &Credential) -> Result<Principal, AuthError> {
        let principal = self
            .accounts
            .get(credential.expose())
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        debug!(principal = %principal.id, "Static credential accepted");
        Ok(principal)
    }
}

/// The demo seller account.
pub fn demo_artisan() -> Principal {
    Principal::new(
        "artisan-demo",
        "artisan@craftvista.com",
        "Sample Artisan",
        Role::Artisan,
    )
    .with_avatar("https://images.unsplash.com/photo-1611574557783-9a50bb34e9f5")
}

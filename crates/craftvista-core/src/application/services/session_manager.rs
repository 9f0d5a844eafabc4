//! Session Manager - who is signed in.
//!
//! The session lives in a `tokio::sync::watch` channel. Every sign-in and
//! sign-out bumps an epoch under the channel's write lock, so concurrent
//! session changes are serialised and in-flight work can notice that the
//! session it started under is gone.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        error::AuthError,
        ports::{Credential, IdentityProvider},
    },
    domain::{DomainValidator as validator, Principal, Role},
    error::CraftResult,
};

/// A point-in-time view of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    principal: Option<Principal>,
    epoch: u64,
}

impl SessionState {
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.principal.is_some()
    }

    /// Incremented by every sign-in and sign-out.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Holds at most one signed-in principal.
pub struct SessionManager {
    identity: Arc<dyn IdentityProvider>,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { identity, state }
    }

    /// Exchange `credential` for a principal and make it current.
    ///
    /// A sign-out (or another sign-in) that lands while the exchange is
    /// pending wins; this call then fails with `AuthError::Superseded` and
    /// the session is left as the other call set it.
    #[instrument(skip_all)]
    pub async fn sign_in(&self, credential: &Credential) -> CraftResult<Principal> {
        if credential.is_blank() {
            return Err(ApplicationError::Auth(AuthError::InvalidCredentials).into());
        }

        let started_at = self.state.borrow().epoch;
        debug!(epoch = started_at, "Exchanging credential");

        let principal = self
            .identity
            .exchange_credential(credential)
            .await
            .map_err(ApplicationError::Auth)?;

        validator::validate_principal(&principal).map_err(|e| {
            ApplicationError::Auth(AuthError::InvalidPrincipal(e.to_string()))
        })?;

        let applied = self.state.send_if_modified(|state| {
            if state.epoch != started_at {
                return false;
            }
            state.epoch += 1;
            state.principal = Some(principal.clone());
            true
        });

        if !applied {
            warn!("Sign-in superseded by a concurrent session change");
            return Err(ApplicationError::Auth(AuthError::Superseded).into());
        }

        info!(principal = %principal.id, role = %principal.role, "Signed in");
        Ok(principal)
    }

    /// Clear the session. Idempotent.
    ///
    /// Always advances the epoch, which cancels a pending sign-in and any
    /// in-flight workflow call bound to the previous session.
    #[instrument(skip_all)]
    pub fn sign_out(&self) {
        let had_principal = self.state.send_if_modified(|state| {
            state.epoch += 1;
            state.principal.take().is_some()
        });
        if had_principal {
            info!("Signed out");
        } else {
            debug!("Sign-out with no active session");
        }
    }

    pub fn current_principal(&self) -> Option<Principal> {
        self.state.borrow().principal.clone()
    }

    /// The principal together with the epoch it was observed at.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn require_authenticated(&self) -> CraftResult<Principal> {
        self.current_principal()
            .ok_or_else(|| ApplicationError::Unauthenticated.into())
    }

    pub fn require_role(&self, role: Role) -> CraftResult<Principal> {
        let principal = self.require_authenticated()?;
        if !principal.has_role(role) {
            return Err(ApplicationError::Forbidden {
                required: role,
                actual: principal.role,
            }
            .into());
        }
        Ok(principal)
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::application::ports::MockIdentityProvider;
    use crate::error::CraftError;

    fn artisan() -> Principal {
        Principal::new("g-123", "artisan@craftvista.com", "Sample Artisan", Role::Artisan)
    }

    fn manager_returning(principal: Principal) -> SessionManager {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_exchange_credential()
            .returning(move |_| Ok(principal.clone()));
        SessionManager::new(Arc::new(identity))
    }

    #[tokio::test]
    async fn sign_in_then_out() {
        let session = manager_returning(artisan());
        assert!(session.current_principal().is_none());

        let principal = session.sign_in(&Credential::new("token")).await.unwrap();
        assert_eq!(principal.email, "artisan@craftvista.com");
        assert_eq!(session.require_role(Role::Artisan).unwrap(), principal);

        session.sign_out();
        assert!(session.current_principal().is_none());
        assert!(matches!(
            session.require_authenticated(),
            Err(CraftError::Application(ApplicationError::Unauthenticated))
        ));

        // Idempotent.
        session.sign_out();
        assert!(session.current_principal().is_none());
    }

    #[tokio::test]
    async fn rejected_credential_leaves_session_empty() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_exchange_credential()
            .returning(|_| Err(AuthError::InvalidCredentials));
        let session = SessionManager::new(Arc::new(identity));

        let err = session.sign_in(&Credential::new("bad")).await.unwrap_err();
        assert!(matches!(
            err,
            CraftError::Application(ApplicationError::Auth(AuthError::InvalidCredentials))
        ));
        assert!(session.current_principal().is_none());
    }

    #[tokio::test]
    async fn blank_credential_never_reaches_the_provider() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_exchange_credential().never();
        let session = SessionManager::new(Arc::new(identity));

        assert!(session.sign_in(&Credential::new("  ")).await.is_err());
    }

    #[tokio::test]
    async fn principal_without_email_is_refused() {
        let session = manager_returning(Principal::new("x", "", "Nobody", Role::Artisan));
        let err = session.sign_in(&Credential::new("token")).await.unwrap_err();
        assert!(matches!(
            err,
            CraftError::Application(ApplicationError::Auth(AuthError::InvalidPrincipal(_)))
        ));
    }

    #[tokio::test]
    async fn buyer_is_forbidden_from_artisan_role() {
        let buyer = Principal::new("b-1", "buyer@craftvista.com", "Buyer", Role::Buyer);
        let session = manager_returning(buyer);
        session.sign_in(&Credential::new("token")).await.unwrap();

        assert!(matches!(
            session.require_role(Role::Artisan),
            Err(CraftError::Application(ApplicationError::Forbidden {
                required: Role::Artisan,
                actual: Role::Buyer
            }))
        ));
    }

    #[tokio::test]
    async fn subscribers_see_sign_out() {
        let session = manager_returning(artisan());
        session.sign_in(&Credential::new("token")).await.unwrap();

        let mut rx = session.subscribe();
        let before = rx.borrow().epoch();
        session.sign_out();

        rx.changed().await.unwrap();
        assert!(!rx.borrow().is_signed_in());
        assert!(rx.borrow().epoch() > before);
    }

    #[tokio::test(start_paused = true)]
    async fn sign_out_during_exchange_wins() {
        struct SlowIdentity;

        #[async_trait::async_trait]
        impl IdentityProvider for SlowIdentity {
            async fn exchange_credential(
                &self,
                _credential: &Credential,
            ) -> Result<Principal, AuthError> {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Ok(artisan())
            }
        }

        let session = SessionManager::new(Arc::new(SlowIdentity));
        let credential = Credential::new("token");

        let (result, ()) = tokio::join!(session.sign_in(&credential), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            session.sign_out();
        });

        assert!(matches!(
            result,
            Err(CraftError::Application(ApplicationError::Auth(AuthError::Superseded)))
        ));
        assert!(session.current_principal().is_none());
    }
}

//! Google ID token verification via the tokeninfo endpoint.

use async_trait::async_trait;
use craftvista_core::{
    application::{AuthError, Credential, IdentityProvider},
    domain::{Principal, Role},
};
use serde::Deserialize;
use tracing::{debug, warn};

pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Verifies Google ID tokens and maps the claims to a principal.
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    tokeninfo_url: String,
    /// Expected `aud` claim (the OAuth client id), if enforced.
    audience: Option<String>,
    role: Role,
}

/// Claims returned by tokeninfo. Google encodes booleans as strings.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    aud: Option<String>,
}

impl GoogleIdentityProvider {
    pub fn new(tokeninfo_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("craftvista/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            tokeninfo_url: tokeninfo_url.into(),
            audience: None,
            role: Role::Artisan,
        })
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Role assigned to every principal this provider signs in.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    fn principal_from(&self, info: TokenInfo) -> Result<Principal, AuthError> {
        if let Some(expected) = &self.audience {
            if info.aud.as_deref() != Some(expected.as_str()) {
                return Err(AuthError::Rejected("token issued for another client".into()));
            }
        }
        if info.email_verified.as_deref() == Some("false") {
            return Err(AuthError::Rejected("email address is not verified".into()));
        }
        let email = info
            .email
            .ok_or_else(|| AuthError::InvalidPrincipal("token carries no email".into()))?;
        let display_name = info.name.unwrap_or_else(|| email.clone());

        let principal = Principal::new(info.sub, email, display_name, self.role);
        Ok(match info.picture {
            Some(picture) => principal.with_avatar(picture),
            None => principal,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn exchange_credential(&self, credential: &Credential) -> Result<Principal, AuthError> {
        debug!(url = %self.tokeninfo_url, "Verifying ID token");
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", credential.expose())])
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        match response.status().as_u16() {
            200..=299 => {}
            400 | 401 => return Err(AuthError::InvalidCredentials),
            status => {
                warn!(status, "tokeninfo request failed");
                return Err(AuthError::Unavailable(format!("tokeninfo returned HTTP {status}")));
            }
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidPrincipal(e.to_string()))?;
        self.principal_from(info)
    }
}

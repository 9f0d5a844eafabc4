//! The authenticated principal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, value_objects::Role};

/// Stable identifier assigned by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity signed in to the current session.
///
/// Created by the identity collaborator on a successful credential exchange
/// and held by the session manager until sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: PrincipalId,
    pub email: String,
    pub display_name: String,
    pub avatar_ref: Option<String>,
    pub role: Role,
}

impl Principal {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: PrincipalId::new(id),
            email: email.into(),
            display_name: display_name.into(),
            avatar_ref: None,
            role,
        }
    }

    pub fn with_avatar(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = Some(avatar_ref.into());
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Check the fields an identity collaborator must always populate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::validation("principal id", "must not be empty"));
        }
        if !self.email.contains('@') {
            return Err(DomainError::validation(
                "email",
                format!("'{}' is not an email address", self.email),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_validation() {
        let ok = Principal::new("u-1", "a@b.in", "Asha", Role::Artisan);
        assert!(ok.validate().is_ok());

        let no_id = Principal::new(" ", "a@b.in", "Asha", Role::Artisan);
        assert!(no_id.validate().is_err());

        let bad_email = Principal::new("u-1", "asha", "Asha", Role::Artisan);
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn avatar_is_optional() {
        let p = Principal::new("u-1", "a@b.in", "Asha", Role::Buyer);
        assert!(p.avatar_ref.is_none());
        assert_eq!(
            p.with_avatar("https://img/1").avatar_ref.as_deref(),
            Some("https://img/1")
        );
    }
}

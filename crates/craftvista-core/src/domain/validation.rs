use crate::domain::{
    entities::{DraftInput, GeneratedContent, Principal},
    error::DomainError,
    value_objects::Role,
};

/// Checks the services run before trusting input from outside the domain.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_input(input: &DraftInput) -> Result<(), DomainError> {
        input.validate()
    }

    /// Content handed back by a generator must already be publishable.
    pub fn validate_generated(content: &GeneratedContent) -> Result<(), DomainError> {
        content.validate()
    }

    pub fn validate_principal(principal: &Principal) -> Result<(), DomainError> {
        principal.validate()
    }

    /// Whether `principal` may author listings under the given policy.
    pub fn may_author(principal: &Principal, require_artisan: bool) -> bool {
        !require_artisan || principal.has_role(Role::Artisan)
    }
}

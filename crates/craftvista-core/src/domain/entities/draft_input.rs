//! Seller-supplied seed data for a draft.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, value_objects::Category};

/// Opaque reference to an uploaded voice note.
///
/// The core never dereferences it; it is passed through to collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceNoteRef(String);

impl VoiceNoteRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the seller typed in step 1.
///
/// Fields are public because the seller edits them freely while collecting;
/// [`DraftInput::normalized`] is the gate applied before generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftInput {
    pub category: Category,
    pub description: String,
    pub materials: Vec<String>,
    pub voice_note_ref: Option<VoiceNoteRef>,
}

impl DraftInput {
    pub fn new(category: Category, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
            materials: Vec::new(),
            voice_note_ref: None,
        }
    }

    /// Build from raw shell strings, parsing the category.
    pub fn parse(
        category: &str,
        description: impl Into<String>,
        materials: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, DomainError> {
        let category = Category::from_str(category)?;
        Ok(Self::new(category, description).with_materials(materials))
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.materials.push(material.into());
        self
    }

    pub fn with_materials(mut self, materials: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.materials.extend(materials.into_iter().map(Into::into));
        self
    }

    pub fn with_voice_note(mut self, reference: VoiceNoteRef) -> Self {
        self.voice_note_ref = Some(reference);
        self
    }

    /// Validate without changing anything.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.description.trim().is_empty() {
            return Err(DomainError::validation(
                "description",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Validate and return a trimmed copy.
    ///
    /// Materials keep their order; blank entries are dropped.
    pub fn normalized(&self) -> Result<Self, DomainError> {
        self.validate()?;
        Ok(Self {
            category: self.category,
            description: self.description.trim().to_string(),
            materials: self
                .materials
                .iter()
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect(),
            voice_note_ref: self.voice_note_ref.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_description_is_rejected() {
        let input = DraftInput::new(Category::Pottery, " \t\n");
        assert!(matches!(
            input.validate(),
            Err(DomainError::Validation {
                field: "description",
                ..
            })
        ));
    }

    #[test]
    fn normalized_trims_and_keeps_material_order() {
        let input = DraftInput::new(Category::Textiles, "  block-printed scarf ")
            .with_materials(["cotton", "  ", " indigo "]);
        let normalized = input.normalized().unwrap();
        assert_eq!(normalized.description, "block-printed scarf");
        assert_eq!(normalized.materials, vec!["cotton", "indigo"]);
    }

    #[test]
    fn parse_reports_unknown_category() {
        let err = DraftInput::parse("vinyl", "record", ["pvc"]).unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "category", .. }));
    }
}

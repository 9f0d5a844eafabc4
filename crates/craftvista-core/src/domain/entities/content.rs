//! AI-generated listing content and the seller's review copy of it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, value_objects::ContentField};

/// Marketing copy returned by the content generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub title: String,
    pub description: String,
    pub cultural_context: String,
    /// Suggested price in rupees.
    pub suggested_price: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Artisan story; empty until one is requested.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub story: String,
}

impl GeneratedContent {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        cultural_context: impl Into<String>,
        suggested_price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            cultural_context: cultural_context.into(),
            suggested_price,
            keywords: Vec::new(),
            story: String::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Read a single field.
    pub fn get(&self, field: ContentField) -> FieldValue {
        match field {
            ContentField::Title => FieldValue::Text(self.title.clone()),
            ContentField::Description => FieldValue::Text(self.description.clone()),
            ContentField::CulturalContext => FieldValue::Text(self.cultural_context.clone()),
            ContentField::SuggestedPrice => FieldValue::Price(self.suggested_price),
            ContentField::Story => FieldValue::Text(self.story.clone()),
        }
    }

    /// The checks a listing must pass before it may be published.
    ///
    /// Title and description carry the listing; cultural context may be
    /// left blank by the seller.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("description", "must not be empty"));
        }
        validate_price(self.suggested_price)
    }

    fn set(&mut self, field: ContentField, value: FieldValue) {
        match (field, value) {
            (ContentField::Title, FieldValue::Text(v)) => self.title = v,
            (ContentField::Description, FieldValue::Text(v)) => self.description = v,
            (ContentField::CulturalContext, FieldValue::Text(v)) => self.cultural_context = v,
            (ContentField::SuggestedPrice, FieldValue::Price(v)) => self.suggested_price = v,
            (ContentField::Story, FieldValue::Text(v)) => self.story = v,
            // Kind mismatches are rejected by `FieldValue::check_for` first.
            _ => {}
        }
    }
}

/// Rupee amounts must be finite and non-negative.
pub fn validate_price(price: f64) -> Result<(), DomainError> {
    if !price.is_finite() {
        return Err(DomainError::validation(
            "suggestedPrice",
            "must be a finite number",
        ));
    }
    if price < 0.0 {
        return Err(DomainError::validation(
            "suggestedPrice",
            format!("must not be negative (got {price})"),
        ));
    }
    Ok(())
}

/// A value for one [`ContentField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Price(f64),
}

impl FieldValue {
    /// Parse a raw string into the value kind `field` expects.
    pub fn parse_for(field: ContentField, raw: &str) -> Result<Self, DomainError> {
        if field.is_numeric() {
            let price = raw.trim().parse::<f64>().map_err(|_| {
                DomainError::validation("suggestedPrice", format!("'{raw}' is not a number"))
            })?;
            Ok(Self::Price(price))
        } else {
            Ok(Self::Text(raw.to_string()))
        }
    }

    /// Reject values of the wrong kind and out-of-range prices.
    pub fn check_for(&self, field: ContentField) -> Result<(), DomainError> {
        match (field.is_numeric(), self) {
            (true, Self::Price(p)) => validate_price(*p),
            (false, Self::Text(_)) => Ok(()),
            (true, Self::Text(_)) => Err(DomainError::validation(
                "suggestedPrice",
                "expected a number",
            )),
            (false, Self::Price(_)) => Err(DomainError::Validation {
                field: "content",
                reason: format!("{field} expects text"),
            }),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(p: f64) -> Self {
        Self::Price(p)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Price(p) => write!(f, "{p:.2}"),
        }
    }
}

/// Where a field's current value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    AiGenerated,
    /// AI-generated, then overwritten by the seller.
    SellerEdited,
}

/// Generated content under seller review.
///
/// The AI answer is kept verbatim next to the editable copy so edits never
/// erase what the generator produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedContent {
    ai: GeneratedContent,
    current: GeneratedContent,
    edited: BTreeSet<ContentField>,
}

impl ReviewedContent {
    pub fn new(ai: GeneratedContent) -> Self {
        Self {
            current: ai.clone(),
            ai,
            edited: BTreeSet::new(),
        }
    }

    /// The content as the seller currently sees it.
    pub fn current(&self) -> &GeneratedContent {
        &self.current
    }

    /// The generator's original answer.
    pub fn ai(&self) -> &GeneratedContent {
        &self.ai
    }

    pub fn get(&self, field: ContentField) -> FieldValue {
        self.current.get(field)
    }

    pub fn provenance(&self, field: ContentField) -> Provenance {
        if self.edited.contains(&field) {
            Provenance::SellerEdited
        } else {
            Provenance::AiGenerated
        }
    }

    /// Per-field "still AI-generated" flags, as stored with the listing.
    ///
    /// The story appears only once one has been written or typed in.
    pub fn ai_generated_flags(&self) -> BTreeMap<ContentField, bool> {
        ContentField::ALL
            .into_iter()
            .filter(|f| *f != ContentField::Story || self.has_story())
            .map(|f| (f, !self.edited.contains(&f)))
            .collect()
    }

    pub fn has_story(&self) -> bool {
        !self.current.story.trim().is_empty()
    }

    /// Take a freshly generated story. It replaces any earlier story,
    /// seller-written or not, and counts as AI-generated.
    pub fn attach_story(&mut self, story: impl Into<String>) {
        let story = story.into();
        self.ai.story.clone_from(&story);
        self.current.story = story;
        self.edited.remove(&ContentField::Story);
    }

    /// Overwrite one field. All-or-nothing: on error nothing changes.
    pub fn apply(&mut self, field: ContentField, value: FieldValue) -> Result<(), DomainError> {
        value.check_for(field)?;
        self.current.set(field, value);
        self.edited.insert(field);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bowl() -> GeneratedContent {
        GeneratedContent::new(
            "Handmade Terracotta Bowl",
            "A wheel-thrown bowl.",
            "Terracotta has been fired in Indian kilns for millennia.",
            850.0,
        )
    }

    #[test]
    fn edit_round_trips_and_marks_provenance() {
        let mut reviewed = ReviewedContent::new(bowl());
        reviewed
            .apply(ContentField::Title, "Blue Pottery Bowl".into())
            .unwrap();

        assert_eq!(
            reviewed.get(ContentField::Title),
            FieldValue::Text("Blue Pottery Bowl".into())
        );
        assert_eq!(reviewed.ai().title, "Handmade Terracotta Bowl");
        assert_eq!(
            reviewed.provenance(ContentField::Title),
            Provenance::SellerEdited
        );
        assert_eq!(
            reviewed.provenance(ContentField::Description),
            Provenance::AiGenerated
        );
    }

    #[test]
    fn negative_and_non_finite_prices_are_rejected_without_mutation() {
        let mut reviewed = ReviewedContent::new(bowl());
        for bad in [-5.0, f64::NAN, f64::INFINITY] {
            assert!(
                reviewed
                    .apply(ContentField::SuggestedPrice, bad.into())
                    .is_err()
            );
        }
        assert_eq!(reviewed.current().suggested_price, 850.0);
        assert_eq!(
            reviewed.provenance(ContentField::SuggestedPrice),
            Provenance::AiGenerated
        );
    }

    #[test]
    fn wrong_value_kind_is_a_validation_error() {
        let mut reviewed = ReviewedContent::new(bowl());
        assert!(reviewed.apply(ContentField::Title, 12.0.into()).is_err());
        assert!(
            reviewed
                .apply(ContentField::SuggestedPrice, "cheap".into())
                .is_err()
        );
    }

    #[test]
    fn parse_for_reads_numbers_only_for_price() {
        assert_eq!(
            FieldValue::parse_for(ContentField::SuggestedPrice, " 120.5 ").unwrap(),
            FieldValue::Price(120.5)
        );
        assert!(FieldValue::parse_for(ContentField::SuggestedPrice, "abc").is_err());
        assert_eq!(
            FieldValue::parse_for(ContentField::Title, "42").unwrap(),
            FieldValue::Text("42".into())
        );
    }

    #[test]
    fn publish_validation_requires_title_and_description() {
        let mut content = bowl();
        assert!(content.validate().is_ok());
        content.title = "   ".into();
        assert!(content.validate().is_err());
    }

    #[test]
    fn ai_flags_cover_every_field() {
        let mut reviewed = ReviewedContent::new(bowl());
        reviewed
            .apply(ContentField::SuggestedPrice, 900.0.into())
            .unwrap();
        let flags = reviewed.ai_generated_flags();
        assert_eq!(flags.len(), 4);
        assert_eq!(flags[&ContentField::SuggestedPrice], false);
        assert_eq!(flags[&ContentField::Title], true);
        assert!(!flags.contains_key(&ContentField::Story));
    }

    #[test]
    fn generated_story_is_flagged_until_edited() {
        let mut reviewed = ReviewedContent::new(bowl());
        assert!(!reviewed.has_story());

        reviewed.attach_story("Made by hand in Khurja.");
        assert_eq!(reviewed.current().story, "Made by hand in Khurja.");
        assert_eq!(reviewed.ai().story, "Made by hand in Khurja.");
        assert!(reviewed.ai_generated_flags()[&ContentField::Story]);

        reviewed
            .apply(ContentField::Story, "Thrown by my grandmother.".into())
            .unwrap();
        assert!(!reviewed.ai_generated_flags()[&ContentField::Story]);
        assert_eq!(reviewed.ai().story, "Made by hand in Khurja.");

        reviewed.attach_story("A second telling.");
        assert_eq!(
            reviewed.provenance(ContentField::Story),
            Provenance::AiGenerated
        );
    }
}

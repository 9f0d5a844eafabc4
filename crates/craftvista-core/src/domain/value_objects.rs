//! Domain value objects: Category, Role, ContentField, DraftStatus, Operation.
//!
//! All of them are `Copy` and compare by value. Each has one canonical
//! string form shared by serde and `Display`; `FromStr` also takes aliases.
//!
//! # Adding New Categories
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str`, `display_name`, `icon` arms and the `FromStr` arm
//! 3. Add it to `Category::ALL`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Category ─────────────────────────────────────────────────────────────────

/// A recognised craft category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pottery,
    Textiles,
    Jewelry,
    Woodwork,
    Metalwork,
    Paintings,
    Leather,
    Stone,
}

impl Category {
    /// Every category, in catalogue order.
    pub const ALL: [Category; 8] = [
        Self::Pottery,
        Self::Textiles,
        Self::Jewelry,
        Self::Woodwork,
        Self::Metalwork,
        Self::Paintings,
        Self::Leather,
        Self::Stone,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pottery => "pottery",
            Self::Textiles => "textiles",
            Self::Jewelry => "jewelry",
            Self::Woodwork => "woodwork",
            Self::Metalwork => "metalwork",
            Self::Paintings => "paintings",
            Self::Leather => "leather",
            Self::Stone => "stone",
        }
    }

    /// Human-readable catalogue name.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Pottery => "Pottery & Ceramics",
            Self::Textiles => "Textiles & Fabrics",
            Self::Jewelry => "Jewelry & Accessories",
            Self::Woodwork => "Woodwork & Furniture",
            Self::Metalwork => "Metalwork & Sculptures",
            Self::Paintings => "Paintings & Art",
            Self::Leather => "Leather Crafts",
            Self::Stone => "Stone & Marble Work",
        }
    }

    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Pottery => "\u{1f3fa}",
            Self::Textiles => "\u{1f9f5}",
            Self::Jewelry => "\u{1f48d}",
            Self::Woodwork => "\u{1fab5}",
            Self::Metalwork => "\u{2692}\u{fe0f}",
            Self::Paintings => "\u{1f3a8}",
            Self::Leather => "\u{1f45c}",
            Self::Stone => "\u{1faa8}",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pottery" | "ceramics" => Ok(Self::Pottery),
            "textiles" | "textile" | "fabrics" => Ok(Self::Textiles),
            "jewelry" | "jewellery" => Ok(Self::Jewelry),
            "woodwork" | "wood" => Ok(Self::Woodwork),
            "metalwork" | "metal" => Ok(Self::Metalwork),
            "paintings" | "painting" | "art" => Ok(Self::Paintings),
            "leather" => Ok(Self::Leather),
            "stone" | "marble" => Ok(Self::Stone),
            "" => Err(DomainError::validation("category", "category is required")),
            other => Err(DomainError::validation(
                "category",
                format!("unknown category: {other}"),
            )),
        }
    }
}

// ── Role ─────────────────────────────────────────────────────────────────────

/// The role tag carried by a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Artisan,
    Buyer,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Artisan => "artisan",
            Self::Buyer => "buyer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "artisan" | "seller" => Ok(Self::Artisan),
            "buyer" => Ok(Self::Buyer),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::validation("role", format!("unknown role: {other}"))),
        }
    }
}

// ── ContentField ─────────────────────────────────────────────────────────────

/// An editable field of generated listing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentField {
    Title,
    Description,
    CulturalContext,
    SuggestedPrice,
    /// Optional artisan story, written on request after the main copy.
    Story,
}

impl ContentField {
    pub const ALL: [ContentField; 5] = [
        Self::Title,
        Self::Description,
        Self::CulturalContext,
        Self::SuggestedPrice,
        Self::Story,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::CulturalContext => "culturalContext",
            Self::SuggestedPrice => "suggestedPrice",
            Self::Story => "story",
        }
    }

    /// Whether the field holds a number rather than free text.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::SuggestedPrice)
    }
}

impl fmt::Display for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "title" => Ok(Self::Title),
            "description" | "body" => Ok(Self::Description),
            "culturalcontext" | "context" => Ok(Self::CulturalContext),
            "suggestedprice" | "price" => Ok(Self::SuggestedPrice),
            "story" => Ok(Self::Story),
            _ => Err(DomainError::validation(
                "field",
                format!("unknown content field: {s}"),
            )),
        }
    }
}

// ── DraftStatus ──────────────────────────────────────────────────────────────

/// Flat view of where a draft sits in the authoring workflow.
///
/// The data-carrying state lives in `DraftPhase`; this tag is what the shell
/// renders and what errors report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Collecting,
    Generating,
    Reviewing,
    Publishing,
    Published,
    Failed,
}

impl DraftStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::Generating => "generating",
            Self::Reviewing => "reviewing",
            Self::Publishing => "publishing",
            Self::Published => "published",
            Self::Failed => "failed",
        }
    }

    /// States that wait on an external collaborator.
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Generating | Self::Publishing)
    }

    /// Whether generated content exists in this state.
    pub const fn has_content(self) -> bool {
        matches!(self, Self::Reviewing | Self::Publishing | Self::Published)
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Operation ────────────────────────────────────────────────────────────────

/// The outbound operations a draft can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Generate,
    /// Writing the artisan story for content under review.
    Story,
    Publish,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Story => "story",
            Self::Publish => "publish",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::model::ids::CardId;

//
// ─── CATEGORY & DIFFICULTY ─────────────────────────────────────────────────────
//

/// Otolaryngology subspecialty a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Laryngology,
    Rhinology,
    Otology,
    HeadNeck,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Laryngology,
        Category::Rhinology,
        Category::Otology,
        Category::HeadNeck,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Laryngology => "laryngology",
            Category::Rhinology => "rhinology",
            Category::Otology => "otology",
            Category::HeadNeck => "head-neck",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "laryngology" => Ok(Category::Laryngology),
            "rhinology" => Ok(Category::Rhinology),
            "otology" => Ok(Category::Otology),
            "head-neck" => Ok(Category::HeadNeck),
            other => Err(CardError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(CardError::UnknownDifficulty(other.to_string())),
        }
    }
}

//
// ─── IMAGE REFERENCES ──────────────────────────────────────────────────────────
//

/// Validated reference to a card image: an absolute http(s) URL or a
/// root-relative asset path (`/assets/...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageRef(String);

impl ImageRef {
    /// Validate a raw image reference.
    ///
    /// # Errors
    ///
    /// Returns `CardError::InvalidImage` when the value is neither a
    /// root-relative path nor an http(s) URL.
    pub fn parse(raw: &str) -> Result<Self, CardError> {
        if raw.starts_with('/') && raw.len() > 1 {
            return Ok(Self(raw.to_owned()));
        }
        let parsed =
            Url::parse(raw).map_err(|_| CardError::InvalidImage(raw.to_owned()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(Self(raw.to_owned())),
            _ => Err(CardError::InvalidImage(raw.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ImageRef {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}

//
// ─── CARD CONTENT VARIANTS ─────────────────────────────────────────────────────
//

/// A labelled point of interest on an anatomy image, in relative coordinates
/// (0.0..=1.0 from the top-left corner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub label: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Type-specific payload of a card, tagged the way the upstream dataset
/// encodes it (`"type": "quiz"` etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardContent {
    #[serde(rename = "quiz", rename_all = "camelCase")]
    Quiz {
        question: String,
        options: Vec<String>,
        answer_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    #[serde(rename = "flashcard")]
    Flashcard { front: String, back: String },
    #[serde(rename = "fill-blank")]
    FillBlank { text: String, answer: String },
    #[serde(rename = "animated-text")]
    AnimatedText { lines: Vec<String> },
    #[serde(rename = "anatomy-hotspot")]
    AnatomyHotspot {
        image: ImageRef,
        hotspots: Vec<Hotspot>,
    },
    #[serde(rename = "surgical-steps")]
    SurgicalSteps { title: String, steps: Vec<String> },
    #[serde(rename = "image-quiz", rename_all = "camelCase")]
    ImageQuiz {
        image: ImageRef,
        question: String,
        options: Vec<String>,
        answer_index: usize,
    },
}

impl CardContent {
    /// Whether this card type raises correct/incorrect answer events.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            CardContent::Quiz { .. } | CardContent::FillBlank { .. } | CardContent::ImageQuiz { .. }
        )
    }
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// An atomic unit of study content.
///
/// Cards are read-only for the duration of a session. `seq` is assigned by
/// the catalog source and defines the display order within a stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub stack: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub seq: u32,
    #[serde(flatten)]
    pub content: CardContent,
}

//
// ─── CARD ERRORS ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("invalid image reference: {0}")]
    InvalidImage(String),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

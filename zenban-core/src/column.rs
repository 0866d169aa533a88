//! Board columns.
//!
//! A [`Column`] is one lane of the board. All columns share a single
//! ordering scope, so their positions form one contiguous sequence
//! `0..N-1` from left to right.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, ValidationError};
use crate::store::Positioned;
use crate::validate::{Flag, validate_title};

/// Maximum allowed column title length in characters.
pub const MAX_COLUMN_TITLE_LENGTH: usize = 50;

/// Unique identifier for a column, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(u32);

impl ColumnId {
    /// Creates a `ColumnId` from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ColumnId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ColumnId> for u32 {
    fn from(id: ColumnId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accent color of a column header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnColor {
    /// Neutral gray.
    Gray,
    /// Blue (the default).
    #[default]
    Blue,
    /// Green.
    Green,
    /// Red.
    Red,
    /// Orange.
    Orange,
    /// Yellow.
    Yellow,
    /// Purple.
    Purple,
}

impl ColumnColor {
    /// All colors in display order.
    pub const ALL: [Self; 7] = [
        Self::Gray,
        Self::Blue,
        Self::Green,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Purple,
    ];

    /// Returns the lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
        }
    }
}

impl std::fmt::Display for ColumnColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownColor(s.to_string()))
    }
}

/// A column as stored and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Store-assigned identifier, immutable.
    pub id: ColumnId,
    /// Column title, 1 to [`MAX_COLUMN_TITLE_LENGTH`] characters.
    pub title: String,
    /// Header accent color.
    pub color: ColumnColor,
    /// Zero-based rank among all columns.
    pub position: u32,
    /// Whether task cards in this column render a progress slider.
    pub show_slider: bool,
}

impl Column {
    /// Builds a column from validated input. The position is provisional;
    /// the engine assigns the real one when the column is appended.
    #[must_use]
    pub fn from_new(id: ColumnId, new: NewColumn) -> Self {
        Self {
            id,
            title: new.title,
            color: new.color,
            position: 0,
            show_slider: new.show_slider,
        }
    }

    /// Applies a validated partial update. Position is never touched.
    pub fn apply(&mut self, patch: &ColumnPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(show_slider) = patch.show_slider {
            self.show_slider = show_slider;
        }
    }
}

impl Positioned for Column {
    type Id = ColumnId;
    type Container = ();

    fn id(&self) -> ColumnId {
        self.id
    }

    fn container(&self) {}

    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }

    fn not_found(id: ColumnId) -> BoardError {
        BoardError::ColumnNotFound(id)
    }
}

/// Loosely-typed column input as received from a client.
///
/// Unknown fields (including any `position` or `id`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDraft {
    /// Requested title.
    pub title: Option<String>,
    /// Requested color name.
    pub color: Option<String>,
    /// Slider flag, as a boolean or a 0/1 integer.
    pub show_slider: Option<Flag>,
}

/// Validated input for creating a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewColumn {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Header color.
    pub color: ColumnColor,
    /// Slider flag.
    pub show_slider: bool,
}

impl NewColumn {
    /// Creates a column input with default color and no slider.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] or
    /// [`ValidationError::TitleTooLong`] for an unusable title.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(title, MAX_COLUMN_TITLE_LENGTH)?,
            color: ColumnColor::default(),
            show_slider: false,
        })
    }
}

impl TryFrom<ColumnDraft> for NewColumn {
    type Error = ValidationError;

    fn try_from(draft: ColumnDraft) -> Result<Self, Self::Error> {
        let title = draft
            .title
            .ok_or(ValidationError::MissingField("title"))?;
        Ok(Self {
            title: validate_title(&title, MAX_COLUMN_TITLE_LENGTH)?,
            color: draft
                .color
                .as_deref()
                .map(str::parse)
                .transpose()?
                .unwrap_or_default(),
            show_slider: draft
                .show_slider
                .map(|flag| flag.into_bool("showSlider"))
                .transpose()?
                .unwrap_or(false),
        })
    }
}

/// Validated partial update for a column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New color, if changing.
    pub color: Option<ColumnColor>,
    /// New slider flag, if changing.
    pub show_slider: Option<bool>,
}

impl TryFrom<ColumnDraft> for ColumnPatch {
    type Error = ValidationError;

    fn try_from(draft: ColumnDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            title: draft
                .title
                .map(|title| validate_title(&title, MAX_COLUMN_TITLE_LENGTH))
                .transpose()?,
            color: draft.color.as_deref().map(str::parse).transpose()?,
            show_slider: draft
                .show_slider
                .map(|flag| flag.into_bool("showSlider"))
                .transpose()?,
        })
    }
}

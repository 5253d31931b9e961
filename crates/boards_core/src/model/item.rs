//! Note/link item model.
//!
//! # Responsibility
//! - Define the item record placed on boards as note or link tiles.
//! - Normalize user-entered item fields before they are stored.
//!
//! # Invariants
//! - `w >= 1` and `h >= 1` for every item written by core operations.
//! - `board_id` names the one board whose slots anchor this item.
//! - Link content always carries an `http://` or `https://` scheme.

use crate::grid::TileSize;
use crate::model::board::BoardId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static URL_SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid url scheme regex"));

/// Stable item identifier.
pub type ItemId = Uuid;

/// Item tile category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Free-form text note.
    Note,
    /// External URL.
    Link,
}

impl ItemKind {
    /// Stable lowercase label used in logs and FFI payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Link => "link",
        }
    }

    /// Parses a lowercase label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "note" => Some(Self::Note),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

/// Note or link placed on one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable item id.
    pub id: ItemId,
    /// Owning board.
    pub board_id: BoardId,
    /// Tile category.
    pub kind: ItemKind,
    /// Optional heading.
    #[serde(default)]
    pub title: Option<String>,
    /// Note text or link URL.
    #[serde(default)]
    pub content: String,
    /// Footprint width in cells. `0` in persisted data means "kind default".
    #[serde(default)]
    pub w: usize,
    /// Footprint height in cells. `0` in persisted data means "kind default".
    #[serde(default)]
    pub h: usize,
}

impl Item {
    /// Creates an item with a generated id and the given footprint.
    pub fn new(
        board_id: BoardId,
        kind: ItemKind,
        title: Option<String>,
        content: impl Into<String>,
        size: TileSize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            kind,
            title,
            content: content.into(),
            w: size.w,
            h: size.h,
        }
    }

    /// Returns the stored footprint floored at 1x1.
    pub fn size(&self) -> TileSize {
        TileSize::new(self.w, self.h)
    }

    /// Replaces the stored footprint.
    pub fn set_size(&mut self, size: TileSize) {
        self.w = size.w.max(1);
        self.h = size.h.max(1);
    }
}

/// Errors for user-entered item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemInputError {
    /// Note text or link URL is blank after trim.
    EmptyContent(ItemKind),
}

impl Display for ItemInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent(kind) => write!(f, "{} content must not be blank", kind.as_str()),
        }
    }
}

impl Error for ItemInputError {}

/// Normalized title/content pair ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    /// Trimmed title; blank input becomes `None`.
    pub title: Option<String>,
    /// Trimmed content, scheme-prefixed for links.
    pub content: String,
}

/// Normalizes raw title/content for one item kind.
///
/// # Errors
/// - Returns `EmptyContent` when content is blank after trim.
pub fn normalize_item_input(
    kind: ItemKind,
    title: Option<&str>,
    content: &str,
) -> Result<ItemInput, ItemInputError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ItemInputError::EmptyContent(kind));
    }
    let content = match kind {
        ItemKind::Link => normalize_link(content),
        ItemKind::Note => content.to_string(),
    };
    let title = title
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);
    Ok(ItemInput { title, content })
}

/// Prefixes `https://` when a link has no http(s) scheme.
pub fn normalize_link(value: &str) -> String {
    let trimmed = value.trim();
    if URL_SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

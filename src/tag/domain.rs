//! Core tag domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// A validated, non-empty tag name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a tag name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTagName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyTagName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a tag name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TagName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagName::new(s)
    }
}

impl Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated hex color in `#RRGGBB` form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TagColor(String);

impl TagColor {
    /// The color given to tags created without one, a slate gray.
    pub const DEFAULT: &'static str = "#64748b";

    /// Parse a hex color, accepting input with or without the leading `#`.
    ///
    /// Blank input falls back to [TagColor::DEFAULT].
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidTagColor] if `color` is not
    /// a six digit hex color.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();

        if color.is_empty() {
            return Ok(Self(Self::DEFAULT.to_string()));
        }

        let color = if color.starts_with('#') {
            color.to_string()
        } else {
            format!("#{color}")
        };

        let digits = &color[1..];

        if digits.len() == 6 && digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            Ok(Self(color))
        } else {
            Err(Error::InvalidTagColor(color))
        }
    }

    /// Create a tag color without validation.
    ///
    /// The caller should ensure that the string is a valid hex color.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl Default for TagColor {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl AsRef<str> for TagColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TagColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a tag.
pub type TagId = DatabaseId;

/// A tag for cross-cutting transaction labels (e.g., 'Holiday', 'Work').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
    pub color: TagColor,
}

/// Form data for tag creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct TagFormData {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[cfg(test)]
mod tag_color_tests {
    use crate::{Error, tag::TagColor};

    #[test]
    fn new_accepts_color_with_hash() {
        let color = TagColor::new("#1a2b3c");

        assert_eq!(color, Ok(TagColor::new_unchecked("#1a2b3c")));
    }

    #[test]
    fn new_prepends_missing_hash() {
        let color = TagColor::new("1a2b3c");

        assert_eq!(color, Ok(TagColor::new_unchecked("#1a2b3c")));
    }

    #[test]
    fn new_falls_back_to_default_on_blank() {
        let color = TagColor::new("  ");

        assert_eq!(color, Ok(TagColor::default()));
        assert_eq!(TagColor::default().as_ref(), TagColor::DEFAULT);
    }

    #[test]
    fn new_rejects_short_color() {
        let color = TagColor::new("#abc");

        assert_eq!(color, Err(Error::InvalidTagColor("#abc".to_string())));
    }

    #[test]
    fn new_rejects_non_hex_digits() {
        let color = TagColor::new("#12345g");

        assert_eq!(color, Err(Error::InvalidTagColor("#12345g".to_string())));
    }
}

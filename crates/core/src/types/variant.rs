//! Variant labels offered on every product card.
//!
//! Sizes and colors come from fixed sets. The serialized form is the exact
//! label shown to shoppers, so a persisted cart reads back unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors when parsing a variant label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariantError {
    #[error("unknown size: {0}")]
    UnknownSize(String),
    #[error("unknown color: {0}")]
    UnknownColor(String),
}

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    S,
    M,
    L,
    XL,
    XXL,
}

impl Size {
    /// All sizes in display order.
    pub const ALL: [Self; 5] = [Self::S, Self::M, Self::L, Self::XL, Self::XXL];

    /// The label shown in the size picker.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "XXL",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Size {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.label() == s)
            .ok_or_else(|| VariantError::UnknownSize(s.to_owned()))
    }
}

/// Garment color.
///
/// `ProductColor` means "as pictured" and is the picker's first entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "Product color")]
    ProductColor,
    White,
    Black,
    Yellow,
    Red,
}

impl Color {
    /// All colors in display order.
    pub const ALL: [Self; 5] = [
        Self::ProductColor,
        Self::White,
        Self::Black,
        Self::Yellow,
        Self::Red,
    ];

    /// The label shown in the color picker.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ProductColor => "Product color",
            Self::White => "White",
            Self::Black => "Black",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Color {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.label() == s)
            .ok_or_else(|| VariantError::UnknownColor(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_size_labels_parse_back() {
        for size in Size::ALL {
            assert_eq!(size.label().parse::<Size>().unwrap(), size);
        }
    }

    #[test]
    fn test_unknown_size() {
        assert_eq!(
            "XS".parse::<Size>(),
            Err(VariantError::UnknownSize("XS".to_string()))
        );
    }

    #[test]
    fn test_color_serializes_as_label() {
        let json = serde_json::to_string(&Color::ProductColor).unwrap();
        assert_eq!(json, "\"Product color\"");

        let parsed: Color = serde_json::from_str("\"Black\"").unwrap();
        assert_eq!(parsed, Color::Black);
    }

    #[test]
    fn test_unknown_color() {
        assert!(matches!(
            "Purple".parse::<Color>(),
            Err(VariantError::UnknownColor(_))
        ));
    }
}

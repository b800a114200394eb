//! Error types for palette operations

use std::num::ParseIntError;

use thiserror::Error;

/// Error returned when a palette entry is not a `#RRGGBB` hex string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    #[error("hex color must start with '#'")]
    MissingHash,

    #[error("hex color must have 6 digits, found {0}")]
    InvalidLength(usize),

    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),

    #[error("invalid hex value: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error returned when a palette cannot be prepared for matching.
///
/// Either variant aborts the whole job before any pixel is touched; a
/// partially parsed palette is never used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// No colors in the palette, so there is no nearest color
    #[error("palette cannot be empty")]
    Empty,

    /// Entry `index` could not be parsed
    #[error("invalid palette color {value:?} at index {index}: {source}")]
    ParseColor {
        index: usize,
        value: String,
        #[source]
        source: ParseColorError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseColorError::MissingHash.to_string(),
            "hex color must start with '#'"
        );
        assert_eq!(
            ParseColorError::InvalidLength(3).to_string(),
            "hex color must have 6 digits, found 3"
        );
        assert_eq!(PaletteError::Empty.to_string(), "palette cannot be empty");

        let err = PaletteError::ParseColor {
            index: 2,
            value: "red".to_string(),
            source: ParseColorError::MissingHash,
        };
        assert_eq!(
            err.to_string(),
            "invalid palette color \"red\" at index 2: hex color must start with '#'"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let err = PaletteError::ParseColor {
            index: 0,
            value: "#12345".to_string(),
            source: ParseColorError::InvalidLength(5),
        };
        let source = err.source().expect("parse error should carry a source");
        assert_eq!(source.to_string(), "hex color must have 6 digits, found 5");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::ValidationError;

/// A personal score on the 1-10 integer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidRating(value.to_string()))
        }
    }

    /// Parse rating text as typed by a user.
    ///
    /// Blank text means "no rating" and yields `Ok(None)`. Anything else must be
    /// an integer in 1..=10.
    pub fn parse(text: &str) -> Result<Option<Self>, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidRating(trimmed.to_string()))?;
        Self::try_from(value).map(Some)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(v) => Self::new(v),
            Err(_) => Err(ValidationError::InvalidRating(value.to_string())),
        }
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_full_range() {
        for value in 1..=10u8 {
            let parsed = Rating::parse(&value.to_string()).unwrap();
            assert_eq!(parsed.map(Rating::value), Some(value));
        }
    }

    #[test]
    fn test_parse_blank_means_no_rating() {
        assert_eq!(Rating::parse("").unwrap(), None);
        assert_eq!(Rating::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        assert_eq!(Rating::parse(" 7 ").unwrap().map(Rating::value), Some(7));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        for text in ["0", "11", "-3", "300", "99999999999"] {
            assert!(matches!(Rating::parse(text), Err(ValidationError::InvalidRating(_))), "{text}");
        }
    }

    #[test]
    fn test_parse_rejects_non_integer_text() {
        for text in ["seven", "7.5", "7/10"] {
            assert!(matches!(Rating::parse(text), Err(ValidationError::InvalidRating(_))), "{text}");
        }
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("8").is_ok());
        assert!(serde_json::from_str::<Rating>("0").is_err());
        assert!(serde_json::from_str::<Rating>("12").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Rating::new(8).unwrap().to_string(), "8/10");
    }
}

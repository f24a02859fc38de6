//! The concurrency token exchanged through `ETag` and `If-Match`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A strong entity tag carrying a product version.
///
/// Rendered as the quoted decimal version (`"3"`). Comparison always happens
/// on the integer, so `"03"` and `3` name the same version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityTag(u64);

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Malformed entity tag: {0:?}")]
pub struct EntityTagParseError(pub String);

impl EntityTag {
    pub fn new(version: u64) -> Self {
        Self(version)
    }

    pub fn version(self) -> u64 {
        self.0
    }

    /// True when this tag names exactly `version`.
    pub fn matches(self, version: u64) -> bool {
        self.0 == version
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// Accepts `"<digits>"` as well as bare `<digits>`.
impl FromStr for EntityTag {
    type Err = EntityTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.strip_prefix('"') {
            Some(rest) => rest
                .strip_suffix('"')
                .ok_or_else(|| EntityTagParseError(s.to_string()))?,
            None => trimmed,
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EntityTagParseError(s.to_string()));
        }
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| EntityTagParseError(s.to_string()))
    }
}

//! Brazilian postal code (CEP) validation

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Characters accepted as visual separators, e.g. `01310-100` or `01.310-100`
pub const SEPARATORS: [char; 2] = ['-', '.'];

/// Number of digits in a CEP
pub const POSTAL_CODE_LEN: usize = 8;

/// Raised when input is not 8 digits after separators are stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid zipcode")]
pub struct InvalidPostalCode;

/// A validated CEP: exactly 8 ASCII digits, separators removed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Strip separators from raw input and validate what remains.
    pub fn parse(raw: &str) -> Result<Self, InvalidPostalCode> {
        let digits = normalize(raw);
        if digits.len() == POSTAL_CODE_LEN && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(digits))
        } else {
            Err(InvalidPostalCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Remove separator characters, leaving everything else untouched
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| !SEPARATORS.contains(c)).collect()
}

impl FromStr for PostalCode {
    type Err = InvalidPostalCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

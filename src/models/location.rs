//! Location query model

use std::fmt;

use crate::error::LookupError;

/// A place name to look up, trimmed and guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Parse raw user input into a query
    ///
    /// Leading and trailing whitespace is dropped. Empty input yields
    /// [`LookupError::InvalidQuery`].
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LookupError::InvalidQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

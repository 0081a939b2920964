use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Reasons a destination name is rejected.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DestinationError {
    /// The name is empty.
    #[error("destination name must not be empty")]
    Empty,

    /// The name contains whitespace.
    #[error("destination name must not contain whitespace: {0:?}")]
    Whitespace(String),

    /// The name contains a wildcard token.
    #[error("destination name must not contain '*' or '>': {0:?}")]
    Wildcard(String),
}

/// A validated queue destination name, e.g. `notificationProducer-out-0`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Destination(String);

impl Destination {
    /// Validates and wraps a destination name.
    ///
    /// # Errors
    ///
    /// Returns a [`DestinationError`] if the name is empty, contains
    /// whitespace, or contains a wildcard.
    pub fn new(name: impl Into<String>) -> Result<Self, DestinationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DestinationError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(DestinationError::Whitespace(name));
        }
        if name.contains('*') || name.contains('>') {
            return Err(DestinationError::Wildcard(name));
        }
        Ok(Self(name))
    }

    /// The raw name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Destination {
    type Err = DestinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Destination> for String {
    fn from(destination: Destination) -> Self {
        destination.0
    }
}

impl AsRef<str> for Destination {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

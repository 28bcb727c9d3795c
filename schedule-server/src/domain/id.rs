//! Entity identifier type.

use std::fmt;

/// Error returned when parsing a malformed identifier token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {reason}")]
pub struct InvalidId {
    reason: &'static str,
}

/// A database-generated row identifier.
///
/// Identifiers travel over HTTP as opaque decimal tokens and are BIGSERIAL
/// keys natively. A token must be one or more ASCII digits whose value fits
/// in an `i64`; anything else is malformed, which is a different failure from
/// a well-formed token that matches no row.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::EntityId;
///
/// let id = EntityId::parse("42").unwrap();
/// assert_eq!(id.to_string(), "42");
///
/// // Signs and non-digits are rejected
/// assert!(EntityId::parse("-42").is_err());
/// assert!(EntityId::parse("abc").is_err());
/// assert!(EntityId::parse("").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(i64);

impl EntityId {
    /// Wrap a raw key produced by the store.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Parse an identifier token from a path segment.
    ///
    /// The token must be entirely ASCII digits and fit in an `i64`.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        if s.is_empty() {
            return Err(InvalidId {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidId {
                reason: "must be decimal digits",
            });
        }

        let value = s.parse::<i64>().map_err(|_| InvalidId {
            reason: "out of range",
        })?;

        Ok(Self(value))
    }

    /// Returns the native key value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

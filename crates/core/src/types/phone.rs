//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input matches neither accepted format.
    #[error("phone must be +<10-15 digits> or NNN-NNN-NNNN")]
    InvalidFormat,
}

/// A phone number in one of the two accepted formats.
///
/// - International: a `+` followed by 10 to 15 digits (`+14155550123`)
/// - Dashed: `NNN-NNN-NNNN` (`415-555-0123`)
///
/// Anything else is rejected at parse time, so a stored `Phone` is always
/// well-formed.
///
/// ## Examples
///
/// ```
/// use copperline_core::Phone;
///
/// assert!(Phone::parse("123-456-7890").is_ok());
/// assert!(Phone::parse("+12345678901234").is_ok()); // 14 digits
/// assert!(Phone::parse("+123456789").is_err());     // only 9 digits
/// assert!(Phone::parse("1234567890").is_err());     // missing dashes or +
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum digit count for the international format.
    pub const INTL_MIN_DIGITS: usize = 10;
    /// Maximum digit count for the international format.
    pub const INTL_MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for an empty input and
    /// [`PhoneError::InvalidFormat`] for anything that is neither
    /// `+<10-15 digits>` nor `NNN-NNN-NNNN`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if let Some(digits) = s.strip_prefix('+') {
            let valid = (Self::INTL_MIN_DIGITS..=Self::INTL_MAX_DIGITS)
                .contains(&digits.len())
                && digits.bytes().all(|b| b.is_ascii_digit());
            if valid {
                return Ok(Self(s.to_owned()));
            }
            return Err(PhoneError::InvalidFormat);
        }

        if Self::is_dashed(s) {
            return Ok(Self(s.to_owned()));
        }

        Err(PhoneError::InvalidFormat)
    }

    /// Check the `NNN-NNN-NNNN` shape.
    fn is_dashed(s: &str) -> bool {
        let mut groups = s.split('-');
        matches!(
            (groups.next(), groups.next(), groups.next(), groups.next()),
            (Some(a), Some(b), Some(c), None)
                if a.len() == 3 && b.len() == 3 && c.len() == 4
                    && [a, b, c]
                        .iter()
                        .all(|g| g.bytes().all(|d| d.is_ascii_digit()))
        )
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

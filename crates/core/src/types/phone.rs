//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The national number has the wrong number of digits.
    #[error("phone number must be exactly {expected} digits (got {actual})")]
    InvalidLength {
        /// Required number of digits.
        expected: usize,
        /// Number of characters supplied.
        actual: usize,
    },
    /// The national number contains something other than ASCII digits.
    #[error("phone number must contain only digits")]
    NonDigit,
    /// The first two digits are not an allocated mobile range.
    #[error("phone number prefix {0} is not in 20-29, 50-59 or 90-99")]
    InvalidPrefix(u8),
}

/// A Tunisian mobile phone number.
///
/// ## Constraints
///
/// - National number of exactly 8 ASCII digits
/// - First two digits in 20-29, 50-59 or 90-99
/// - An optional `+216` country prefix is accepted on input
///
/// The number is stored and serialized in international form (`+216XXXXXXXX`).
///
/// ## Examples
///
/// ```
/// use souk_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("22123456").is_ok());
/// assert!(PhoneNumber::parse("+21698123456").is_ok());
///
/// assert!(PhoneNumber::parse("").is_err());         // empty
/// assert!(PhoneNumber::parse("2212345").is_err());  // too short
/// assert!(PhoneNumber::parse("71123456").is_err()); // landline prefix
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// International dialling prefix.
    pub const COUNTRY_PREFIX: &'static str = "+216";

    /// Number of digits in a national number.
    pub const NATIONAL_LENGTH: usize = 8;

    /// Parse a `PhoneNumber` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is not exactly 8 digits once the country prefix is removed
    /// - Contains non-digit characters
    /// - Starts with a prefix outside the mobile ranges
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let national = trimmed
            .strip_prefix(Self::COUNTRY_PREFIX)
            .unwrap_or(trimmed);

        if national.len() != Self::NATIONAL_LENGTH {
            return Err(PhoneError::InvalidLength {
                expected: Self::NATIONAL_LENGTH,
                actual: national.len(),
            });
        }

        if !national.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        let prefix = national
            .get(..2)
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or(PhoneError::NonDigit)?;

        if !matches!(prefix, 20..=29 | 50..=59 | 90..=99) {
            return Err(PhoneError::InvalidPrefix(prefix));
        }

        Ok(Self(format!("{}{national}", Self::COUNTRY_PREFIX)))
    }

    /// Returns the number in international form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the 8-digit national number without the country prefix.
    #[must_use]
    pub fn national(&self) -> &str {
        self.0
            .strip_prefix(Self::COUNTRY_PREFIX)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ranges() {
        assert!(PhoneNumber::parse("20000000").is_ok());
        assert!(PhoneNumber::parse("29999999").is_ok());
        assert!(PhoneNumber::parse("50123456").is_ok());
        assert!(PhoneNumber::parse("59123456").is_ok());
        assert!(PhoneNumber::parse("90123456").is_ok());
        assert!(PhoneNumber::parse("99123456").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            PhoneNumber::parse("221234567"),
            Err(PhoneError::InvalidLength {
                expected: 8,
                actual: 9
            })
        );
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(PhoneNumber::parse("22-12345"), Err(PhoneError::NonDigit));
    }

    #[test]
    fn test_parse_invalid_prefix() {
        assert_eq!(
            PhoneNumber::parse("71123456"),
            Err(PhoneError::InvalidPrefix(71))
        );
        assert_eq!(
            PhoneNumber::parse("30123456"),
            Err(PhoneError::InvalidPrefix(30))
        );
    }

    #[test]
    fn test_country_prefix_is_normalized() {
        let bare = PhoneNumber::parse("98123456").unwrap();
        let prefixed = PhoneNumber::parse("+21698123456").unwrap();
        assert_eq!(bare, prefixed);
        assert_eq!(bare.as_str(), "+21698123456");
        assert_eq!(bare.national(), "98123456");
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let phone: PhoneNumber = serde_json::from_str("\"+21655123456\"").unwrap();
        assert_eq!(phone.national(), "55123456");
        assert!(serde_json::from_str::<PhoneNumber>("\"12\"").is_err());
    }
}

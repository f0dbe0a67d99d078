//! Field validation rules for participant payloads.
//!
//! Each check returns the first problem it finds as a [`ValidationError`]
//! naming the offending [`Field`]. The checks never touch storage.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length of a registration ID, in characters.
pub const MAX_REGISTRATION_ID_LEN: usize = 20;

/// Maximum length of the name, partner, and email fields, in characters.
pub const MAX_TEXT_LEN: usize = 100;

/// Maximum length of a contact number, in characters.
pub const MAX_CONTACT_LEN: usize = 20;

// ASCII whitespace only; no-break and em spaces are not separators here.
static CONTACT_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9+\-\t\n\x0B\x0C\r ()]+$").expect("valid contact number regex")
});

static EMAIL_ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").expect("valid email regex"));

/// A participant form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The registration ID (primary key).
    RegistrationId,
    /// The participant's name.
    Name,
    /// The department selection.
    Department,
    /// The optional dancing partner.
    DancingPartner,
    /// The contact phone number.
    ContactNumber,
    /// The email address.
    EmailAddress,
}

impl Field {
    /// Human-readable label, as shown on the registration form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::RegistrationId => "Registration ID",
            Self::Name => "Participant Name",
            Self::Department => "Department",
            Self::DancingPartner => "Dancing Partner",
            Self::ContactNumber => "Contact Number",
            Self::EmailAddress => "Email Address",
        }
    }

    fn format_hint(self) -> Option<&'static str> {
        match self {
            Self::ContactNumber => Some("use numbers, +, -, (), or spaces only"),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// The field was empty or whitespace.
    Required,
    /// The department is still the "Select Department" placeholder.
    Unselected,
    /// The department is not in the catalog.
    UnknownDepartment(String),
    /// The value does not match the field's pattern.
    InvalidFormat,
    /// The value starts or ends with whitespace or control characters.
    SurroundingWhitespace,
    /// The value exceeds the column width.
    TooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },
}

/// A rejected field together with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// The field that failed.
    pub field: Field,
    /// Why it failed.
    pub reason: ValidationReason,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: Field, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ValidationReason::Required => write!(f, "{} is required", self.field),
            ValidationReason::Unselected => f.write_str("please select a department"),
            ValidationReason::UnknownDepartment(name) => {
                write!(f, "unknown department: {name}")
            }
            ValidationReason::InvalidFormat => match self.field.format_hint() {
                Some(hint) => write!(f, "invalid {} format ({hint})", self.field),
                None => write!(f, "invalid {} format", self.field),
            },
            ValidationReason::SurroundingWhitespace => {
                write!(f, "{} must not start or end with whitespace", self.field)
            }
            ValidationReason::TooLong { max } => {
                write!(f, "{} must be at most {max} characters", self.field)
            }
        }
    }
}

/// Strip leading and trailing ASCII whitespace and control characters.
///
/// Anything at or below U+0020 is stripped. Unicode spaces such as U+00A0
/// are kept, so they still reach the field checks.
#[must_use]
pub fn trim_input(value: &str) -> &str {
    value.trim_matches(|c: char| c <= ' ')
}

/// Check that a registration ID is present, already trimmed, and fits the
/// key column.
///
/// `"R001"` and `" R001 "` would otherwise be two different keys.
///
/// # Errors
///
/// Returns an error naming [`Field::RegistrationId`] if the ID is blank,
/// padded, or too long.
pub fn validate_registration_id(value: &str) -> Result<(), ValidationError> {
    required(Field::RegistrationId, value, MAX_REGISTRATION_ID_LEN)?;
    validate_trimmed(Field::RegistrationId, value)
}

/// Check that a value has no leading or trailing characters that
/// [`trim_input`] would strip.
///
/// # Errors
///
/// Returns [`ValidationReason::SurroundingWhitespace`] for `field` otherwise.
pub fn validate_trimmed(field: Field, value: &str) -> Result<(), ValidationError> {
    if trim_input(value).len() != value.len() {
        return Err(ValidationError::new(
            field,
            ValidationReason::SurroundingWhitespace,
        ));
    }
    Ok(())
}

/// Check that a participant name is present.
///
/// # Errors
///
/// Returns an error naming [`Field::Name`] if the name is blank or too long.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    required(Field::Name, value, MAX_TEXT_LEN)
}

/// Check the optional dancing partner. Empty is allowed.
///
/// # Errors
///
/// Returns an error naming [`Field::DancingPartner`] if the value is too long.
pub fn validate_dancing_partner(value: &str) -> Result<(), ValidationError> {
    max_len(Field::DancingPartner, value, MAX_TEXT_LEN)
}

/// Check that a contact number is present and uses only digits, `+`, `-`,
/// ASCII whitespace, and parentheses.
///
/// # Errors
///
/// Returns an error naming [`Field::ContactNumber`] on any violation.
pub fn validate_contact_number(value: &str) -> Result<(), ValidationError> {
    required(Field::ContactNumber, value, MAX_CONTACT_LEN)?;
    if !CONTACT_NUMBER_RE.is_match(value) {
        return Err(ValidationError::new(
            Field::ContactNumber,
            ValidationReason::InvalidFormat,
        ));
    }
    Ok(())
}

/// Check that an email address is present and looks like `local@domain`.
///
/// # Errors
///
/// Returns an error naming [`Field::EmailAddress`] on any violation.
pub fn validate_email_address(value: &str) -> Result<(), ValidationError> {
    required(Field::EmailAddress, value, MAX_TEXT_LEN)?;
    if !EMAIL_ADDRESS_RE.is_match(value) {
        return Err(ValidationError::new(
            Field::EmailAddress,
            ValidationReason::InvalidFormat,
        ));
    }
    Ok(())
}

fn required(field: Field, value: &str, max: usize) -> Result<(), ValidationError> {
    if trim_input(value).is_empty() {
        return Err(ValidationError::new(field, ValidationReason::Required));
    }
    max_len(field, value, max)
}

fn max_len(field: Field, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(field, ValidationReason::TooLong { max }));
    }
    Ok(())
}

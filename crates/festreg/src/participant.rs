//! Core participant types for festreg.
//!
//! This module defines the registration record, the raw form payload it is
//! built from, and the fixed department catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::{
    trim_input, validate_contact_number, validate_dancing_partner, validate_email_address,
    validate_name, validate_registration_id, validate_trimmed, Field, ValidationError,
    ValidationReason,
};

/// Placeholder shown before a department is chosen. Never a valid value.
pub const DEPARTMENT_PLACEHOLDER: &str = "Select Department";

/// The departments a participant can register under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    /// Computer Science & IT.
    #[serde(rename = "Computer Science & IT")]
    ComputerScienceIt,
    /// Business & Management.
    #[serde(rename = "Business & Management")]
    BusinessManagement,
    /// Engineering.
    Engineering,
    /// Arts & Humanities.
    #[serde(rename = "Arts & Humanities")]
    ArtsHumanities,
    /// Health Sciences.
    #[serde(rename = "Health Sciences")]
    HealthSciences,
    /// Law.
    Law,
    /// Education.
    Education,
    /// Natural Sciences.
    #[serde(rename = "Natural Sciences")]
    NaturalSciences,
}

impl Department {
    /// Every department, in catalog order.
    pub const ALL: [Department; 8] = [
        Self::ComputerScienceIt,
        Self::BusinessManagement,
        Self::Engineering,
        Self::ArtsHumanities,
        Self::HealthSciences,
        Self::Law,
        Self::Education,
        Self::NaturalSciences,
    ];

    /// The display name, which is also what gets stored.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ComputerScienceIt => "Computer Science & IT",
            Self::BusinessManagement => "Business & Management",
            Self::Engineering => "Engineering",
            Self::ArtsHumanities => "Arts & Humanities",
            Self::HealthSciences => "Health Sciences",
            Self::Law => "Law",
            Self::Education => "Education",
            Self::NaturalSciences => "Natural Sciences",
        }
    }

    /// Short kebab-case form, convenient on the command line.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::ComputerScienceIt => "computer-science-it",
            Self::BusinessManagement => "business-management",
            Self::Engineering => "engineering",
            Self::ArtsHumanities => "arts-humanities",
            Self::HealthSciences => "health-sciences",
            Self::Law => "law",
            Self::Education => "education",
            Self::NaturalSciences => "natural-sciences",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Department {
    type Err = ValidationError;

    /// Accepts the display name (any case) or the slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = trim_input(s);
        if s.is_empty() || s.eq_ignore_ascii_case(DEPARTMENT_PLACEHOLDER) {
            return Err(ValidationError::new(
                Field::Department,
                ValidationReason::Unselected,
            ));
        }

        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s) || d.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ValidationError::new(
                    Field::Department,
                    ValidationReason::UnknownDepartment(s.to_string()),
                )
            })
    }
}

/// A stored participant registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Staff-assigned key. Never changes once inserted.
    pub registration_id: String,

    /// Participant's full name.
    pub name: String,

    /// Department the participant registered under.
    pub department: Department,

    /// Dancing partner's name; empty when there is none.
    pub dancing_partner: String,

    /// Contact phone number.
    pub contact_number: String,

    /// Email address.
    pub email_address: String,

    /// Raw bytes of the university ID photo.
    #[serde(skip)]
    pub id_image: Option<Vec<u8>>,
}

impl ParticipantRecord {
    /// Check every text field against the validation rules.
    ///
    /// Stored values must already be trimmed; padding is an error here.
    ///
    /// # Errors
    ///
    /// Returns the first failing field, in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_registration_id(&self.registration_id)?;
        self.validate_fields()
    }

    /// Like [`validate`](Self::validate), but skips the registration ID.
    ///
    /// Used when the key comes from somewhere else, as in an update.
    ///
    /// # Errors
    ///
    /// Returns the first failing field, in form order.
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_trimmed(Field::Name, &self.name)?;
        validate_dancing_partner(&self.dancing_partner)?;
        validate_trimmed(Field::DancingPartner, &self.dancing_partner)?;
        validate_contact_number(&self.contact_number)?;
        validate_trimmed(Field::ContactNumber, &self.contact_number)?;
        validate_email_address(&self.email_address)?;
        validate_trimmed(Field::EmailAddress, &self.email_address)?;
        Ok(())
    }

    /// Size of the stored photo in bytes, if any.
    #[must_use]
    pub fn image_len(&self) -> Option<usize> {
        self.id_image.as_ref().map(Vec::len)
    }
}

/// Untrusted input collected from the user.
///
/// Text fields are trimmed of ASCII whitespace and control characters
/// before they are checked or stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantForm {
    /// Registration ID as typed.
    pub registration_id: String,
    /// Name as typed.
    pub name: String,
    /// Department name or slug as typed.
    pub department: String,
    /// Dancing partner as typed.
    pub dancing_partner: String,
    /// Contact number as typed.
    pub contact_number: String,
    /// Email address as typed.
    pub email_address: String,
    /// Photo bytes, if one was attached.
    pub id_image: Option<Vec<u8>>,
}

impl ParticipantForm {
    /// Validate the payload without consuming it.
    ///
    /// Checks run in form order: registration ID, name, department, dancing
    /// partner, contact number, email address. The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_registration_id(trim_input(&self.registration_id))?;
        validate_name(trim_input(&self.name))?;
        self.department.parse::<Department>()?;
        validate_dancing_partner(trim_input(&self.dancing_partner))?;
        validate_contact_number(trim_input(&self.contact_number))?;
        validate_email_address(trim_input(&self.email_address))?;
        Ok(())
    }

    /// Validate and convert into a storable record.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn into_record(self) -> Result<ParticipantRecord, ValidationError> {
        self.validate()?;
        Ok(ParticipantRecord {
            registration_id: trim_input(&self.registration_id).to_string(),
            name: trim_input(&self.name).to_string(),
            department: self.department.parse()?,
            dancing_partner: trim_input(&self.dancing_partner).to_string(),
            contact_number: trim_input(&self.contact_number).to_string(),
            email_address: trim_input(&self.email_address).to_string(),
            id_image: self.id_image,
        })
    }
}

/// A participant listing entry, without the photo bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    /// Registration ID.
    pub registration_id: String,
    /// Participant's name.
    pub name: String,
    /// Department.
    pub department: Department,
    /// Dancing partner; empty when none.
    pub dancing_partner: String,
    /// Contact number.
    pub contact_number: String,
    /// Email address.
    pub email_address: String,
    /// Photo size in bytes, if a photo is stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_len: Option<usize>,
}

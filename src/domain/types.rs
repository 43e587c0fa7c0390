//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, valid FDI tooth codes) so that once a value
//! reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use ammonia;
use phonenumber::{Mode, country, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// National identity number is not 7 or 8 digits.
    #[error("invalid DNI")]
    InvalidDni,
    /// Tooth code is not a valid FDI position.
    #[error("invalid tooth number: {0}")]
    InvalidToothNumber(u8),
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(PatientId, "Unique identifier for a patient.");
id_newtype!(StaffId, "Unique identifier for a staff member.");
id_newtype!(ClinicalRecordId, "Unique identifier for a clinical record.");
id_newtype!(FollowUpId, "Unique identifier for a clinical record follow-up.");
id_newtype!(TreatmentId, "Catalog identifier of a treatment type.");
id_newtype!(ToothId, "Catalog identifier of a dental piece.");
id_newtype!(SurfaceId, "Catalog identifier of a tooth surface.");
id_newtype!(AppointmentId, "Unique identifier for an appointment.");
id_newtype!(ScheduleSlotId, "Identifier of a fixed schedule slot.");
id_newtype!(AppointmentStatusId, "Identifier of an appointment status.");
id_newtype!(PaymentId, "Unique identifier for a payment.");
id_newtype!(PaymentTypeId, "Identifier of a payment type.");
id_newtype!(AuditEntryId, "Identifier of an audit log entry.");
id_newtype!(CatalogItemId, "Identifier of a generic catalog item.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(PersonName, "First or last name enforcing non-empty values.");

non_empty_string_newtype!(Username, "Login name enforcing trimmed, non-empty values.");

non_empty_string_newtype!(
    CatalogName,
    "Display name of a catalog entry enforcing trimmed, non-empty values."
);

/// Free clinical text sanitized of markup, trimmed and non-empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClinicalNote(String);

impl ClinicalNote {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ClinicalNote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClinicalNote {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClinicalNote> for String {
    fn from(value: ClinicalNote) -> Self {
        value.0
    }
}

/// National identity document number (7 or 8 digits, separators stripped).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Dni(String);

impl Dni {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let digits: String = value
            .into()
            .chars()
            .filter(|c| !matches!(c, '.' | ' ' | '-'))
            .collect();
        if (7..=8).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(digits))
        } else {
            Err(TypeConstraintError::InvalidDni)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Dni {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Dni {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Dni> for String {
    fn from(value: Dni) -> Self {
        value.0
    }
}

/// Normalizes a phone number string to E.164 format.
///
/// Numbers without an international prefix are parsed as Argentine numbers.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed =
        parse(Some(country::Id::AR), trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Dental quadrant in FDI notation. Deciduous quadrants 5–8 share the
/// orientation of permanent quadrants 1–4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

/// FDI two-digit tooth code: quadrant digit followed by position digit.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct ToothNumber(u8);

impl ToothNumber {
    /// Validates an FDI code (11–18, 21–28, 31–38, 41–48, 51–55, 61–65, 71–75, 81–85).
    pub fn new(value: u8) -> Result<Self, TypeConstraintError> {
        let quadrant = value / 10;
        let position = value % 10;
        let valid = match quadrant {
            1..=4 => (1..=8).contains(&position),
            5..=8 => (1..=5).contains(&position),
            _ => false,
        };
        if valid {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidToothNumber(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether the code belongs to the deciduous (primary) dentition.
    pub const fn is_deciduous(self) -> bool {
        self.0 >= 50
    }

    pub const fn quadrant(self) -> Quadrant {
        match (self.0 / 10 - 1) % 4 {
            0 => Quadrant::UpperRight,
            1 => Quadrant::UpperLeft,
            2 => Quadrant::LowerLeft,
            _ => Quadrant::LowerRight,
        }
    }

    /// All 32 permanent and 20 deciduous positions in ascending order.
    pub fn all() -> impl Iterator<Item = ToothNumber> {
        (11u8..=85).filter_map(|code| ToothNumber::new(code).ok())
    }
}

impl Display for ToothNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for ToothNumber {
    type Error = TypeConstraintError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ToothNumber> for u8 {
    fn from(value: ToothNumber) -> Self {
        value.0
    }
}

/// Lower-cases and strips Spanish diacritics so catalog names can be matched
/// regardless of how the backend spells them.
pub fn fold_name(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_non_positive_values() {
        assert_eq!(PatientId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(PatientId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(PatientId::new(7).map(PatientId::get), Ok(7));
    }

    #[test]
    fn ids_deserialize_through_validation() {
        let id: StaffId = serde_json::from_str("12").unwrap();
        assert_eq!(id.get(), 12);
        assert!(serde_json::from_str::<StaffId>("0").is_err());
    }

    #[test]
    fn tooth_numbers_follow_fdi_ranges() {
        assert!(ToothNumber::new(11).is_ok());
        assert!(ToothNumber::new(48).is_ok());
        assert!(ToothNumber::new(55).is_ok());
        assert!(ToothNumber::new(85).is_ok());
        assert!(ToothNumber::new(19).is_err());
        assert!(ToothNumber::new(56).is_err());
        assert!(ToothNumber::new(90).is_err());
        assert!(ToothNumber::new(10).is_err());
        assert_eq!(ToothNumber::all().count(), 52);
        assert_eq!(ToothNumber::all().filter(|t| t.is_deciduous()).count(), 20);
    }

    #[test]
    fn deciduous_quadrants_share_permanent_orientation() {
        let q = |n| ToothNumber::new(n).unwrap().quadrant();
        assert_eq!(q(11), Quadrant::UpperRight);
        assert_eq!(q(51), Quadrant::UpperRight);
        assert_eq!(q(24), Quadrant::UpperLeft);
        assert_eq!(q(63), Quadrant::UpperLeft);
        assert_eq!(q(36), Quadrant::LowerLeft);
        assert_eq!(q(72), Quadrant::LowerLeft);
        assert_eq!(q(47), Quadrant::LowerRight);
        assert_eq!(q(85), Quadrant::LowerRight);
    }

    #[test]
    fn dni_strips_separators() {
        assert_eq!(Dni::new("30.123.456").unwrap().as_str(), "30123456");
        assert_eq!(Dni::new("abc"), Err(TypeConstraintError::InvalidDni));
        assert_eq!(Dni::new("123"), Err(TypeConstraintError::InvalidDni));
    }

    #[test]
    fn clinical_note_is_sanitized() {
        let note = ClinicalNote::new("  <script>x</script>Dolor molar ").unwrap();
        assert_eq!(note.as_str(), "Dolor molar");
        assert!(ClinicalNote::new("<script>alert(1)</script>  ").is_err());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            Email::new(" Ana@Clinica.COM ").unwrap().as_str(),
            "ana@clinica.com"
        );
        assert_eq!(Email::new("nope"), Err(TypeConstraintError::InvalidEmail));
    }

    #[test]
    fn fold_name_strips_accents() {
        assert_eq!(fold_name(" Extracción "), "extraccion");
        assert_eq!(fold_name("Odontólogo/a"), "odontologo/a");
    }
}

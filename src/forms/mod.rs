//! Form definitions backing the clinic routes.
//!
//! Forms are parsed with `serde_html_form`, which understands repeated keys
//! (`detail_treatment=1&detail_treatment=4`) and treats empty values of
//! optional fields as `None`.

use chrono::{NaiveDate, NaiveTime};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod appointments;
pub mod audit;
pub mod auth;
pub mod catalogs;
pub mod patients;
pub mod payments;
pub mod profile;
pub mod records;
pub mod staff;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("Revise los datos del formulario: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("No se pudo leer el formulario.")]
    Decode(String),

    #[error("Identificador inválido.")]
    InvalidId,

    #[error("Fecha inválida.")]
    InvalidDate,

    #[error("Hora inválida.")]
    InvalidTime,

    #[error("Correo electrónico inválido.")]
    InvalidEmail,

    #[error("Número de teléfono inválido.")]
    InvalidPhoneNumber,

    #[error("DNI inválido, debe tener 7 u 8 dígitos.")]
    InvalidDni,

    #[error("Complete los campos obligatorios.")]
    MissingField,

    #[error("Las contraseñas no coinciden.")]
    PasswordMismatch,
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::NonPositiveId => FormError::InvalidId,
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::InvalidDni => FormError::InvalidDni,
            TypeConstraintError::EmptyString => FormError::MissingField,
            TypeConstraintError::InvalidValue(_) | TypeConstraintError::InvalidToothNumber(_) => {
                FormError::Decode(err.to_string())
            }
        }
    }
}

/// Decodes an urlencoded body or query string.
pub fn parse<T: DeserializeOwned>(input: &[u8]) -> Result<T, FormError> {
    serde_html_form::from_bytes(input).map_err(|err| FormError::Decode(err.to_string()))
}

/// Trimmed value, `None` when blank.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate)
}

pub(crate) fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, FormError> {
    value
        .and_then(non_blank)
        .map(|v| parse_date(&v))
        .transpose()
}

/// Accepts `HH:MM` as sent by `<input type="time">` and `HH:MM:SS`.
pub(crate) fn parse_time(value: &str) -> Result<NaiveTime, FormError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| FormError::InvalidTime)
}

/// Parses an optional id from a select whose empty option means "none".
pub(crate) fn parse_optional_id(value: Option<&str>) -> Result<Option<i32>, FormError> {
    match value.and_then(non_blank) {
        Some(v) => v.parse().map(Some).map_err(|_| FormError::InvalidId),
        None => Ok(None),
    }
}

/// HTML checkboxes post `on` (or any value) when ticked and nothing otherwise.
pub(crate) fn checkbox(value: Option<&str>) -> bool {
    value.is_some_and(|v| !matches!(v.trim(), "" | "false" | "0" | "off"))
}

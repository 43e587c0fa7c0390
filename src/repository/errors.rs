use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

/// Field name to messages, as returned by the backend on 400 responses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Parses `{"field": ["msg", ...], "detail": "msg"}` style bodies.
    pub fn from_body(body: &str) -> Self {
        let mut errors = BTreeMap::new();
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                for (field, value) in map {
                    let messages = match value {
                        Value::String(s) => vec![s],
                        Value::Array(items) => items
                            .into_iter()
                            .map(|item| match item {
                                Value::String(s) => s,
                                other => other.to_string(),
                            })
                            .collect(),
                        other => vec![other.to_string()],
                    };
                    errors.insert(field, messages);
                }
            }
            Ok(Value::Array(items)) => {
                let messages = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect();
                errors.insert("detail".to_string(), messages);
            }
            _ if !body.trim().is_empty() => {
                errors.insert("detail".to_string(), vec![body.trim().to_string()]);
            }
            _ => {}
        }
        Self(errors)
    }

    pub fn detail(&self) -> Option<&str> {
        self.0
            .get("detail")
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| {
                if field == "detail" || field == "non_field_errors" {
                    messages.join(" ")
                } else {
                    format!("{field}: {}", messages.join(" "))
                }
            })
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Entity in use: {0}")]
    InUse(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

const DELETE_REFUSED: &str = "No se puede eliminar";

impl RepositoryError {
    /// Classifies a non-success response of the backend.
    pub fn from_response(method: &Method, status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => RepositoryError::Unauthorized,
            StatusCode::FORBIDDEN => RepositoryError::Forbidden,
            StatusCode::NOT_FOUND => RepositoryError::NotFound,
            StatusCode::CONFLICT => RepositoryError::InUse(FieldErrors::from_body(body).to_string()),
            StatusCode::INTERNAL_SERVER_ERROR if method == Method::DELETE => {
                RepositoryError::InUse(format!("{status}"))
            }
            StatusCode::BAD_REQUEST => {
                let errors = FieldErrors::from_body(body);
                if errors.to_string().contains(DELETE_REFUSED) {
                    RepositoryError::InUse(errors.to_string())
                } else {
                    RepositoryError::Validation(errors)
                }
            }
            _ => RepositoryError::Unexpected(format!("{status}: {body}")),
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Unexpected(format!("Malformed response: {err}"))
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Unexpected(format!("Malformed response: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_parse_backend_shapes() {
        let errors = FieldErrors::from_body(r#"{"dni": ["Ya existe un paciente con este DNI."], "detail": "x"}"#);
        assert_eq!(errors.detail(), Some("x"));
        assert_eq!(errors.to_string(), "x; dni: Ya existe un paciente con este DNI.");

        assert!(FieldErrors::from_body("").is_empty());
        assert_eq!(FieldErrors::from_body("oops").detail(), Some("oops"));
    }

    #[test]
    fn statuses_map_to_taxonomy() {
        let get = Method::GET;
        let delete = Method::DELETE;

        assert!(matches!(
            RepositoryError::from_response(&get, StatusCode::UNAUTHORIZED, ""),
            RepositoryError::Unauthorized
        ));
        assert!(matches!(
            RepositoryError::from_response(&get, StatusCode::FORBIDDEN, ""),
            RepositoryError::Forbidden
        ));
        assert!(matches!(
            RepositoryError::from_response(&get, StatusCode::NOT_FOUND, ""),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            RepositoryError::from_response(&delete, StatusCode::CONFLICT, ""),
            RepositoryError::InUse(_)
        ));
        assert!(matches!(
            RepositoryError::from_response(&delete, StatusCode::INTERNAL_SERVER_ERROR, ""),
            RepositoryError::InUse(_)
        ));
        assert!(matches!(
            RepositoryError::from_response(&get, StatusCode::INTERNAL_SERVER_ERROR, ""),
            RepositoryError::Unexpected(_)
        ));
        assert!(matches!(
            RepositoryError::from_response(
                &delete,
                StatusCode::BAD_REQUEST,
                r#"{"detail": "No se puede eliminar: tiene pacientes asociados"}"#
            ),
            RepositoryError::InUse(_)
        ));
        assert!(matches!(
            RepositoryError::from_response(&get, StatusCode::BAD_REQUEST, r#"{"email": ["x"]}"#),
            RepositoryError::Validation(_)
        ));
    }
}

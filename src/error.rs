use axum::extract::multipart::MultipartError;
use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use std::env;
use std::fmt::{self, Debug};
use std::io;

pub const INVALID_INPUT: i32 = 101;
pub const VALIDATION_FAILED: i32 = 102;
pub const PAYLOAD_TOO_LARGE: i32 = 103;
pub const NOT_FOUND: i32 = 104;

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
    pub fields: Vec<FieldError>,
}

/// A single rejected request field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Error {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn invalid_input_error() -> Self {
        invalid_input_error()
    }

    pub fn not_found_error() -> Self {
        not_found_error()
    }

    pub fn validation_error(fields: Vec<FieldError>) -> Self {
        validation_error(fields)
    }

    pub fn is_invalid_input_error(&self) -> bool {
        self.code == INVALID_INPUT
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == NOT_FOUND
    }

    pub fn is_validation_error(&self) -> bool {
        self.code == VALIDATION_FAILED
    }

    pub fn status(&self) -> StatusCode {
        match self.code {
            4 => StatusCode::BAD_GATEWAY,
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            NOT_FOUND => StatusCode::NOT_FOUND,
            PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        tracing::error!(error = %err, "i/o error");
        unexpected_error()
    }
}

impl From<MultipartError> for Error {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(error = %err, "malformed multipart body");
        Error::new(INVALID_INPUT, "malformed multipart body")
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self.code {
            1..=99 => "Internal Server Error",
            _ => self.message.as_str(),
        };

        let body = if self.fields.is_empty() {
            json!({
                "code": self.code,
                "error": error_message,
            })
        } else {
            json!({
                "code": self.code,
                "error": error_message,
                "fields": self.fields,
            })
        };

        (status, Json(body)).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error::new(INVALID_INPUT, "invalid input")
}

pub fn validation_error(fields: Vec<FieldError>) -> Error {
    Error {
        code: VALIDATION_FAILED,
        message: "validation failed".into(),
        fields,
    }
}

pub fn payload_too_large_error() -> Error {
    Error::new(PAYLOAD_TOO_LARGE, "request body too large")
}

pub fn not_found_error() -> Error {
    Error::new(NOT_FOUND, "not found")
}

pub fn env_var_error(err: env::VarError) -> Error {
    tracing::error!(error = %err, "environment variable error");
    config_error("environment variable error")
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error::new(1, message)
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(error = ?err, "database error");
    Error::new(2, "database error")
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::error!(error = %err, "reqwest error");
    Error::new(3, "reqwest error")
}

pub fn upstream_error() -> Error {
    Error::new(4, "upstream error")
}

pub fn unexpected_error() -> Error {
    Error::new(5, "unexpected error")
}

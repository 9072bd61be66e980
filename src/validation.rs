//! Field rules for request payloads.
//!
//! Every rule records into a [`Violations`] collector instead of returning
//! early, so a single response can list every rejected field.

use crate::error::{validation_error, Error, FieldError};

/// Longest accepted text field, in characters.
pub const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Default)]
pub struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(value)` when nothing was recorded, otherwise a validation error
    /// carrying every field error in the order they were added.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Error> {
        if self.errors.is_empty() {
            Ok(value())
        } else {
            Err(validation_error(self.errors))
        }
    }

    pub fn into_error(self) -> Error {
        validation_error(self.errors)
    }

    pub fn required_text(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match value.map(str::trim) {
            None => {
                self.add(field, "is required");
                None
            }
            Some("") => {
                self.add(field, "must not be empty");
                None
            }
            Some(text) if text.chars().count() > MAX_TEXT_LEN => {
                self.add(field, format!("must be at most {} characters", MAX_TEXT_LEN));
                None
            }
            Some(text) => Some(text.to_string()),
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let email = self.required_text(field, value)?;

        if is_email(&email) {
            Some(email)
        } else {
            self.add(field, "must be a valid email");
            None
        }
    }

    pub fn coordinate(
        &mut self,
        field: &str,
        value: Option<&str>,
        limit: f64,
    ) -> Option<f64> {
        let raw = self.required_text(field, value)?;

        match raw.parse::<f64>() {
            Ok(number) if number.is_finite() && number.abs() <= limit => Some(number),
            Ok(number) if number.is_finite() => {
                self.add(field, format!("must be between -{} and {}", limit, limit));
                None
            }
            _ => {
                self.add(field, "must be a number");
                None
            }
        }
    }

    pub fn uf(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let raw = self.required_text(field, value)?;

        if is_uf(&raw) {
            Some(raw.to_ascii_uppercase())
        } else {
            self.add(field, "must be a two-letter state code");
            None
        }
    }

    pub fn id_list(&mut self, field: &str, value: Option<&str>) -> Option<Vec<i32>> {
        let raw = self.required_text(field, value)?;

        match parse_id_list(&raw) {
            Some(ids) => Some(ids),
            None => {
                self.add(field, "must be a comma-separated list of item ids");
                None
            }
        }
    }
}

pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();

    labels.len() >= 2
        && labels.iter().all(|label| !label.is_empty())
        && labels.last().map_or(false, |tld| tld.len() >= 2)
}

pub fn is_uf(value: &str) -> bool {
    value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic())
}

/// Parses `^[0-9]+(,[0-9]+)*$` into ids, dropping repeats but keeping the
/// first-seen order.
pub fn parse_id_list(value: &str) -> Option<Vec<i32>> {
    let mut ids: Vec<i32> = Vec::new();

    for part in value.split(',') {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let id = part.parse::<i32>().ok()?;

        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    Some(ids)
}

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::resource::{ValidationErrorKind, ValidationFieldError};

pub const PRODUCT_NAME_MAX_LENGTH: u64 = 50;
pub const EMAIL_MAX_LENGTH: u64 = 60;
pub const PHONE_LENGTH: u64 = 11;

pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+$";
pub const PHONE_PATTERN: &str = r"^0[0-9]{10}$";

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(EMAIL_PATTERN).expect("Expect a valid email regex");
    static ref PHONE_REGEX: Regex = Regex::new(PHONE_PATTERN).expect("Expect a valid phone regex");
}

fn char_len(value: &str) -> u64 {
    value.chars().count() as u64
}

fn required(value: &str) -> Option<ValidationErrorKind> {
    value.trim().is_empty().then_some(ValidationErrorKind::Required)
}

pub fn product_name(name: &str) -> Vec<ValidationErrorKind> {
    if let Some(kind) = required(name) {
        return vec![kind];
    }

    let mut kinds = Vec::new();
    if char_len(name) > PRODUCT_NAME_MAX_LENGTH {
        kinds.push(ValidationErrorKind::MaxLength(PRODUCT_NAME_MAX_LENGTH));
    }
    kinds
}

pub fn email(email: &str) -> Vec<ValidationErrorKind> {
    if let Some(kind) = required(email) {
        return vec![kind];
    }

    let mut kinds = Vec::new();
    if char_len(email) > EMAIL_MAX_LENGTH {
        kinds.push(ValidationErrorKind::MaxLength(EMAIL_MAX_LENGTH));
    }
    if !EMAIL_REGEX.is_match(email) {
        kinds.push(ValidationErrorKind::Pattern("email".into()));
    }
    kinds
}

/// Canonical form used to store and look up account emails.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn phone(phone: &str) -> Vec<ValidationErrorKind> {
    let mut kinds = Vec::new();
    let len = char_len(phone);
    if len < PHONE_LENGTH {
        kinds.push(ValidationErrorKind::MinLength(PHONE_LENGTH));
    }
    if len > PHONE_LENGTH {
        kinds.push(ValidationErrorKind::MaxLength(PHONE_LENGTH));
    }
    if !PHONE_REGEX.is_match(phone) {
        kinds.push(ValidationErrorKind::Pattern(PHONE_PATTERN.into()));
    }
    kinds
}

pub fn present<T>(value: &Option<T>) -> Vec<ValidationErrorKind> {
    match value {
        Some(_) => Vec::new(),
        None => vec![ValidationErrorKind::Required],
    }
}

/// Collects a field error into `errors` when `kinds` is not empty.
pub fn collect(
    errors: &mut Vec<ValidationFieldError>,
    type_id: &'static str,
    path: &str,
    value: String,
    kinds: Vec<ValidationErrorKind>,
) {
    if !kinds.is_empty() {
        errors.push(ValidationFieldError::new(type_id, value, path.into(), kinds));
    }
}

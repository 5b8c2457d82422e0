//! Validation rules for contact form fields

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

pub const NAME_REQUIRED: &str = "Name field is required";
pub const EMAIL_REQUIRED: &str = "Email field is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const MESSAGE_REQUIRED: &str = "Message field is required";

lazy_static! {
    // Dot-atom or quoted local part. Domain is an IPv4 literal or labels
    // ending in an alphabetic TLD.
    static ref EMAIL_REGEX: Regex = Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#
    ).unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error("required", message));
    }

    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    validate_required(email, EMAIL_REQUIRED)?;

    if !EMAIL_REGEX.is_match(email) {
        return Err(error("email", EMAIL_INVALID));
    }

    Ok(())
}

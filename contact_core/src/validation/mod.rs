//! Contact form validation

pub mod rules;

pub use rules::*;

use crate::models::{Field, FormValues};
use std::collections::BTreeMap;
use validator::ValidationError;

/// Field → human-readable message. Empty means the form is submittable.
pub type FieldErrors = BTreeMap<Field, String>;

/// Pure and total: every input yields a (possibly empty) error map.
pub fn validate_form(values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in Field::ALL {
        if let Err(err) = validate_field(field, values.get(field)) {
            errors.insert(field, message_of(&err, field));
        }
    }

    errors
}

pub fn validate_field(field: Field, value: &str) -> Result<(), ValidationError> {
    match field {
        Field::Name => validate_required(value, NAME_REQUIRED),
        Field::Email => validate_email(value),
        Field::Message => validate_required(value, MESSAGE_REQUIRED),
    }
}

fn message_of(err: &ValidationError, field: Field) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None => format!("Validation failed for field '{}'", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_form_has_no_errors() {
        let values = FormValues::new("Ada", "ada@example.com", "Hi");
        assert!(validate_form(&values).is_empty());
    }

    #[test]
    fn test_empty_form_flags_every_field() {
        let errors = validate_form(&FormValues::default());

        assert_eq!(errors.len(), 3);
        assert_eq!(errors[&Field::Name], NAME_REQUIRED);
        assert_eq!(errors[&Field::Email], EMAIL_REQUIRED);
        assert_eq!(errors[&Field::Message], MESSAGE_REQUIRED);
    }

    #[test]
    fn test_only_empty_fields_are_flagged() {
        let cases = [
            (FormValues::new("", "ada@example.com", "Hi"), vec![Field::Name]),
            (FormValues::new("Ada", "", "Hi"), vec![Field::Email]),
            (FormValues::new("Ada", "ada@example.com", ""), vec![Field::Message]),
            (FormValues::new("", "ada@example.com", ""), vec![Field::Name, Field::Message]),
        ];

        for (values, expected) in cases {
            let flagged: Vec<Field> = validate_form(&values).into_keys().collect();
            assert_eq!(flagged, expected, "values: {:?}", values);
        }
    }

    #[test]
    fn test_malformed_email_flags_only_email() {
        for email in ["ada.example.com", "ada@", "ada@example"] {
            let errors = validate_form(&FormValues::new("Ada", email, "Hi"));
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[&Field::Email], EMAIL_INVALID);
        }
    }

    #[test]
    fn test_validation_is_idempotent() {
        let values = FormValues::new("", "nope", "Hi");
        assert_eq!(validate_form(&values), validate_form(&values));
    }
}

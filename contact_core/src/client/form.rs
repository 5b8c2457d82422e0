//! Form field state with explicit touched tracking

use crate::models::{Field, FormValues};
use crate::validation::{validate_form, FieldErrors};
use std::collections::BTreeSet;

/// Fields whose errors are eligible for display: blurred at least once, or
/// included in a submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchedFields(BTreeSet<Field>);

impl TouchedFields {
    pub fn touch(&mut self, field: Field) {
        self.0.insert(field);
    }

    pub fn touch_all(&mut self) {
        self.0.extend(Field::ALL);
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    values: FormValues,
    touched: TouchedFields,
    errors: FieldErrors,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::with_values(FormValues::default())
    }
}

impl ContactForm {
    pub fn with_values(values: FormValues) -> Self {
        let errors = validate_form(&values);
        Self {
            values,
            touched: TouchedFields::default(),
            errors,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn touched(&self) -> &TouchedFields {
        &self.touched
    }

    /// Every current error, touched or not.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value.into());
        self.errors = validate_form(&self.values);
    }

    pub fn blur(&mut self, field: Field) {
        self.touched.touch(field);
    }

    pub fn touch_all(&mut self) {
        self.touched.touch_all();
    }

    pub fn visible_errors(&self) -> FieldErrors {
        self.errors
            .iter()
            .filter(|(field, _)| self.touched.contains(**field))
            .map(|(field, message)| (*field, message.clone()))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.touched.clear();
        self.errors = validate_form(&self.values);
    }
}

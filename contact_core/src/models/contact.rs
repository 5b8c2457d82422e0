//! Contact form values and the submission as the relay receives it

use serde::{Deserialize, Serialize};
use std::fmt;

/// A contact form field, named by its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "user_name")]
    Name,
    #[serde(rename = "user_email")]
    Email,
    #[serde(rename = "message")]
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "user_name",
            Field::Email => "user_email",
            Field::Message => "message",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Client-side form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    #[serde(rename = "user_name")]
    pub name: String,
    #[serde(rename = "user_email")]
    pub email: String,
    pub message: String,
}

impl FormValues {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// `application/x-www-form-urlencoded` body for the relay endpoint.
    pub fn to_form_body(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for field in Field::ALL {
            serializer.append_pair(field.key(), self.get(field));
        }
        serializer.finish()
    }
}

/// Fields recovered from a relay request body. Keys that never appeared stay
/// `None` and are left out of the provider's `template_params`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactSubmission {
    /// First occurrence of each key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut submission = Self::default();
        for (key, value) in pairs {
            let Some(field) = Field::from_key(key.as_ref()) else {
                continue;
            };
            let slot = submission.slot_mut(field);
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        submission
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.user_name.as_deref(),
            Field::Email => self.user_email.as_deref(),
            Field::Message => self.message.as_deref(),
        }
    }

    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.user_name,
            Field::Email => &mut self.user_email,
            Field::Message => &mut self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_body_encoding() {
        let values = FormValues::new("Ada Lovelace", "ada@example.com", "Hi & bye");
        assert_eq!(
            values.to_form_body(),
            "user_name=Ada+Lovelace&user_email=ada%40example.com&message=Hi+%26+bye"
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let submission = ContactSubmission::from_pairs(vec![
            ("user_name", "first"),
            ("user_name", "second"),
            ("unexpected", "ignored"),
            ("message", "hello"),
        ]);

        assert_eq!(submission.user_name.as_deref(), Some("first"));
        assert_eq!(submission.message.as_deref(), Some("hello"));
        assert_eq!(submission.missing_fields(), vec![Field::Email]);
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let submission = ContactSubmission::from_pairs(vec![("user_email", "ada@example.com")]);
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json, serde_json::json!({ "user_email": "ada@example.com" }));
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(Field::from_key("user_email"), Some(Field::Email));
        assert_eq!(Field::from_key("email"), None);
        assert_eq!(Field::Message.to_string(), "message");
    }
}

//! Request-shape validation
//!
//! Rules accumulate field-level messages instead of failing fast. A field may
//! collect several messages; later rules append, they never overwrite.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::utils::url_validator::validate_url;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: Into<String>>(&mut self, field: &str, message: M) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one message
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    /// Start a rule chain for a required string field
    pub fn field<'a>(&'a mut self, name: &'a str, value: &'a str) -> FieldRules<'a> {
        FieldRules {
            errors: self,
            name,
            value: Some(value),
        }
    }

    /// Rule chain for an optional field; rules are skipped when the value is absent
    pub fn optional_field<'a>(&'a mut self, name: &'a str, value: Option<&'a str>) -> FieldRules<'a> {
        FieldRules {
            errors: self,
            name,
            value,
        }
    }
}

pub struct FieldRules<'a> {
    errors: &'a mut ValidationErrors,
    name: &'a str,
    value: Option<&'a str>,
}

impl FieldRules<'_> {
    pub fn not_empty(self, message: &str) -> Self {
        let failed = self.value.is_some_and(|v| v.trim().is_empty());
        self.check(failed, message)
    }

    pub fn max_length(self, max: usize, message: &str) -> Self {
        let failed = self.value.is_some_and(|v| v.chars().count() > max);
        self.check(failed, message)
    }

    /// Absolute http(s) URL; empty values are left to `not_empty`
    pub fn url(self, message: &str) -> Self {
        let failed = self
            .value
            .is_some_and(|v| !v.trim().is_empty() && validate_url(v).is_err());
        self.check(failed, message)
    }

    pub fn email(self, message: &str) -> Self {
        let failed = self
            .value
            .is_some_and(|v| !v.trim().is_empty() && !looks_like_email(v));
        self.check(failed, message)
    }

    pub fn must<F: FnOnce(&str) -> bool>(self, predicate: F, message: &str) -> Self {
        let failed = self.value.is_some_and(|v| !predicate(v));
        self.check(failed, message)
    }

    fn check(self, failed: bool, message: &str) -> Self {
        if failed {
            self.errors.add(self.name, message);
        }
        self
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_collects_one_message() {
        let mut errors = ValidationErrors::new();
        errors
            .field("name", "")
            .not_empty("Name is required")
            .max_length(100, "Name must not exceed 100 characters");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some(&["Name is required".to_string()][..]));
    }

    #[test]
    fn test_messages_append_in_rule_order() {
        let mut errors = ValidationErrors::new();
        let long = "x".repeat(101);
        errors
            .field("name", &long)
            .max_length(100, "too long")
            .must(|v| v.starts_with('A'), "must start with A");

        assert_eq!(
            errors.get("name"),
            Some(&["too long".to_string(), "must start with A".to_string()][..])
        );
    }

    #[test]
    fn test_optional_field_skips_absent_value() {
        let mut errors = ValidationErrors::new();
        errors
            .optional_field("logoUrl", None)
            .url("Logo URL must be a valid http(s) URL");
        assert!(errors.is_empty());

        errors
            .optional_field("logoUrl", Some("ftp://nope"))
            .url("Logo URL must be a valid http(s) URL");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_email_rule() {
        let mut errors = ValidationErrors::new();
        errors.field("email", "someone@example.com").email("bad");
        errors.field("other", "not-an-email").email("bad");
        assert!(errors.get("email").is_none());
        assert_eq!(errors.get("other").map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"name": ["Name is required"]}));
    }
}

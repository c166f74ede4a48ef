//! Generic key-indexed form state management.
//!
//! Many admin workflows (CSV import rows, bulk editors) share the same
//! shape: a set of named fields, each holding a text or list value, an
//! optional validation predicate, and a required flag. [`FormState`]
//! centralizes that bookkeeping so callers only describe their fields
//! and ask for per-field or whole-form validity.
//!
//! Two notions of validity are exposed on purpose:
//!
//! - [`FormState::validity`] is the *plain* check: a field is invalid
//!   only if it is non-empty **and** its validator rejects the value.
//!   An empty value is never plain-invalid, so untouched optional
//!   fields don't light up as errors.
//! - [`FormState::strict_validity`] additionally requires non-emptiness
//!   for fields marked required. [`FormState::form_ok`] is the
//!   conjunction of strict validity over every field and is the gate
//!   for submitting the form.
//!
//! # Example
//!
//! ```
//! use homeroom_core::form::{FieldSpec, FormState};
//!
//! let mut form = FormState::new([
//!     ("date", FieldSpec::required().with_validator(|v| v.len() == 10)),
//!     ("note", FieldSpec::optional()),
//! ]);
//!
//! assert!(!form.form_ok()); // "date" is required and still empty
//!
//! form.set("date", "2024-05-13");
//! assert!(form.form_ok());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A field's current value: a single text entry or a list of entries
/// (e.g. a multi-select).
#[derive(Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// An empty text value, the default for fields without an explicit
    /// default.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Whether the value counts as "not filled in": empty text or an
    /// empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// The entries of a list value, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "Text({:?})", s),
            Self::List(items) => write!(f, "List({:?})", items),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Per-field configuration: required flag, optional validation
/// predicate, and the default value restored by [`FormState::reset`].
#[derive(Clone)]
pub struct FieldSpec {
    required: bool,
    validator: Option<Validator>,
    default: FieldValue,
}

impl FieldSpec {
    /// A field that may be left empty.
    pub fn optional() -> Self {
        Self {
            required: false,
            validator: None,
            default: FieldValue::empty(),
        }
    }

    /// A field that must be non-empty for the form to pass
    /// [`FormState::form_ok`].
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::optional()
        }
    }

    /// Attaches a validation predicate. The predicate only runs against
    /// non-empty values; for list values it must accept every entry.
    pub fn with_validator(mut self, validator: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets the default value the field starts with and returns to on
    /// [`FormState::reset`].
    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.default = default.into();
        self
    }

    fn accepts(&self, value: &FieldValue) -> bool {
        let Some(validator) = &self.validator else {
            return true;
        };
        match value {
            FieldValue::Text(s) => validator(s),
            FieldValue::List(items) => items.iter().all(|item| validator(item)),
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("required", &self.required)
            .field("has_validator", &self.validator.is_some())
            .field("default", &self.default)
            .finish()
    }
}

struct Field {
    value: FieldValue,
    spec: FieldSpec,
}

/// A key-indexed store of form field values and their validation state.
///
/// Fields are declared up front via [`FormState::new`]; setting an
/// undeclared key is a no-op. The state tracks whether any setter has
/// run since construction ([`FormState::touched`]); [`FormState::reset`]
/// restores default values but does not clear the touched flag, since
/// the user did interact with the form.
pub struct FormState {
    fields: BTreeMap<String, Field>,
    touched: bool,
}

impl FormState {
    /// Builds a form from `(key, spec)` pairs. Each field starts at its
    /// spec's default value.
    pub fn new<K, I>(specs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldSpec)>,
    {
        let fields = specs
            .into_iter()
            .map(|(key, spec)| {
                let value = spec.default.clone();
                (key.into(), Field { value, spec })
            })
            .collect();
        Self {
            fields,
            touched: false,
        }
    }

    /// Assigns a value to `key` and marks the form as touched.
    ///
    /// Returns `false` (and changes nothing) if the key was never
    /// declared.
    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) -> bool {
        match self.fields.get_mut(key) {
            Some(field) => {
                field.value = value.into();
                self.touched = true;
                true
            }
            None => false,
        }
    }

    /// Restores every field to its default value. The touched flag is
    /// left as-is.
    pub fn reset(&mut self) {
        for field in self.fields.values_mut() {
            field.value = field.spec.default.clone();
        }
    }

    /// Whether any setter has run since construction.
    pub fn touched(&self) -> bool {
        self.touched
    }

    /// The current value of `key`, if declared.
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key).map(|field| &field.value)
    }

    /// Convenience accessor for text fields.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(FieldValue::as_text)
    }

    /// Plain validity: `false` only when the value is non-empty and the
    /// field's validator rejects it. Empty values and undeclared keys
    /// are vacuously valid.
    pub fn validity(&self, key: &str) -> bool {
        let Some(field) = self.fields.get(key) else {
            return true;
        };
        field.value.is_empty() || field.spec.accepts(&field.value)
    }

    /// Strict validity: plain validity, plus non-emptiness when the
    /// field is required.
    pub fn strict_validity(&self, key: &str) -> bool {
        let Some(field) = self.fields.get(key) else {
            return true;
        };
        if field.spec.required && field.value.is_empty() {
            return false;
        }
        self.validity(key)
    }

    /// Whether the whole form is submittable: every field passes
    /// [`FormState::strict_validity`].
    pub fn form_ok(&self) -> bool {
        self.fields.keys().all(|key| self.strict_validity(key))
    }

    /// Keys that currently fail [`FormState::strict_validity`], in key
    /// order. Useful for error reporting.
    pub fn invalid_keys(&self) -> Vec<&str> {
        self.fields
            .keys()
            .filter(|key| !self.strict_validity(key))
            .map(String::as_str)
            .collect()
    }
}

impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("keys", &self.fields.keys().collect::<Vec<_>>())
            .field("touched", &self.touched)
            .field("form_ok", &self.form_ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_untouched_with_defaults() {
        let form = FormState::new([
            ("name", FieldSpec::optional().with_default("Somchai")),
            ("room", FieldSpec::optional()),
        ]);
        assert!(!form.touched());
        assert_eq!(form.text("name"), Some("Somchai"));
        assert_eq!(form.text("room"), Some(""));
    }

    #[test]
    fn set_marks_touched_and_unknown_key_is_ignored() {
        let mut form = FormState::new([("name", FieldSpec::optional())]);
        assert!(!form.set("nope", "x"));
        assert!(!form.touched());

        assert!(form.set("name", "Prae"));
        assert!(form.touched());
        assert_eq!(form.text("name"), Some("Prae"));
    }

    #[test]
    fn reset_restores_defaults_but_keeps_touched() {
        let mut form = FormState::new([("name", FieldSpec::optional().with_default("Somchai"))]);
        form.set("name", "Prae");
        form.reset();
        assert_eq!(form.text("name"), Some("Somchai"));
        assert!(form.touched());
    }

    #[test]
    fn empty_value_is_never_plain_invalid() {
        let form = FormState::new([(
            "room",
            FieldSpec::required().with_validator(|v| v.len() == 3),
        )]);
        assert!(form.validity("room"));
        assert!(!form.strict_validity("room"));
    }

    #[test]
    fn validator_only_runs_on_non_empty_values() {
        let mut form = FormState::new([(
            "room",
            FieldSpec::optional().with_validator(|v| v.chars().all(|c| c.is_ascii_digit())),
        )]);
        form.set("room", "1o1");
        assert!(!form.validity("room"));
        assert!(!form.strict_validity("room"));

        form.set("room", "101");
        assert!(form.validity("room"));
        assert!(form.strict_validity("room"));
    }

    #[test]
    fn list_values_validate_every_entry() {
        let mut form = FormState::new([(
            "codes",
            FieldSpec::optional().with_validator(|v| v.len() == 1),
        )]);
        form.set("codes", vec!["a".to_string(), "b".to_string()]);
        assert!(form.validity("codes"));

        form.set("codes", vec!["a".to_string(), "bc".to_string()]);
        assert!(!form.validity("codes"));
    }

    #[test]
    fn empty_list_counts_as_empty_for_required_check() {
        let mut form = FormState::new([("codes", FieldSpec::required())]);
        form.set("codes", Vec::<String>::new());
        assert!(!form.strict_validity("codes"));
        assert!(!form.form_ok());
    }

    #[test]
    fn invalid_keys_lists_failures_in_order() {
        let mut form = FormState::new([
            ("a", FieldSpec::required()),
            ("b", FieldSpec::optional().with_validator(|v| v == "ok")),
            ("c", FieldSpec::required()),
        ]);
        form.set("b", "nope");
        form.set("c", "filled");
        assert_eq!(form.invalid_keys(), vec!["a", "b"]);
    }

    #[test]
    fn undeclared_keys_are_vacuously_valid() {
        let form = FormState::new([("a", FieldSpec::optional())]);
        assert!(form.validity("ghost"));
        assert!(form.strict_validity("ghost"));
    }
}

//! Single form field state.

use crate::model::Gender;

/// Validation rules attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules {
    /// An empty value is an error.
    pub required: bool,
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    /// Maximum length in characters.
    pub max_length: Option<usize>,
    /// Value the field must repeat, used by the password confirmation.
    pub must_equal: Option<String>,
}

impl Rules {
    /// Rules for a field that must be filled in.
    #[must_use]
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// Rules for a field that may stay empty.
    #[must_use]
    pub fn optional() -> Self {
        Self::default()
    }

    /// Set the minimum length.
    #[must_use]
    pub const fn with_min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set the maximum length.
    #[must_use]
    pub const fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require the value to equal `other`.
    #[must_use]
    pub fn with_must_equal(mut self, other: impl Into<String>) -> Self {
        self.must_equal = Some(other.into());
        self
    }
}

/// Pure validator: maps a value to an error string, empty when valid.
pub type Validator<T> = fn(&T, &Rules) -> String;

/// Values a field can hold.
pub trait FieldValue {
    /// Whether the value counts as "not filled in".
    fn is_blank(&self) -> bool;
}

impl FieldValue for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl FieldValue for Option<Gender> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

/// A field's current value, its last validation error, and its rules.
///
/// The error is non-empty only when the current value failed the rules at the
/// last change or the last explicit [`FormField::validate`].
#[derive(Debug, Clone)]
pub struct FormField<T> {
    id: &'static str,
    value: T,
    error: String,
    rules: Rules,
    validator: Validator<T>,
}

impl<T: FieldValue> FormField<T> {
    /// Create an untouched field; it reports no error until first validated.
    pub fn new(id: &'static str, value: T, rules: Rules, validator: Validator<T>) -> Self {
        Self {
            id,
            value,
            error: String::new(),
            rules,
            validator,
        }
    }

    /// Field identifier, matching the input's `name`.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Last validation error; empty when valid.
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Current rules.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Replace the value and re-run the validator.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.validate();
    }

    /// Replace the rules and re-run the validator.
    pub fn set_rules(&mut self, rules: Rules) {
        self.rules = rules;
        self.validate();
    }

    /// Replace the rules without re-validating.
    pub fn replace_rules(&mut self, rules: Rules) {
        self.rules = rules;
    }

    /// Re-run the validator, refreshing the error. Returns `true` when valid.
    pub fn validate(&mut self) -> bool {
        self.error = (self.validator)(&self.value, &self.rules);
        self.error.is_empty()
    }

    /// Valid and, when required, filled in.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.error.is_empty() && !(self.rules.required && self.value.is_blank())
    }

    /// Drop the value and error, keeping rules.
    pub fn clear(&mut self)
    where
        T: Default,
    {
        self.value = T::default();
        self.error.clear();
    }
}

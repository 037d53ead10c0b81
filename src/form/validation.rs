use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use futures::future;
use serde::Deserialize;

use super::fields::{FieldErrors, FieldKey, FieldSet};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(errors) => Some(errors),
        }
    }
}

impl From<FieldErrors> for ValidationResult {
    fn from(errors: FieldErrors) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

pub type BoxedValidationFuture<'a> = Pin<Box<dyn Future<Output = ValidationResult> + Send + 'a>>;

/// Checks a field set. Implementations may suspend; the controller awaits every call.
pub trait Validator: Send + Sync {
    fn validate<'a>(&'a self, fields: &'a FieldSet) -> BoxedValidationFuture<'a>;
}

impl<F> Validator for F
where
    F: Fn(&FieldSet) -> ValidationResult + Send + Sync,
{
    fn validate<'a>(&'a self, fields: &'a FieldSet) -> BoxedValidationFuture<'a> {
        Box::pin(future::ready((self)(fields)))
    }
}

pub async fn validate(validator: &dyn Validator, fields: &FieldSet) -> ValidationResult {
    validator.validate(fields).await
}

/// A single field rule. Format and length rules pass on empty input; emptiness is
/// reported by [`Rule::Required`].
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Required {
        #[serde(default)]
        message: Option<String>,
    },
    Email {
        #[serde(default)]
        message: Option<String>,
    },
    MinLength {
        min: usize,
        #[serde(default)]
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        #[serde(default)]
        message: Option<String>,
    },
}

impl Rule {
    pub const fn required() -> Self {
        Rule::Required { message: None }
    }

    pub const fn email() -> Self {
        Rule::Email { message: None }
    }

    pub const fn min_length(min: usize) -> Self {
        Rule::MinLength { min, message: None }
    }

    pub const fn max_length(max: usize) -> Self {
        Rule::MaxLength { max, message: None }
    }

    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Rule::Required { message }
            | Rule::Email { message }
            | Rule::MinLength { message, .. }
            | Rule::MaxLength { message, .. } => *message = text,
        }
        self
    }

    /// Returns the failure message, or `None` when `value` satisfies the rule.
    pub fn check(&self, value: &str) -> Option<String> {
        match self {
            Rule::Required { message } => value
                .trim()
                .is_empty()
                .then(|| message.clone().unwrap_or_else(|| "required".to_owned())),
            Rule::Email { message } => (!value.is_empty() && !looks_like_email(value))
                .then(|| message.clone().unwrap_or_else(|| "invalid email".to_owned())),
            Rule::MinLength { min, message } => {
                let len = value.chars().count();
                (len > 0 && len < *min).then(|| {
                    message
                        .clone()
                        .unwrap_or_else(|| format!("must be at least {min} characters"))
                })
            }
            Rule::MaxLength { max, message } => (value.chars().count() > *max).then(|| {
                message
                    .clone()
                    .unwrap_or_else(|| format!("must be at most {max} characters"))
            }),
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// Declarative rule set, evaluated field by field in key order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<FieldKey, Vec<Rule>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<FieldKey>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.entry(key.into()).or_default().extend(rules);
        self
    }

    pub fn sign_in() -> Self {
        Self::new()
            .field("email", [Rule::required(), Rule::email()])
            .field("password", [Rule::required()])
    }

    pub fn register() -> Self {
        Self::new()
            .field("email", [Rule::required(), Rule::email()])
            .field("password", [Rule::required(), Rule::min_length(8)])
    }

    pub fn rules(&self, key: &str) -> &[Rule] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.rules(key)
            .iter()
            .any(|rule| matches!(rule, Rule::Required { .. }))
    }

    /// Only the first failing rule of each field is reported.
    pub fn check(&self, fields: &FieldSet) -> ValidationResult {
        let mut errors = FieldErrors::new();
        for (key, rules) in &self.fields {
            let value = fields.value(key.as_str());
            if let Some(message) = rules.iter().find_map(|rule| rule.check(value)) {
                errors.insert(key.clone(), message);
            }
        }
        errors.into()
    }
}

impl Validator for Schema {
    fn validate<'a>(&'a self, fields: &'a FieldSet) -> BoxedValidationFuture<'a> {
        Box::pin(future::ready(self.check(fields)))
    }
}

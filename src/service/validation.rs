//! Model validation: the `Validator` seam and declarative per-field rules.

use crate::model::FieldErrors;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait Validator<M>: Send + Sync {
    /// Empty when the model is valid.
    fn validate(&self, model: &M) -> FieldErrors;
}

impl<M, F> Validator<M> for F
where
    F: Fn(&M) -> FieldErrors + Send + Sync,
{
    fn validate(&self, model: &M) -> FieldErrors {
        self(model)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub allowed: Option<Vec<Value>>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
}

impl ValidationRule {
    pub fn required() -> Self {
        ValidationRule {
            required: Some(true),
            ..Default::default()
        }
    }
}

/// Applies rules to the serialized (JSON) form of a model, in the order they were added.
/// Field names are the serialized names.
#[derive(Clone, Debug, Default)]
pub struct RuleValidator {
    rules: Vec<(String, ValidationRule, Option<Regex>)>,
}

impl RuleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An invalid pattern is reported as a field error when validating.
    pub fn rule(mut self, field: impl Into<String>, rule: ValidationRule) -> Self {
        let compiled = rule.pattern.as_deref().and_then(|p| Regex::new(p).ok());
        self.rules.push((field.into(), rule, compiled));
        self
    }

    pub fn validate_value(&self, value: &Value) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let Value::Object(body) = value else {
            errors.add("", "body must be a JSON object");
            return errors;
        };
        for (col, rule, compiled) in &self.rules {
            let val = body.get(col);
            if rule.required == Some(true) && (val.is_none() || val == Some(&Value::Null)) {
                errors.add(col.as_str(), format!("{} is required", col));
                continue;
            }
            if let Some(v) = val {
                validate_field(col, v, rule, compiled.as_ref(), &mut errors);
            }
        }
        errors
    }
}

impl<M: Serialize> Validator<M> for RuleValidator {
    fn validate(&self, model: &M) -> FieldErrors {
        match serde_json::to_value(model) {
            Ok(value) => self.validate_value(&value),
            Err(e) => FieldErrors::single("", format!("unserializable model: {}", e)),
        }
    }
}

fn validate_field(col: &str, v: &Value, rule: &ValidationRule, compiled: Option<&Regex>, errors: &mut FieldErrors) {
    if v.is_null() {
        return;
    }
    if let Some(format) = &rule.format {
        validate_format(col, v, format, errors);
    }
    if let (Some(max), Some(s)) = (rule.max_length, v.as_str()) {
        if s.chars().count() > max as usize {
            errors.add(col, format!("{} must be at most {} characters", col, max));
        }
    }
    if let (Some(min), Some(s)) = (rule.min_length, v.as_str()) {
        if s.chars().count() < min as usize {
            errors.add(col, format!("{} must be at least {} characters", col, min));
        }
    }
    if rule.pattern.is_some() {
        match (compiled, v.as_str()) {
            (None, _) => errors.add(col, format!("invalid pattern for {}", col)),
            (Some(re), Some(s)) if !re.is_match(s) => {
                errors.add(col, format!("{} does not match required pattern", col))
            }
            _ => {}
        }
    }
    if let Some(ref allowed) = rule.allowed {
        if !allowed.iter().any(|a| value_eq(v, a)) {
            errors.add(
                col,
                format!(
                    "{} must be one of: {:?}",
                    col,
                    allowed.iter().take(5).collect::<Vec<_>>()
                ),
            );
        }
    }
    if let (Some(min), Some(n)) = (rule.minimum, v.as_f64()) {
        if n < min {
            errors.add(col, format!("{} must be at least {}", col, min));
        }
    }
    if let (Some(max), Some(n)) = (rule.maximum, v.as_f64()) {
        if n > max {
            errors.add(col, format!("{} must be at most {}", col, max));
        }
    }
}

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(s), Value::String(t)) => s == t,
        (Value::Number(n), Value::Number(m)) => n.as_f64() == m.as_f64(),
        _ => a == b,
    }
}

fn validate_format(col: &str, v: &Value, format: &str, errors: &mut FieldErrors) {
    let Some(s) = v.as_str() else { return };
    match format.to_lowercase().as_str() {
        "email" => {
            if !s.contains('@') || s.len() < 3 {
                errors.add(col, format!("{} must be a valid email", col));
            }
        }
        "uuid" => {
            if uuid::Uuid::parse_str(s).is_err() {
                errors.add(col, format!("{} must be a valid UUID", col));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_every_violation_in_rule_order() {
        let validator = RuleValidator::new()
            .rule("title", ValidationRule { min_length: Some(3), max_length: Some(5), ..Default::default() })
            .rule("owner", ValidationRule::required())
            .rule("priority", ValidationRule { minimum: Some(1.0), maximum: Some(5.0), ..Default::default() })
            .rule("title", ValidationRule { pattern: Some("^[A-Z]".into()), ..Default::default() });

        let errors = validator.validate_value(&json!({ "title": "ab", "priority": 9 }));
        let fields: Vec<_> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["title", "owner", "priority"]);
        assert_eq!(errors.get("title").map(|m| m.len()), Some(2));
    }

    #[test]
    fn formats_and_allowed_values() {
        let validator = RuleValidator::new()
            .rule("email", ValidationRule { format: Some("email".into()), ..Default::default() })
            .rule("ref", ValidationRule { format: Some("uuid".into()), ..Default::default() })
            .rule("status", ValidationRule { allowed: Some(vec![json!("open"), json!("done")]), ..Default::default() });

        assert!(validator
            .validate_value(&json!({
                "email": "a@b.c",
                "ref": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "status": "open"
            }))
            .is_empty());

        let errors = validator.validate_value(&json!({ "email": "nope", "ref": "x", "status": "later" }));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn invalid_pattern_is_reported_not_panicked() {
        let validator = RuleValidator::new().rule("name", ValidationRule { pattern: Some("(".into()), ..Default::default() });
        let errors = validator.validate_value(&json!({ "name": "x" }));
        assert_eq!(errors.get("name"), Some(&["invalid pattern for name".to_string()][..]));
    }

    #[test]
    fn closures_are_validators() {
        let v = |n: &u32| if *n > 3 { FieldErrors::single("n", "too big") } else { FieldErrors::new() };
        assert!(Validator::validate(&v, &2).is_empty());
        assert!(!Validator::validate(&v, &4).is_empty());
    }
}

//! Request/response validation contracts.
//!
//! The router treats schema presence as "validate this" and absence as
//! "skip": a [`RouteDef`](crate::metadata::RouteDef) only carries the
//! schemas that were actually supplied. The [`Schema`] trait is the seam
//! to whatever validation library an application prefers; the crate does
//! not ship one.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Path into the validated value, e.g. `["user", "email"]`.
    pub path: Vec<String>,
    pub message: String,
}

impl FieldIssue {
    pub fn new<P, S>(path: P, message: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// The dotted field name used in human-readable messages.
    pub fn field(&self) -> String {
        if self.path.is_empty() {
            "value".to_string()
        } else {
            self.path.join(".")
        }
    }
}

/// Join issues into a single `field: message, field: message` line.
pub fn join_messages(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field(), issue.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A validator for one request or response value.
pub trait Schema: Send + Sync {
    fn validate(&self, value: &Value) -> Result<(), Vec<FieldIssue>>;
}

/// Wrap a closure as a [`Schema`].
pub fn schema_fn<F>(f: F) -> FnSchema<F>
where
    F: Fn(&Value) -> Result<(), Vec<FieldIssue>> + Send + Sync,
{
    FnSchema(f)
}

pub struct FnSchema<F>(F);

impl<F> Schema for FnSchema<F>
where
    F: Fn(&Value) -> Result<(), Vec<FieldIssue>> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), Vec<FieldIssue>> {
        (self.0)(value)
    }
}

/// The schemas supplied for one route. Absent entries are skipped
/// entirely during request handling.
#[derive(Clone, Default)]
pub struct SchemaSet {
    pub(crate) body: Option<Arc<dyn Schema>>,
    pub(crate) params: Option<Arc<dyn Schema>>,
    pub(crate) query: Option<Arc<dyn Schema>>,
    pub(crate) headers: Option<Arc<dyn Schema>>,
    pub(crate) response: Option<Arc<dyn Schema>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joined_message_format() {
        let issues = vec![
            FieldIssue::new(["email"], "Invalid email"),
            FieldIssue::new(["user", "age"], "Must be positive"),
        ];
        assert_eq!(
            join_messages(&issues),
            "email: Invalid email, user.age: Must be positive"
        );
    }

    #[test]
    fn empty_path_renders_as_value() {
        let issue = FieldIssue::new(Vec::<String>::new(), "Expected object");
        assert_eq!(issue.field(), "value");
    }

    #[test]
    fn schema_fn_adapts_closures() {
        let schema = schema_fn(|value| {
            if value.get("name").is_some() {
                Ok(())
            } else {
                Err(vec![FieldIssue::new(["name"], "Required")])
            }
        });

        assert!(schema.validate(&json!({"name": "x"})).is_ok());
        let issues = schema.validate(&json!({})).unwrap_err();
        assert_eq!(issues[0].field(), "name");
    }
}

//! Opaque report result payload.
//!
//! The shape is owned by the remote report generator. The client keeps the
//! raw JSON and exposes guarded accessors; every accessor returns `None` (or
//! an empty collection) when the field is missing or has an unexpected type.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ReportResult(pub Value);

/// A named complaint category with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintCount {
    pub component: String,
    pub count: u64,
}

impl ReportResult {
    /// Empty objects count as "no result yet".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn score(&self) -> Option<f64> {
        self.0.get("score").and_then(Value::as_f64)
    }

    #[must_use]
    pub fn recommendation(&self) -> Option<&str> {
        self.str_field("recommendation")
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.str_field("summary")
    }

    #[must_use]
    pub fn cost_from(&self) -> Option<f64> {
        self.0.get("cost_from").and_then(Value::as_f64)
    }

    #[must_use]
    pub fn cost_to(&self) -> Option<f64> {
        self.0.get("cost_to").and_then(Value::as_f64)
    }

    /// Known issues as display strings. Object entries use their `title`,
    /// `issue`, or `description` field, in that order.
    #[must_use]
    pub fn known_issues(&self) -> Vec<String> {
        self.labelled_list("known_issues", &["title", "issue", "description"])
    }

    #[must_use]
    pub fn recalls(&self) -> Vec<String> {
        self.labelled_list("recalls", &["component", "summary", "description", "title"])
    }

    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        self.labelled_list("suggestions", &["text", "suggestion", "title", "description"])
    }

    /// Complaint counts keyed by component, sorted by count descending.
    #[must_use]
    pub fn complaints(&self) -> Vec<ComplaintCount> {
        let Some(map) = self.0.get("complaints").and_then(Value::as_object) else {
            return Vec::new();
        };
        let mut out = map
            .iter()
            .filter_map(|(component, value)| {
                let count = value
                    .as_u64()
                    .or_else(|| value.get("count").and_then(Value::as_u64))?;
                Some(ComplaintCount {
                    component: component.clone(),
                    count,
                })
            })
            .collect::<Vec<_>>();
        out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.component.cmp(&b.component)));
        out
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    fn labelled_list(&self, key: &str, label_fields: &[&str]) -> Vec<String> {
        let Some(items) = self.0.get(key).and_then(Value::as_array) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => label_fields
                    .iter()
                    .find_map(|field| map.get(*field).and_then(Value::as_str))
                    .map(str::to_owned),
                _ => None,
            })
            .collect()
    }
}

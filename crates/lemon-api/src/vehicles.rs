//! Vehicle catalogue used to fill in report input.

use reqwest::Method;
use serde_json::Value;

use crate::{ApiClient, ApiError, http::check_response};

impl ApiClient {
    /// All known makes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails or the response holds no list.
    pub async fn vehicle_makes(&self) -> Result<Vec<String>, ApiError> {
        self.catalogue("vehicles/makes".to_string(), "makes").await
    }

    /// Models for one make.
    ///
    /// # Errors
    ///
    /// See [`Self::vehicle_makes`].
    pub async fn vehicle_models(&self, make: &str) -> Result<Vec<String>, ApiError> {
        let path = format!("vehicles/models/{}", urlencoding::encode(make));
        self.catalogue(path, "models").await
    }

    /// Model years available for one model.
    ///
    /// # Errors
    ///
    /// See [`Self::vehicle_makes`].
    pub async fn vehicle_years(&self, model: &str) -> Result<Vec<String>, ApiError> {
        let path = format!("vehicles/years/{}", urlencoding::encode(model));
        self.catalogue(path, "years").await
    }

    async fn catalogue(&self, path: String, key: &str) -> Result<Vec<String>, ApiError> {
        let url = self.url(&path);
        let resp = check_response(self.request(Method::GET, &url).send().await?).await?;
        let body: Value = resp.json().await?;
        names_from_value(&body, key)
            .ok_or_else(|| ApiError::Parse(format!("expected a list of {key}")))
    }
}

/// Accepts `["a", ...]`, `[{"id":1,"name":"a"}, ...]`, `[2019, ...]`, or any
/// of those wrapped as `{ key: [...] }` / `{ "data": [...] }`.
fn names_from_value(value: &Value, key: &str) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.get(key).or_else(|| map.get("data"))?.as_array()?,
        _ => return None,
    };
    Some(items.iter().filter_map(entry_name).collect())
}

fn entry_name(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => ["name", "year", "model", "make"]
            .iter()
            .find_map(|k| obj.get(*k))
            .and_then(entry_name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn wrapped_string_list() {
        let names = names_from_value(&json!({"makes": ["Honda", "Toyota"]}), "makes").unwrap();
        assert_eq!(names, vec!["Honda", "Toyota"]);
    }

    #[test]
    fn object_entries_use_name() {
        let names = names_from_value(
            &json!([{"id": 1, "name": "Civic"}, {"id": 2, "name": "Accord"}]),
            "models",
        )
        .unwrap();
        assert_eq!(names, vec!["Civic", "Accord"]);
    }

    #[test]
    fn numeric_years() {
        let names = names_from_value(&json!({"data": [{"year": 2019}, 2020]}), "years").unwrap();
        assert_eq!(names, vec!["2019", "2020"]);
    }

    #[test]
    fn non_list_is_none() {
        assert!(names_from_value(&json!({"error": "nope"}), "makes").is_none());
        assert!(names_from_value(&json!("Honda"), "makes").is_none());
    }
}

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Values typed into one open credential form, keyed by field key, in the
/// order the keys were first set.
///
/// `Debug` lists keys only so a payload can be logged without leaking
/// secrets.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    values: IndexMap<String, String>,
}

impl SubmissionPayload {
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Debug for SubmissionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionPayload")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubmissionPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_values() {
        let payload: SubmissionPayload = [("gemini_api_key", "abc123")].into_iter().collect();
        let debug = format!("{:?}", payload);
        assert!(debug.contains("gemini_api_key"));
        assert!(!debug.contains("abc123"), "payload values must not be printed");
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let payload: SubmissionPayload = [("openai_api_base", "https://example.openai.azure.com"), ("openai_api_key", "k")]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "openai_api_base": "https://example.openai.azure.com",
                "openai_api_key": "k",
            })
        );
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut payload: SubmissionPayload = [
            ("openai_api_key", "sk-test"),
            ("openai_organization", "org"),
            ("openai_api_base", "https://api.openai.com/v1"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            payload.keys().collect::<Vec<_>>(),
            vec!["openai_api_key", "openai_organization", "openai_api_base"]
        );

        payload.remove("openai_organization");
        payload.set("openai_organization", "other");
        assert_eq!(
            payload.keys().collect::<Vec<_>>(),
            vec!["openai_api_key", "openai_api_base", "openai_organization"]
        );
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"openai_api_key":"sk-test","openai_api_base":"https://api.openai.com/v1","openai_organization":"other"}"#
        );
    }

    #[test]
    fn test_set_replaces_and_remove() {
        let mut payload = SubmissionPayload::default();
        payload.set("api_key", "first");
        payload.set("api_key", "second");
        assert_eq!(payload.get("api_key"), Some("second"));
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.remove("api_key").as_deref(), Some("second"));
        assert!(payload.is_empty());
    }
}

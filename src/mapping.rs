//! The fixture mapping document.
//!
//! The mapping is sent verbatim as the index-creation body. It is shape-checked
//! once when loaded; the raw text is never re-serialized.

use crate::error::{HarnessError, Result};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Document types every fixture mapping must declare.
pub const FIXTURE_TYPES: [&str; 6] = [
    "tweet",
    "comment",
    "order",
    "doctype",
    "queries",
    "tweet-nosource",
];

const EMBEDDED_MAPPING: &str = include_str!("../fixtures/mapping.json");

static EMBEDDED: Lazy<std::result::Result<Mapping, String>> =
    Lazy::new(|| Mapping::parse(EMBEDDED_MAPPING).map_err(|e| e.to_string()));

#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    raw: Arc<str>,
    shards: u64,
    replicas: u64,
    types: Vec<String>,
}

impl Mapping {
    /// The mapping shipped with the crate.
    pub fn embedded() -> Result<Self> {
        (*EMBEDDED).clone().map_err(HarnessError::Mapping)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Mapping(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mapping = Self::parse(&raw)?;
        tracing::info!(
            "Loaded mapping from {}: shards={}, replicas={}, types={}",
            path.display(),
            mapping.shards,
            mapping.replicas,
            mapping.types.len()
        );
        Ok(mapping)
    }

    /// Validates `raw` and keeps it unchanged.
    pub fn parse(raw: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(raw)
            .map_err(|e| HarnessError::Mapping(format!("not valid JSON: {}", e)))?;
        let root = doc
            .as_object()
            .ok_or_else(|| HarnessError::Mapping("expected a JSON object".into()))?;

        let settings = root
            .get("settings")
            .and_then(Value::as_object)
            .ok_or_else(|| HarnessError::Mapping("missing settings object".into()))?;
        let setting = |name: &str| {
            settings.get(name).and_then(Value::as_u64).ok_or_else(|| {
                HarnessError::Mapping(format!("settings.{} must be a non-negative integer", name))
            })
        };
        let shards = setting("number_of_shards")?;
        let replicas = setting("number_of_replicas")?;
        if shards == 0 {
            return Err(HarnessError::Mapping(
                "settings.number_of_shards must be at least 1".into(),
            ));
        }

        let mappings = root
            .get("mappings")
            .and_then(Value::as_object)
            .ok_or_else(|| HarnessError::Mapping("missing mappings object".into()))?;
        let missing: Vec<&str> = FIXTURE_TYPES
            .iter()
            .copied()
            .filter(|t| !mappings.get(*t).is_some_and(Value::is_object))
            .collect();
        if !missing.is_empty() {
            return Err(HarnessError::Mapping(format!(
                "mappings must declare {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            raw: Arc::from(raw),
            shards,
            replicas,
            types: mappings.keys().cloned().collect(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn shards(&self) -> u64 {
        self.shards
    }

    pub fn replicas(&self) -> u64 {
        self.replicas
    }

    /// Declared document types, in document order.
    pub fn types(&self) -> &[String] {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_mapping_is_valid() {
        let mapping = Mapping::embedded().unwrap();

        assert_eq!(mapping.shards(), 1);
        assert_eq!(mapping.replicas(), 0);
        for t in FIXTURE_TYPES {
            assert!(mapping.types().iter().any(|d| d == t), "missing type {}", t);
        }
        // `_default_` comes first in the document.
        assert_eq!(mapping.types()[0], "_default_");
    }

    #[test]
    fn test_embedded_mapping_is_kept_verbatim() {
        let mapping = Mapping::embedded().unwrap();
        assert_eq!(mapping.as_str(), EMBEDDED_MAPPING);
        assert!(mapping.as_str().contains("\"_parent\": {"));
    }

    #[test]
    fn test_embedded_mapping_declares_special_field_types() {
        let doc: Value = serde_json::from_str(Mapping::embedded().unwrap().as_str()).unwrap();
        let mappings = &doc["mappings"];

        assert_eq!(mappings["comment"]["_parent"]["type"], "tweet");
        assert_eq!(mappings["queries"]["properties"]["query"]["type"], "percolator");
        assert_eq!(mappings["tweet"]["properties"]["location"]["type"], "geo_point");
        assert_eq!(
            mappings["tweet"]["properties"]["suggest_field"]["contexts"][0]["name"],
            "user_name"
        );
        assert_eq!(mappings["order"]["properties"]["time"]["format"], "YYYY-MM-dd");
        assert_eq!(mappings["tweet-nosource"]["_source"]["enabled"], false);
    }

    #[test]
    fn test_rejects_missing_types() {
        let err = Mapping::parse(
            r#"{"settings":{"number_of_shards":1,"number_of_replicas":0},"mappings":{"tweet":{}}}"#,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("comment"), "{}", msg);
        assert!(msg.contains("tweet-nosource"), "{}", msg);
        assert!(!msg.contains("tweet,"), "{}", msg);
    }

    #[test]
    fn test_rejects_bad_settings() {
        assert!(Mapping::parse(r#"{"mappings":{}}"#).is_err());
        assert!(Mapping::parse(
            r#"{"settings":{"number_of_shards":0,"number_of_replicas":0},"mappings":{}}"#
        )
        .is_err());
        assert!(Mapping::parse(
            r#"{"settings":{"number_of_shards":"one","number_of_replicas":0},"mappings":{}}"#
        )
        .is_err());
        assert!(Mapping::parse("[]").is_err());
        assert!(Mapping::parse("{").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EMBEDDED_MAPPING.as_bytes()).unwrap();

        let mapping = Mapping::from_file(file.path()).unwrap();
        assert_eq!(mapping, Mapping::embedded().unwrap());
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Mapping::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, HarnessError::Mapping(_)));
    }
}

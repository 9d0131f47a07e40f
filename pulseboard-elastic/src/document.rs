//! Conversion between nested documents and single-level dot-path records,
//! plus the cleaning/timestamping pass applied to documents before a write.

use crate::error::{ElasticError, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

/// A nested JSON document keyed by field name.
pub type Document = Map<String, Value>;

/// A single-level record whose keys are dot-joined paths into a [`Document`].
pub type FlatRecord = Map<String, Value>;

/// Options controlling [`flatten`].
#[derive(Debug, Clone, Default)]
pub struct FlattenOptions {
    /// Expand sequences containing objects into positional keys
    /// (`parent.0`, `parent.1`, ...). When off, sequences are opaque
    /// leaves. Sequences of scalars are never expanded.
    pub expand_list_objects: bool,
}

impl FlattenOptions {
    /// Expand object-bearing sequences positionally.
    pub fn expanding_list_objects() -> Self {
        Self {
            expand_list_objects: true,
        }
    }
}

/// Options controlling [`prepare`].
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Field that receives the wall-clock time when absent.
    pub timestamp_field: String,
    /// Inject the current time into `timestamp_field` when missing.
    pub inject_timestamp: bool,
    /// Try to reinterpret string values as JSON, keeping the string on
    /// parse failure.
    pub decode_strings: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            timestamp_field: "@timestamp".to_string(),
            inject_timestamp: true,
            decode_strings: true,
        }
    }
}

impl PrepareOptions {
    /// Options that leave documents untimestamped (partial updates).
    pub fn without_timestamp() -> Self {
        Self {
            inject_timestamp: false,
            ..Self::default()
        }
    }

    /// Set the timestamp field name.
    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    /// Enable or disable the string decode pass.
    pub fn with_decode_strings(mut self, decode: bool) -> Self {
        self.decode_strings = decode;
        self
    }
}

/// Flatten a nested document into a record keyed by dot-joined paths.
///
/// The traversal is depth-first and preserves sibling key order. Null
/// leaves are dropped; a flat record never carries a missing-marker.
pub fn flatten(document: &Document, options: &FlattenOptions) -> FlatRecord {
    let mut flat = FlatRecord::new();
    flatten_into(None, document, options, &mut flat);
    flat
}

fn flatten_into(
    prefix: Option<&str>,
    document: &Document,
    options: &FlattenOptions,
    out: &mut FlatRecord,
) {
    for (key, value) in document {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        flatten_value(&path, value, options, out);
    }
}

fn flatten_value(path: &str, value: &Value, options: &FlattenOptions, out: &mut FlatRecord) {
    match value {
        Value::Object(child) => flatten_into(Some(path), child, options, out),
        Value::Array(items)
            if options.expand_list_objects && items.iter().any(Value::is_object) =>
        {
            for (i, item) in items.iter().enumerate() {
                flatten_value(&format!("{path}.{i}"), item, options, out);
            }
        }
        Value::Null => {}
        leaf => {
            out.insert(path.to_string(), leaf.clone());
        }
    }
}

/// Rebuild a nested document from a flat dot-path record.
///
/// Fails with [`ElasticError::StructuralConflict`] when two keys imply
/// incompatible structure at the same path prefix, e.g. `a` as a scalar
/// and `a.b` continuing past it.
pub fn unflatten(flat: &FlatRecord) -> Result<Document> {
    let mut root = Document::new();

    for (key, value) in flat {
        let segments: Vec<&str> = key.split('.').collect();
        let mut current = &mut root;

        for (depth, segment) in segments[..segments.len() - 1].iter().enumerate() {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match entry {
                Value::Object(child) => child,
                _ => {
                    return Err(ElasticError::StructuralConflict {
                        path: segments[..=depth].join("."),
                    });
                }
            };
        }

        let leaf = segments[segments.len() - 1];
        if matches!(current.get(leaf), Some(Value::Object(_))) {
            return Err(ElasticError::StructuralConflict {
                path: key.clone(),
            });
        }
        current.insert(leaf.to_string(), value.clone());
    }

    Ok(root)
}

/// Clean a flat record and rebuild it as a nested document, ready for a
/// single-document or bulk write.
///
/// Values that decode as JSON replace their string form (when
/// `decode_strings` is on), missing-markers are dropped, the timestamp
/// field is injected per [`PrepareOptions`], and the result is
/// unflattened.
pub fn prepare(record: &FlatRecord, options: &PrepareOptions) -> Result<Document> {
    let mut cleaned = FlatRecord::new();

    for (key, value) in record {
        let mut value = value.clone();
        if options.decode_strings
            && let Some(decoded) = decode_leaf(&value)
        {
            value = decoded;
        }
        if !is_missing(&value) {
            cleaned.insert(key.clone(), value);
        }
    }

    if options.inject_timestamp && !cleaned.contains_key(&options.timestamp_field) {
        cleaned.insert(
            options.timestamp_field.clone(),
            Value::String(now_iso()),
        );
    }

    unflatten(&cleaned)
}

/// Current UTC wall-clock as an RFC 3339 string.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// The decode pass: a string leaf that parses as JSON is replaced by the
// parsed value; anything else stays as-is.
fn decode_leaf(value: &Value) -> Option<Value> {
    let Value::String(text) = value else {
        return None;
    };
    serde_json::from_str(text).ok()
}

// Nulls and empty strings stand in for staged rows' NaN/empty cells.
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_flatten_nested() {
        let doc = as_map(json!({
            "user": { "name": "lena", "labels": { "customer_id": 7 } },
            "steps": [1, 2, 3]
        }));

        let flat = flatten(&doc, &FlattenOptions::default());

        assert_eq!(flat["user.name"], json!("lena"));
        assert_eq!(flat["user.labels.customer_id"], json!(7));
        assert_eq!(flat["steps"], json!([1, 2, 3]));
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn test_flatten_preserves_key_order() {
        let doc = as_map(json!({ "b": { "z": 1, "a": 2 }, "a": 3 }));
        let flat = flatten(&doc, &FlattenOptions::default());

        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b.z", "b.a", "a"]);
    }

    #[test]
    fn test_flatten_idempotent_on_flat_input() {
        let doc = as_map(json!({ "a": 1, "b": "two", "c": [1, 2] }));
        let flat = flatten(&doc, &FlattenOptions::default());
        assert_eq!(flat, doc);
    }

    #[test]
    fn test_flatten_drops_nulls() {
        let doc = as_map(json!({ "a": null, "b": { "c": null, "d": 1 } }));
        let flat = flatten(&doc, &FlattenOptions::default());

        assert_eq!(flat, as_map(json!({ "b.d": 1 })));
    }

    #[test]
    fn test_flatten_list_of_objects_is_opaque_by_default() {
        let doc = as_map(json!({ "slots": [{ "hr": 60 }, { "hr": 61 }] }));
        let flat = flatten(&doc, &FlattenOptions::default());

        assert_eq!(flat["slots"], json!([{ "hr": 60 }, { "hr": 61 }]));
    }

    #[test]
    fn test_flatten_expands_list_objects_when_enabled() {
        let doc = as_map(json!({ "slots": [{ "hr": 60 }, { "hr": 61 }], "ids": [1, 2] }));
        let flat = flatten(&doc, &FlattenOptions::expanding_list_objects());

        assert_eq!(flat["slots.0.hr"], json!(60));
        assert_eq!(flat["slots.1.hr"], json!(61));
        // scalar sequences stay opaque
        assert_eq!(flat["ids"], json!([1, 2]));
    }

    #[test]
    fn test_unflatten_round_trip() {
        let doc = as_map(json!({
            "activity": { "total_steps": 9000, "detail": { "walking": 7000 } },
            "heart_rate": { "avg": 61.5 },
            "tags": ["wrist", "night"],
            "date": "2023-04-01"
        }));

        let flat = flatten(&doc, &FlattenOptions::default());
        let rebuilt = unflatten(&flat).unwrap();

        assert_eq!(Value::Object(rebuilt), Value::Object(doc));
    }

    #[test]
    fn test_unflatten_conflict_scalar_then_deeper() {
        let flat = as_map(json!({ "a": 1, "a.b": 2 }));
        let err = unflatten(&flat).unwrap_err();

        match err {
            ElasticError::StructuralConflict { path } => assert_eq!(path, "a"),
            other => panic!("expected StructuralConflict, got {other}"),
        }
    }

    #[test]
    fn test_unflatten_conflict_deeper_then_scalar() {
        let flat = as_map(json!({ "a.b": 2, "a": 1 }));
        let err = unflatten(&flat).unwrap_err();

        match err {
            ElasticError::StructuralConflict { path } => assert_eq!(path, "a"),
            other => panic!("expected StructuralConflict, got {other}"),
        }
    }

    #[test]
    fn test_unflatten_sibling_order_follows_input() {
        let flat = as_map(json!({ "a.y": 1, "a.x": 2, "b": 3 }));
        let doc = unflatten(&flat).unwrap();

        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
        let inner: Vec<&str> = doc["a"].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(inner, vec!["y", "x"]);
    }

    #[test]
    fn test_prepare_injects_timestamp() {
        let record = as_map(json!({ "hr": 61 }));
        let doc = prepare(&record, &PrepareOptions::default()).unwrap();

        let stamp = doc["@timestamp"].as_str().unwrap();
        chrono::DateTime::parse_from_rfc3339(stamp).unwrap();
    }

    #[test]
    fn test_prepare_keeps_existing_timestamp() {
        let record = as_map(json!({ "@timestamp": "2023-04-01T00:00:00Z", "hr": 61 }));
        let doc = prepare(&record, &PrepareOptions::default()).unwrap();

        assert_eq!(doc["@timestamp"], json!("2023-04-01T00:00:00Z"));
    }

    #[test]
    fn test_prepare_without_timestamp() {
        let record = as_map(json!({ "hr": 61 }));
        let doc = prepare(&record, &PrepareOptions::without_timestamp()).unwrap();

        assert!(!doc.contains_key("@timestamp"));
    }

    #[test]
    fn test_prepare_decodes_json_strings() {
        let record = as_map(json!({
            "list": "[1, 2]",
            "count": "5",
            "note": "not json",
            "gone": "null"
        }));
        let doc = prepare(&record, &PrepareOptions::without_timestamp()).unwrap();

        assert_eq!(doc["list"], json!([1, 2]));
        assert_eq!(doc["count"], json!(5));
        assert_eq!(doc["note"], json!("not json"));
        assert!(!doc.contains_key("gone"));
    }

    #[test]
    fn test_prepare_keeps_strings_when_decoding_disabled() {
        let record = as_map(json!({ "count": "5" }));
        let options = PrepareOptions::without_timestamp().with_decode_strings(false);
        let doc = prepare(&record, &options).unwrap();

        assert_eq!(doc["count"], json!("5"));
    }

    #[test]
    fn test_prepare_drops_empty_cells() {
        let record = as_map(json!({ "a": null, "b": "", "c": 1 }));
        let doc = prepare(&record, &PrepareOptions::without_timestamp()).unwrap();

        assert_eq!(Value::Object(doc), json!({ "c": 1 }));
    }

    #[test]
    fn test_prepare_unflattens_dotted_columns() {
        let record = as_map(json!({ "labels.customer_id": 7, "hr": 61 }));
        let doc = prepare(&record, &PrepareOptions::without_timestamp()).unwrap();

        assert_eq!(doc["labels"], json!({ "customer_id": 7 }));
        assert_eq!(doc["hr"], json!(61));
    }

    #[test]
    fn test_prepare_surfaces_conflicts() {
        let record = as_map(json!({ "a": 1, "a.b": 2 }));
        let err = prepare(&record, &PrepareOptions::without_timestamp()).unwrap_err();
        assert!(matches!(err, ElasticError::StructuralConflict { .. }));
    }
}

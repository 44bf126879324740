//! Documents and dot-path access
//!
//! A path such as `person.name` descends one mapping per segment. A segment
//! made of digits also indexes into an array (`tags.0`).

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult};

/// A stored record: field names mapped to JSON values
pub type Document = Map<String, Value>;

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Resolve a dot path; `None` when any segment is missing
pub fn reach<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next().filter(|s| !s.is_empty())?;
    let mut current = document.get(first)?;
    for segment in segments {
        current = step(current, segment)?;
    }
    Some(current)
}

/// Set the value at a dot path, creating intermediate mappings.
///
/// Returns `false` when an intermediate value exists but is not a mapping.
pub fn set_path(document: &mut Document, path: &str, value: Value) -> bool {
    let mut current = document;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return true;
        }
        let next = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match next {
            Value::Object(fields) => current = fields,
            _ => return false,
        }
    }
    false
}

/// Remove the value at a dot path, returning it
pub fn remove_path(document: &mut Document, path: &str) -> Option<Value> {
    match path.split_once('.') {
        None => document.remove(path),
        Some((head, rest)) => match document.get_mut(head)? {
            Value::Object(fields) => remove_path(fields, rest),
            _ => None,
        },
    }
}

/// Serialize a value into a document; the value must serialize to a mapping
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> ModelResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(ModelError::Serialization(format!(
            "expected a value serializing to an object, got {}",
            other
        ))),
    }
}

/// Deserialize a typed value from a document
pub fn from_document<T: DeserializeOwned>(document: Document) -> ModelResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_reach_nested_paths() {
        let document = doc(json!({ "person": { "name": "Sam", "tags": ["a", "b"] } }));

        assert_eq!(reach(&document, "person.name"), Some(&json!("Sam")));
        assert_eq!(reach(&document, "person.tags.1"), Some(&json!("b")));
        assert_eq!(reach(&document, "person.age"), None);
        assert_eq!(reach(&document, "person.name.first"), None);
        assert_eq!(reach(&document, "person.tags.x"), None);
        assert_eq!(reach(&document, ""), None);
    }

    #[test]
    fn test_set_path_creates_mappings() {
        let mut document = Document::new();
        assert!(set_path(&mut document, "person.name", json!("Amy")));
        assert_eq!(Value::Object(document.clone()), json!({ "person": { "name": "Amy" } }));

        document.insert("flat".into(), json!(1));
        assert!(!set_path(&mut document, "flat.inner", json!(2)));
    }

    #[test]
    fn test_remove_path() {
        let mut document = doc(json!({ "person": { "name": "Amy", "age": 30 } }));
        assert_eq!(remove_path(&mut document, "person.age"), Some(json!(30)));
        assert_eq!(remove_path(&mut document, "person.missing"), None);
        assert_eq!(Value::Object(document), json!({ "person": { "name": "Amy" } }));
    }

    #[test]
    fn test_typed_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Person {
            name: String,
            age: u32,
        }

        let document = to_document(&Person { name: "Kathy".into(), age: 40 }).unwrap();
        assert_eq!(document.get("age"), Some(&json!(40)));
        let person: Person = from_document(document).unwrap();
        assert_eq!(person.name, "Kathy");

        assert!(matches!(to_document(&5), Err(ModelError::Serialization(_))));
    }
}

//! Filter matching, projection and update operators for in-process
//! collections
//!
//! Filters are field-path equalities. An array field also matches when it
//! contains the expected value, and a `null` expectation matches a missing
//! field. Updates support `$set`, `$unset` and `$inc`.

use serde_json::{Map, Number, Value};

use crate::collection::{StoreError, StoreResult};
use crate::document::{reach, remove_path, set_path, Document};
use crate::model::identifier::ID_FIELD;

/// Whether `document` satisfies every equality in `filter`
pub fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(path, expected)| match reach(document, path) {
        Some(actual) if actual == expected => true,
        Some(Value::Array(items)) => items.contains(expected),
        Some(_) => false,
        None => expected.is_null(),
    })
}

fn projection_flag(path: &str, flag: &Value) -> StoreResult<bool> {
    match flag {
        Value::Bool(include) => Ok(*include),
        Value::Number(n) => Ok(n.as_f64().map_or(false, |f| f != 0.0)),
        other => Err(StoreError::InvalidProjection(format!(
            "unsupported projection value {} for {}",
            other, path
        ))),
    }
}

/// Apply an inclusion or exclusion projection
pub fn project(document: &Document, projection: &Document) -> StoreResult<Document> {
    if projection.is_empty() {
        return Ok(document.clone());
    }

    let mut include_id = true;
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    for (path, flag) in projection {
        let include = projection_flag(path, flag)?;
        if path == ID_FIELD {
            include_id = include;
        } else if include {
            included.push(path.as_str());
        } else {
            excluded.push(path.as_str());
        }
    }

    if !included.is_empty() && !excluded.is_empty() {
        return Err(StoreError::InvalidProjection(
            "cannot mix inclusion and exclusion".to_string(),
        ));
    }

    let mut projected = if included.is_empty() {
        let mut projected = document.clone();
        for path in excluded {
            remove_path(&mut projected, path);
        }
        projected
    } else {
        let mut projected = Document::new();
        if let Some(id) = document.get(ID_FIELD) {
            projected.insert(ID_FIELD.to_string(), id.clone());
        }
        for path in included {
            if let Some(value) = reach(document, path) {
                set_path(&mut projected, path, value.clone());
            }
        }
        projected
    };

    if !include_id {
        projected.remove(ID_FIELD);
    }
    Ok(projected)
}

fn operator_fields<'a>(operator: &str, argument: &'a Value) -> StoreResult<&'a Map<String, Value>> {
    argument
        .as_object()
        .ok_or_else(|| StoreError::InvalidUpdate(format!("{} expects a document", operator)))
}

fn guard_id(path: &str) -> StoreResult<()> {
    if path == ID_FIELD || path.starts_with("_id.") {
        Err(StoreError::InvalidUpdate(
            "performing an update on the path '_id' would modify the immutable field '_id'".to_string(),
        ))
    } else {
        Ok(())
    }
}

fn add(current: &Number, delta: &Number) -> Option<Number> {
    match (current.as_i64(), delta.as_i64()) {
        (Some(a), Some(b)) => a.checked_add(b).map(Number::from),
        _ => Number::from_f64(current.as_f64()? + delta.as_f64()?),
    }
}

/// Whether every top-level key of `update` is an operator
pub fn is_operator_update(update: &Document) -> bool {
    !update.is_empty() && update.keys().all(|key| key.starts_with('$'))
}

/// Apply update operators in place; returns whether the document changed
pub fn apply_update(document: &mut Document, update: &Document) -> StoreResult<bool> {
    if !is_operator_update(update) {
        return Err(StoreError::InvalidUpdate(
            "update document requires atomic operators".to_string(),
        ));
    }

    let before = document.clone();
    for (operator, argument) in update {
        let fields = operator_fields(operator, argument)?;
        match operator.as_str() {
            "$set" => {
                for (path, value) in fields {
                    guard_id(path)?;
                    if !set_path(document, path, value.clone()) {
                        return Err(StoreError::InvalidUpdate(format!(
                            "cannot create field in non-object at path {}",
                            path
                        )));
                    }
                }
            }
            "$unset" => {
                for path in fields.keys() {
                    guard_id(path)?;
                    remove_path(document, path);
                }
            }
            "$inc" => {
                for (path, delta) in fields {
                    guard_id(path)?;
                    let Value::Number(delta) = delta else {
                        return Err(StoreError::InvalidUpdate(format!(
                            "cannot increment with non-numeric argument at {}",
                            path
                        )));
                    };
                    let next = match reach(document, path) {
                        None => Some(delta.clone()),
                        Some(Value::Number(current)) => add(current, delta),
                        Some(_) => {
                            return Err(StoreError::InvalidUpdate(format!(
                                "cannot apply $inc to a non-numeric value at {}",
                                path
                            )))
                        }
                    };
                    let next = next.ok_or_else(|| StoreError::InvalidUpdate(format!("$inc overflow at {}", path)))?;
                    if !set_path(document, path, Value::Number(next)) {
                        return Err(StoreError::InvalidUpdate(format!(
                            "cannot create field in non-object at path {}",
                            path
                        )));
                    }
                }
            }
            other => {
                return Err(StoreError::InvalidUpdate(format!("unknown update operator {}", other)));
            }
        }
    }
    Ok(*document != before)
}

/// The equality fields of a filter, as the seed of an upserted document
pub fn upsert_seed(filter: &Document) -> Document {
    let mut seed = Document::new();
    for (path, value) in filter {
        if !path.starts_with('$') {
            set_path(&mut seed, path, value.clone());
        }
    }
    seed
}

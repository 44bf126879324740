//! Identifier derivation from declared field paths
//!
//! A model may declare an ordered list of dot paths ("rids"). The values found
//! at those paths are joined into a deterministic, lower-cased identifier that
//! becomes the document's `_id` when it is first written.

use serde_json::{Number, Value};

use crate::document::{reach, Document};

/// Separator placed between identifier parts
pub const ID_DIVIDER: &str = "::";

/// Field holding a document's identifier
pub const ID_FIELD: &str = "_id";

/// Derive an identifier from the values at `paths`, in order.
///
/// Strings contribute their trimmed text and numbers their decimal text.
/// Missing fields and values of any other kind contribute nothing. An empty
/// string means nothing could be derived.
///
/// ```
/// use docmodel::model::identifier::derive_identifier;
/// use serde_json::json;
///
/// let document = json!({ "person": { "name": " Sam ", "age": 21 } });
/// let id = derive_identifier(document.as_object().unwrap(), &["person.name", "person.age"]);
/// assert_eq!(id, "sam::21");
/// ```
pub fn derive_identifier<S: AsRef<str>>(document: &Document, paths: &[S]) -> String {
    let mut identifier = String::new();
    for path in paths {
        let part = match reach(document, path.as_ref()) {
            Some(Value::String(text)) => text.trim_matches(is_trimmed).to_string(),
            Some(Value::Number(number)) => number_text(number),
            _ => continue,
        };
        identifier.push_str(&part);
        identifier.push_str(ID_DIVIDER);
    }

    if identifier.ends_with(ID_DIVIDER) {
        identifier.truncate(identifier.len() - ID_DIVIDER.len());
    }
    identifier.to_lowercase()
}

/// Whitespace plus the byte order mark
fn is_trimmed(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Integral floats are written without a fraction, so `21.0` reads `21`
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        _ => number.to_string(),
    }
}

/// Like [`derive_identifier`], with `None` in place of an empty identifier
pub fn try_derive_identifier<S: AsRef<str>>(document: &Document, paths: &[S]) -> Option<String> {
    let identifier = derive_identifier(document, paths);
    if identifier.is_empty() {
        None
    } else {
        Some(identifier)
    }
}

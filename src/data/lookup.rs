//! Safe navigation over loosely-structured API payloads.
//!
//! Every helper returns `None` (or an empty iterator) instead of failing when
//! a key is missing or an intermediate value has the wrong shape.

use serde_json::Value;

/// Looks up `key` in `data` if it is an object.
pub fn get_by_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.as_object()?.get(key)
}

/// Same as [`get_by_key`], but starting from an optional section.
pub fn get_in<'a>(section: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    section.and_then(|data| get_by_key(data, key))
}

/// Follows `path` one key at a time, never indexing into arrays.
pub fn get_by_path<'a>(data: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(data, |current, key| get_by_key(current, key))
}

/// Returns `data[key]` if it is an object.
pub fn get_object<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    get_by_key(data, key).filter(|value| value.is_object())
}

/// Iterates the entries of the array at `section[key]`, if there is one.
pub fn entries<'a>(section: Option<&'a Value>, key: &'static str) -> impl Iterator<Item = &'a Value> {
    get_in(section, key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

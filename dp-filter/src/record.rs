//! Field access on candidate records.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A candidate record whose fields can be looked up by name.
pub trait Record {
    fn field(&self, name: &str) -> Option<&Value>;
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        lookup(self, name)
    }
}

/// Non-object values have no fields.
impl Record for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| lookup(map, name))
    }
}

impl<S: BuildHasher> Record for HashMap<String, Value, S> {
    fn field(&self, name: &str) -> Option<&Value> {
        lookup_with(|key| self.get(key), name)
    }
}

impl Record for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        lookup_with(|key| self.get(key), name)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    lookup_with(|key| map.get(key), name)
}

// Exact key first; otherwise treat '.' as a path separator into nested objects.
fn lookup_with<'a>(get: impl Fn(&str) -> Option<&'a Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = get(name) {
        return Some(value);
    }
    let (first_part, rest_key) = name.split_once('.')?;
    get(first_part)?
        .as_object()
        .and_then(|nested| lookup(nested, rest_key))
}

//! Owned VDF key-value tree shared by the text and binary codecs.
//!
//! Text files (`loginusers.vdf`, `config.vdf`, `libraryfolders.vdf`,
//! `appmanifest_*.acf`) only produce strings and objects. The binary
//! `shortcuts.vdf` adds typed numbers.

pub mod binary;
pub mod text;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single VDF value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int32(i32),
    Float32(f32),
    Pointer(i32),
    Color(i32),
    UInt64(u64),
    Int64(i64),
    Obj(Object),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_obj(&self) -> Option<&Object> {
        match self {
            Value::Obj(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_obj_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Obj(o) => Some(o),
            _ => None,
        }
    }

    /// Numeric view of the value. Text VDF stores numbers as strings, so
    /// numeric strings are accepted too.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) | Value::Pointer(v) | Value::Color(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Float32(_) | Value::Obj(_) => None,
        }
    }

    /// Unsigned 64-bit view, used for sizes and Steam64 IDs.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt64(v) => Some(*v),
            Value::Str(s) => s.trim().parse().ok(),
            other => other.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// Reinterprets an int32 as its unsigned bit pattern (shortcut app IDs
    /// have the high bit set and are stored signed).
    pub fn as_u32_bits(&self) -> Option<u32> {
        match self {
            Value::Int32(v) => Some(*v as u32),
            Value::Str(s) => s.trim().parse::<u32>().ok(),
            other => other.as_i64().and_then(|v| u32::try_from(v).ok()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_i64().map(|v| v != 0)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Obj(o)
    }
}

/// Insertion-ordered VDF object. Duplicate keys are allowed, as in the
/// files Steam writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    entries: Vec<(String, Value)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the first value stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the first value whose key matches `key` ignoring ASCII case.
    pub fn get_ci(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Walks nested objects with case-insensitive keys.
    pub fn get_path_ci(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut obj = self;
        for key in parents {
            obj = obj.get_ci(key)?.as_obj()?;
        }
        obj.get_ci(last)
    }

    pub fn get_str_ci(&self, key: &str) -> Option<&str> {
        self.get_ci(key).and_then(Value::as_str)
    }

    pub fn get_obj_ci(&self, key: &str) -> Option<&Object> {
        self.get_ci(key).and_then(Value::as_obj)
    }

    /// Replaces the first entry under `key`, or appends one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Appends an entry without checking for an existing key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Removes and returns the first entry under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A complete VDF document: one named root object.
#[derive(Debug, Clone, PartialEq)]
pub struct Vdf {
    pub key: String,
    pub root: Object,
}

impl Vdf {
    pub fn new(key: impl Into<String>, root: Object) -> Self {
        Self {
            key: key.into(),
            root,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int32(v) | Value::Pointer(v) | Value::Color(v) => serializer.serialize_i32(*v),
            Value::Float32(v) => serializer.serialize_f32(*v),
            Value::UInt64(v) => serializer.serialize_u64(*v),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::Obj(o) => o.serialize(serializer),
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for Vdf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.root)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Object {
        let mut inner = Object::new();
        inner.insert("SteamID", "76561197960287930");
        let mut root = Object::new();
        root.insert("Accounts", inner);
        root.insert("name", "Half-Life");
        root
    }

    #[test]
    fn get_ci_ignores_case() {
        let root = sample();
        assert_eq!(root.get_str_ci("NAME"), Some("Half-Life"));
        assert!(root.get("NAME").is_none());
    }

    #[test]
    fn get_path_walks_objects() {
        let root = sample();
        let v = root.get_path_ci(&["accounts", "steamid"]).unwrap();
        assert_eq!(v.as_u64(), Some(76561197960287930));
        assert!(root.get_path_ci(&["name", "x"]).is_none());
        assert!(root.get_path_ci(&[]).is_none());
    }

    #[test]
    fn insert_replaces_and_push_duplicates() {
        let mut obj = Object::new();
        obj.insert("a", "1");
        obj.insert("a", "2");
        assert_eq!(obj.len(), 1);
        assert_eq!(obj.get_str_ci("a"), Some("2"));

        obj.push("a", "3");
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get_str_ci("a"), Some("2"));

        assert_eq!(obj.remove("a"), Some(Value::from("2")));
        assert_eq!(obj.get_str_ci("a"), Some("3"));
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Int32(-1).as_u32_bits(), Some(u32::MAX));
        assert_eq!(Value::from("42").as_i64(), Some(42));
        assert_eq!(Value::from("1").as_bool(), Some(true));
        assert_eq!(Value::Int32(0).as_bool(), Some(false));
        assert_eq!(Value::from("abc").as_i64(), None);
        assert_eq!(Value::Float32(1.5).as_i64(), None);
    }

    #[test]
    fn serializes_to_json_in_order() {
        let vdf = Vdf::new("AppState", sample());
        let json = serde_json::to_string(&vdf).unwrap();
        assert_eq!(
            json,
            r#"{"AppState":{"Accounts":{"SteamID":"76561197960287930"},"name":"Half-Life"}}"#
        );
    }

    #[test]
    fn serializes_typed_numbers() {
        let mut obj = Object::new();
        obj.insert("appid", Value::Int32(7));
        obj.insert("big", Value::UInt64(1 << 40));
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["appid"], 7);
        assert_eq!(json["big"], 1u64 << 40);
    }
}

//! Schema-less formulary record.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Field holding the plan sponsor's organization name.
pub const ORGANIZATION_NAME: &str = "organization_name";

/// Field holding the two-letter state code.
pub const STATE: &str = "state";

/// One flat record returned by the dataset API.
///
/// The shape is whatever the upstream response carries. Values are text or
/// null; scalar numbers and booleans are kept as their textual form, nested
/// arrays and objects as compact JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record(BTreeMap<String, Option<String>>);

/// One batch of records returned by a single API call.
pub type Page = Vec<Record>;

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text value of a field. `None` when the field is missing or null.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.as_deref())
    }

    /// Returns true if the field is present, even when null.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Set a field, returning the previous value.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        self.0.insert(field.into(), value)
    }

    /// Field names in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(field, value)` pairs in sorted field order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Option<String>> {
        self.0.iter()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `organization_name` field.
    #[must_use]
    pub fn organization_name(&self) -> Option<&str> {
        self.get(ORGANIZATION_NAME)
    }

    /// The `state` field.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.get(STATE)
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map.into_iter().map(|(k, v)| (k, value_to_text(v))).collect())
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), Some(v.into()))).collect())
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Option<String>);
    type IntoIter = btree_map::Iter<'a, String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from)
    }
}

// ABOUTME: Output records for scraped counties: FieldEntry, ParameterBlock and CountyRecord.
// ABOUTME: Entries and blocks serialize as single-key JSON objects to keep the published document shape.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One label/value pair from a two-cell table row, e.g. `{"2020": "1,147,532"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub label: String,
    pub value: String,
}

impl FieldEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Fields grouped under the header of one table body, e.g.
/// `{"Population": [{"2020": "1,147,532"}]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBlock {
    pub parameter: String,
    pub fields: Vec<FieldEntry>,
}

impl ParameterBlock {
    pub fn new(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            fields: Vec::new(),
        }
    }

    /// First value recorded under `label`, if any.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

/// Everything scraped for one (state, county) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyRecord {
    pub state: String,
    pub county: String,
    pub result_url: String,
    pub data: Vec<ParameterBlock>,
}

impl CountyRecord {
    /// Returns true if no parameter blocks were extracted.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First block with the given parameter name.
    pub fn block(&self, parameter: &str) -> Option<&ParameterBlock> {
        self.data.iter().find(|b| b.parameter == parameter)
    }

    /// Total number of field entries across all blocks.
    pub fn field_count(&self) -> usize {
        self.data.iter().map(|b| b.fields.len()).sum()
    }
}

impl Serialize for FieldEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.label, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, String>::deserialize(deserializer)?;
        let (label, value) = single_entry::<_, D::Error>(map, "field entry")?;
        Ok(FieldEntry { label, value })
    }
}

impl Serialize for ParameterBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.parameter, &self.fields)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParameterBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, Vec<FieldEntry>>::deserialize(deserializer)?;
        let (parameter, fields) = single_entry::<_, D::Error>(map, "parameter block")?;
        Ok(ParameterBlock { parameter, fields })
    }
}

fn single_entry<V, E: de::Error>(map: BTreeMap<String, V>, what: &str) -> Result<(String, V), E> {
    let len = map.len();
    let mut entries = map.into_iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(E::custom(SingleEntryError { what, len })),
    }
}

struct SingleEntryError<'a> {
    what: &'a str,
    len: usize,
}

impl fmt::Display for SingleEntryError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected a {} with exactly one key, found {} keys",
            self.what, self.len
        )
    }
}

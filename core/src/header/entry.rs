use crate::prelude::{PolarError, PolarResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Typed scalar carried by one header line.
///
/// Deserialization is untagged, so the variant order doubles as the coercion
/// order: an integral JSON number must land on `Int` before `Float` is tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl HeaderValue {
    /// Integral view of the value, accepting floats without a fraction.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Int(value) => Some(*value),
            HeaderValue::Float(value) if value.fract() == 0.0 => Some(*value as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Int(value) => Some(*value as f64),
            HeaderValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Int(value) => write!(f, "{}", value),
            HeaderValue::Float(value) => write!(f, "{}", value),
            HeaderValue::Bool(value) => write!(f, "{}", value),
            HeaderValue::Text(value) => f.write_str(value),
        }
    }
}

/// Value plus the trailing `CC` description of one header line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub value: HeaderValue,
    pub description: String,
}

impl HeaderEntry {
    pub fn new(value: HeaderValue, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }
}

/// Ordered key/entry mapping parsed from the capture header.
///
/// Lookups are case-insensitive; insertion order is preserved so the embedded
/// metadata payload reads in the same order as the capture file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    entries: Vec<(String, HeaderEntry)>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any existing entry under the same key.
    pub fn insert(&mut self, key: impl Into<String>, entry: HeaderEntry) {
        let key = key.into();
        if let Some(slot) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            slot.1 = entry;
        } else {
            self.entries.push((key, entry));
        }
    }

    pub fn entry(&self, key: &str) -> Option<&HeaderEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, entry)| entry)
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entry(key).map(|entry| &entry.value)
    }

    pub fn describe(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|entry| entry.description.as_str())
    }

    /// Numeric field required by the decode or render stages.
    pub fn require_i64(&self, key: &str) -> PolarResult<i64> {
        self.get(key)
            .and_then(HeaderValue::as_i64)
            .ok_or_else(|| PolarError::MissingField(key.to_string()))
    }

    pub fn require_f64(&self, key: &str) -> PolarResult<f64> {
        self.get(key)
            .and_then(HeaderValue::as_f64)
            .ok_or_else(|| PolarError::MissingField(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry))
    }
}

impl Serialize for Header {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Header {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HeaderVisitor;

        impl<'de> Visitor<'de> for HeaderVisitor {
            type Value = Header;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header entries")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Header, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut header = Header::new();
                while let Some((key, entry)) = access.next_entry::<String, HeaderEntry>()? {
                    header.insert(key, entry);
                }
                Ok(header)
            }
        }

        deserializer.deserialize_map(HeaderVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        let mut header = Header::new();
        header.insert(
            "FIFO",
            HeaderEntry::new(HeaderValue::Int(512), "Number of samples"),
        );
        header.insert(
            "BO2RA",
            HeaderEntry::new(HeaderValue::Float(10.5), "Bow to radar offset"),
        );
        header.insert("NAME", HeaderEntry::new(HeaderValue::Text("k1".into()), "N/A"));
        header
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let header = sample_header();
        assert_eq!(header.get("fifo"), Some(&HeaderValue::Int(512)));
        assert_eq!(header.describe("Fifo"), Some("Number of samples"));
    }

    #[test]
    fn require_rejects_missing_and_non_numeric_fields() {
        let header = sample_header();
        assert!(matches!(
            header.require_i64("DABIT"),
            Err(PolarError::MissingField(key)) if key == "DABIT"
        ));
        assert!(matches!(
            header.require_i64("NAME"),
            Err(PolarError::MissingField(_))
        ));
        assert_eq!(header.require_f64("BO2RA").unwrap(), 10.5);
    }

    #[test]
    fn json_round_trip_preserves_order_and_types() {
        let header = sample_header();
        let payload = serde_json::to_string_pretty(&header).unwrap();
        let restored: Header = serde_json::from_str(&payload).unwrap();

        let keys: Vec<&str> = restored.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["FIFO", "BO2RA", "NAME"]);
        assert_eq!(restored, header);
    }

    #[test]
    fn integral_json_numbers_stay_integers() {
        let restored: Header =
            serde_json::from_str(r#"{"FIFO": {"value": 512, "description": "N/A"}}"#).unwrap();
        assert_eq!(restored.get("FIFO"), Some(&HeaderValue::Int(512)));
    }
}

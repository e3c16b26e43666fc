use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Identifier of a backend record. The backend emits ids as JSON numbers for
/// some resources and as strings for others; both decode to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Numeric ids go back out as numbers so the backend sees what it sent.
        match self.0.parse::<u64>() {
            Ok(n) if self.is_numeric() => serializer.serialize_u64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

struct RecordIdVisitor;

impl<'de> Visitor<'de> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-empty string or an integer id")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(RecordId(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        if v < 0 {
            return Err(E::custom(format!("negative id {}", v)));
        }
        Ok(RecordId(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Err(E::custom("empty id"));
        }
        Ok(RecordId(trimmed.to_string()))
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_numbers_and_strings() {
        let a: RecordId = serde_json::from_value(json!(42)).unwrap();
        let b: RecordId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(a, b);
        assert!(a.is_numeric());
    }

    #[test]
    fn rejects_empty_and_non_scalar_ids() {
        assert!(serde_json::from_value::<RecordId>(json!("  ")).is_err());
        assert!(serde_json::from_value::<RecordId>(json!(null)).is_err());
        assert!(serde_json::from_value::<RecordId>(json!(-3)).is_err());
    }

    #[test]
    fn numeric_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_value(RecordId::from(7u64)).unwrap(), json!(7));
        assert_eq!(serde_json::to_value(RecordId::from("doc-7")).unwrap(), json!("doc-7"));
    }
}

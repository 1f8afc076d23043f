//! The unit of configuration that gets swapped on every refresh.

use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use hearsay_theories::{config::ConfigGetter, error::GetError};
use serde_json::{Map, Value};

use crate::value::{parse_value, ConfigValue};

/// An immutable copy of a service's configuration. Every value is kept in its text form and only
/// parsed when read through [`ConfigGetter`], so a snapshot can be pinned and read repeatedly
/// while newer snapshots replace it in the store.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    values: HashMap<String, String>,
    updated_at: Option<SystemTime>,
}

impl Snapshot {
    pub fn new(values: HashMap<String, String>, updated_at: SystemTime) -> Self {
        Self {
            values,
            updated_at: Some(updated_at),
        }
    }

    /// Decode a payload holding a JSON object, stringifying every value.
    pub fn decode(payload: &str, updated_at: SystemTime) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_str(payload)?;
        let values = object
            .into_iter()
            .map(|(key, value)| (key, stringify(value)))
            .collect();

        Ok(Self::new(values, updated_at))
    }

    /// Raw text stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// When the refresh that produced this snapshot completed. `None` until the first refresh.
    pub fn updated_at(&self) -> Option<SystemTime> {
        self.updated_at
    }

    fn parse<T: ConfigValue>(&self, key: &str) -> Result<T, GetError> {
        parse_value(key, |key| self.get(key))
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(text) => text,
        // Numbers, booleans, null and nested values keep their JSON text.
        other => other.to_string(),
    }
}

impl ConfigGetter for Snapshot {
    fn get_int(&self, key: &str) -> Result<i64, GetError> {
        self.parse(key)
    }

    fn get_float(&self, key: &str) -> Result<f64, GetError> {
        self.parse(key)
    }

    fn get_string(&self, key: &str) -> Result<String, GetError> {
        self.parse(key)
    }

    fn get_bool(&self, key: &str) -> Result<bool, GetError> {
        self.parse(key)
    }

    fn get_duration(&self, key: &str) -> Result<Duration, GetError> {
        self.parse(key)
    }
}

#[cfg(test)]
mod tests {
    use hearsay_theories::config::ConfigGetterWithDefault;

    use super::*;

    const PAYLOAD: &str = r#"{"int_key":42,"float_key":2.75,"string_key":"test_value","bool_key":true,"duration_key":"5s"}"#;

    #[test]
    fn decode_stringifies_values() {
        let snapshot = Snapshot::decode(PAYLOAD, SystemTime::now()).unwrap();

        assert_eq!(5, snapshot.len());
        assert_eq!(Some("42"), snapshot.get("int_key"));
        assert_eq!(Some("2.75"), snapshot.get("float_key"));
        assert_eq!(Some("test_value"), snapshot.get("string_key"));
        assert_eq!(Some("true"), snapshot.get("bool_key"));
        assert_eq!(Some("5s"), snapshot.get("duration_key"));
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn decode_keeps_float_text() {
        let snapshot = Snapshot::decode(r#"{"pi":3.14,"small":0.5}"#, SystemTime::now()).unwrap();

        assert_eq!(Some("3.14"), snapshot.get("pi"));
        assert_eq!(Ok(3.14), snapshot.get_float("pi"));
        assert_eq!(Some("0.5"), snapshot.get("small"));
    }

    #[test]
    fn decode_keeps_json_text_for_other_values() {
        let snapshot = Snapshot::decode(
            r#"{"nothing":null,"list":[1,2],"nested":{"a":false},"big":10000000}"#,
            SystemTime::now(),
        )
        .unwrap();

        assert_eq!(Some("null"), snapshot.get("nothing"));
        assert_eq!(Some("[1,2]"), snapshot.get("list"));
        assert_eq!(Some(r#"{"a":false}"#), snapshot.get("nested"));
        assert_eq!(Ok(10_000_000), snapshot.get_int("big"));
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert!(Snapshot::decode("invalid json", SystemTime::now()).is_err());
        assert!(Snapshot::decode("[1,2,3]", SystemTime::now()).is_err());
        assert!(Snapshot::decode("42", SystemTime::now()).is_err());
    }

    #[test]
    fn empty_snapshot_has_no_timestamp() {
        let snapshot = Snapshot::default();

        assert!(snapshot.is_empty());
        assert!(snapshot.updated_at().is_none());
        assert_eq!(
            Err(GetError::NotFound("int_key".to_string())),
            snapshot.get_int("int_key")
        );
    }

    #[test]
    fn typed_getters() {
        let snapshot = Snapshot::decode(PAYLOAD, SystemTime::now()).unwrap();

        assert_eq!(Ok(42), snapshot.get_int("int_key"));
        assert_eq!(Ok(2.75), snapshot.get_float("float_key"));
        assert_eq!(Ok("test_value".to_string()), snapshot.get_string("string_key"));
        assert_eq!(Ok(true), snapshot.get_bool("bool_key"));
        assert_eq!(Ok(Duration::from_secs(5)), snapshot.get_duration("duration_key"));

        assert!(matches!(
            snapshot.get_bool("int_key"),
            Err(GetError::Parse { .. })
        ));
        assert!(matches!(
            snapshot.get_duration("missing"),
            Err(GetError::NotFound(_))
        ));
    }

    #[test]
    fn defaults_cover_missing_and_invalid() {
        let snapshot = Snapshot::decode(PAYLOAD, SystemTime::now()).unwrap();

        assert_eq!(42, snapshot.get_int_with_default("int_key", 100));
        assert_eq!(100, snapshot.get_int_with_default("missing", 100));
        assert_eq!(100, snapshot.get_int_with_default("string_key", 100));
        assert_eq!(1.0, snapshot.get_float_with_default("bool_key", 1.0));
        assert_eq!("default", snapshot.get_string_with_default("missing", "default"));
        assert!(!snapshot.get_bool_with_default("float_key", false));
        assert_eq!(
            Duration::from_secs(1),
            snapshot.get_duration_with_default("int_key", Duration::from_secs(1))
        );
    }
}

//! Text parsing for the value types the getters support.

use std::time::Duration;

use hearsay_theories::error::GetError;

use crate::duration::parse_duration;

/// A type that can be read from its configuration text form.
pub trait ConfigValue: Sized {
    /// Name used in error messages.
    const KIND: &'static str;

    fn from_config_text(text: &str) -> Option<Self>;
}

impl ConfigValue for i64 {
    const KIND: &'static str = "int";

    fn from_config_text(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl ConfigValue for f64 {
    const KIND: &'static str = "float";

    fn from_config_text(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl ConfigValue for String {
    const KIND: &'static str = "string";

    fn from_config_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

impl ConfigValue for bool {
    const KIND: &'static str = "bool";

    // Only `true` and `false`, `1`/`0` and friends are rejected.
    fn from_config_text(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl ConfigValue for Duration {
    const KIND: &'static str = "duration";

    fn from_config_text(text: &str) -> Option<Self> {
        parse_duration(text).ok()
    }
}

/// Look up `key` through `lookup` and parse the text as `T`.
pub(crate) fn parse_value<'a, T: ConfigValue>(
    key: &str,
    lookup: impl FnOnce(&str) -> Option<&'a str>,
) -> Result<T, GetError> {
    let text = lookup(key).ok_or_else(|| GetError::NotFound(key.to_string()))?;
    T::from_config_text(text).ok_or_else(|| GetError::Parse {
        key: key.to_string(),
        value: text.to_string(),
        expected: T::KIND,
    })
}

//! Operator configuration records.
//!
//! A [`Configuration`] is a string-keyed map of typed [`ConfigValue`]s.
//! Operators read it through coercing getters that take a default, so a
//! missing key, an ill-typed value or an unknown key is never fatal:
//!
//! | getter        | accepts                                   | otherwise |
//! |---------------|-------------------------------------------|-----------|
//! | `get_bool`    | `Bool`; `Int` (non-zero is true)          | default   |
//! | `get_int`     | `Int`; finite `Float` (rounded)           | default   |
//! | `get_float`   | finite `Float`; `Int`                     | default   |
//!
//! Keys are kept sorted so serialized output is stable. Persistence uses
//! YAML through `serde_yaml`; the host decides where the text goes. When
//! loading, quoted values such as `"4"` or `yes` are coerced like a
//! `key=value` assignment, and anything still not a bool or number is
//! dropped with a warning so the remaining keys survive.
//!
//! # Example
//!
//! ```rust
//! use tmo_ops::config::Configuration;
//!
//! let mut config = Configuration::new();
//! config.set("Simple", true);
//! config.set("LocalContrastThreshold", 0.25);
//!
//! assert!(config.get_bool("Simple", false));
//! assert_eq!(config.get_int("Equation", 2), 2);
//!
//! let yaml = config.to_yaml().unwrap();
//! let back = Configuration::from_yaml(&yaml).unwrap();
//! assert_eq!(back, config);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use tracing::warn;

use crate::{OpsError, OpsResult};

/// Typed configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer (enum codes, counts).
    Int(i64),
    /// Floating point parameter.
    Float(f64),
}

impl ConfigValue {
    /// Type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float",
        }
    }

    /// Boolean view: `Bool`, or `Int` compared against zero.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ConfigValue::Bool(v) => Some(v),
            ConfigValue::Int(v) => Some(v != 0),
            ConfigValue::Float(_) => None,
        }
    }

    /// Integer view: `Int`, or a finite `Float` rounded to nearest.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            ConfigValue::Int(v) => Some(v),
            ConfigValue::Float(v) if v.is_finite() => Some(v.round() as i64),
            _ => None,
        }
    }

    /// Parses text the way `key=value` assignments are read: `true`/`false`
    /// (also `yes`/`no`, `on`/`off`) become `Bool`, integer literals `Int`,
    /// other numbers `Float`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => return Some(ConfigValue::Bool(true)),
            "false" | "no" | "off" => return Some(ConfigValue::Bool(false)),
            _ => {}
        }
        if let Ok(v) = raw.parse::<i64>() {
            Some(ConfigValue::Int(v))
        } else {
            raw.parse::<f64>().ok().map(ConfigValue::Float)
        }
    }

    /// Converts a loaded YAML value, `None` if it is not a bool, a number or
    /// a string that [`parse`](Self::parse) accepts.
    fn from_yaml_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(ConfigValue::Bool(*v)),
            Value::Number(n) => n
                .as_i64()
                .map(ConfigValue::Int)
                .or_else(|| n.as_f64().map(ConfigValue::Float)),
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Float view: a finite `Float`, or `Int` widened.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            ConfigValue::Float(v) if v.is_finite() => Some(v),
            ConfigValue::Int(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::Bool(v) => write!(f, "{}", v),
            ConfigValue::Int(v) => write!(f, "{}", v),
            ConfigValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Int(v as i64)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<f32> for ConfigValue {
    fn from(v: f32) -> Self {
        ConfigValue::Float(v as f64)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

/// Ordered string-keyed configuration record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Configuration {
    values: BTreeMap<String, ConfigValue>,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Raw value for `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copies every entry of `other` over this record.
    pub fn merge(&mut self, other: &Configuration) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), *v);
        }
    }

    /// Boolean for `key`, or `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(ConfigValue::as_bool).unwrap_or(default)
    }

    /// Integer for `key`, or `default`.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(ConfigValue::as_int).unwrap_or(default)
    }

    /// Float for `key`, or `default`.
    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(ConfigValue::as_float).unwrap_or(default)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parses YAML produced by [`to_yaml`](Self::to_yaml) or written by hand.
    ///
    /// An empty document is an empty configuration. Only a document that is
    /// not a string-keyed mapping is an error; individual values that can't
    /// be coerced are skipped.
    pub fn from_yaml(text: &str) -> OpsResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies a `key=value` assignment.
    ///
    /// The value is read with [`ConfigValue::parse`].
    ///
    /// ```rust
    /// use tmo_ops::config::{ConfigValue, Configuration};
    ///
    /// let mut config = Configuration::new();
    /// config.parse_assignment("Equation=4").unwrap();
    /// assert_eq!(config.get("Equation"), Some(&ConfigValue::Int(4)));
    /// assert!(config.parse_assignment("Equation").is_err());
    /// ```
    pub fn parse_assignment(&mut self, assignment: &str) -> OpsResult<()> {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| OpsError::Config(format!("expected key=value, got '{}'", assignment)))?;
        let key = key.trim();
        let raw = raw.trim();
        if key.is_empty() {
            return Err(OpsError::Config(format!("empty key in '{}'", assignment)));
        }
        let value = ConfigValue::parse(raw).ok_or_else(|| {
            OpsError::Config(format!("value for '{}' is not a bool or number: '{}'", key, raw))
        })?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Configuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut config = Configuration::new();
        for (key, value) in raw {
            match ConfigValue::from_yaml_value(&value) {
                Some(v) => {
                    config.values.insert(key, v);
                }
                None => warn!(key = %key, value = ?value, "configuration value is not a bool or number, ignored"),
            }
        }
        Ok(config)
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Configuration::new();
        for (k, v) in iter {
            config.set(k, v);
        }
        config
    }
}

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::validation::{ModelError, ModelResult};

/// A value that crosses the HTTP boundary as a JSON object.
///
/// `to_dict` is the serde shape of the type; `from_dict` reads the same keys
/// back and runs the validators, so `from_dict(to_dict(r)) == r`.
///
/// Decoding goes through [`Fields`] rather than `#[derive(Deserialize)]`: the
/// wire accepts numeric strings, reports absent keys as
/// [`ModelError::MissingField`] and must tell an explicit `null` from a missing key.
pub trait WireRecord: Serialize + Sized {
    fn from_dict(value: &Value) -> ModelResult<Self>;

    fn to_dict(&self) -> ModelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Typed, coercing field access over an inbound JSON object.
///
/// `null` is treated the same as a missing key except by [`Fields::patch_string`].
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn of(value: &'a Value) -> ModelResult<Self> {
        match value {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(ModelError::NotAnObject),
        }
    }

    pub fn from_map(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn required<T>(
        &self,
        key: &'static str,
        read: impl Fn(&'static str, &'a Value) -> ModelResult<T>,
    ) -> ModelResult<T> {
        match self.present(key) {
            Some(value) => read(key, value),
            None => Err(ModelError::MissingField(key)),
        }
    }

    pub fn optional<T>(
        &self,
        key: &'static str,
        read: impl Fn(&'static str, &'a Value) -> ModelResult<T>,
    ) -> ModelResult<Option<T>> {
        self.present(key).map(|value| read(key, value)).transpose()
    }

    pub fn string(&self, key: &'static str) -> ModelResult<String> {
        self.required(key, as_string)
    }

    pub fn opt_string(&self, key: &'static str) -> ModelResult<Option<String>> {
        self.optional(key, as_string)
    }

    /// Absent and `null` both read as an empty string.
    pub fn string_or_empty(&self, key: &'static str) -> ModelResult<String> {
        Ok(self.opt_string(key)?.unwrap_or_default())
    }

    /// Three-state read for partial updates: absent, explicit `null`, or a value.
    pub fn patch_string(&self, key: &'static str) -> ModelResult<Option<Option<String>>> {
        match self.map.get(key) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(None)),
            Some(value) => as_string(key, value).map(|s| Some(Some(s))),
        }
    }

    pub fn int(&self, key: &'static str) -> ModelResult<i32> {
        self.required(key, as_int)
    }

    pub fn opt_int(&self, key: &'static str) -> ModelResult<Option<i32>> {
        self.optional(key, as_int)
    }

    pub fn decimal(&self, key: &'static str) -> ModelResult<Decimal> {
        self.required(key, as_decimal)
    }

    pub fn opt_decimal(&self, key: &'static str) -> ModelResult<Option<Decimal>> {
        self.optional(key, as_decimal)
    }

    pub fn timestamp(&self, key: &'static str) -> ModelResult<NaiveDateTime> {
        self.required(key, as_timestamp)
    }

    pub fn opt_timestamp(&self, key: &'static str) -> ModelResult<Option<NaiveDateTime>> {
        self.optional(key, as_timestamp)
    }

    /// Absent list reads as empty.
    pub fn string_list(&self, key: &'static str) -> ModelResult<Vec<String>> {
        Ok(self.opt_string_list(key)?.unwrap_or_default())
    }

    pub fn opt_string_list(&self, key: &'static str) -> ModelResult<Option<Vec<String>>> {
        self.optional(key, as_string_list)
    }

    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.present(key)
    }
}

pub fn as_string(key: &'static str, value: &Value) -> ModelResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ModelError::invalid(key, "must be a string")),
    }
}

pub fn as_int(key: &'static str, value: &Value) -> ModelResult<i32> {
    let not_int = || ModelError::invalid(key, "must be an integer");
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).map_err(|_| ModelError::invalid(key, "is out of range"));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
                    Ok(f as i32)
                }
                _ => Err(not_int()),
            }
        }
        Value::String(s) => s.trim().parse::<i32>().map_err(|_| not_int()),
        _ => Err(not_int()),
    }
}

pub fn as_decimal(key: &'static str, value: &Value) -> ModelResult<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(ModelError::invalid(key, "must be a number")),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(|d| d.normalize())
        .map_err(|_| ModelError::invalid(key, "must be a number"))
}

/// Accepts RFC 3339 as well as naive ISO timestamps with `T` or space separators.
pub fn as_timestamp(key: &'static str, value: &Value) -> ModelResult<NaiveDateTime> {
    let Value::String(text) = value else {
        return Err(ModelError::invalid(key, "must be a timestamp string"));
    };
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| ModelError::invalid(key, "must be an ISO-8601 timestamp"))
}

pub fn as_string_list(key: &'static str, value: &Value) -> ModelResult<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(ModelError::invalid(key, "must contain only strings")),
            })
            .collect(),
        _ => Err(ModelError::invalid(key, "must be a list of strings")),
    }
}

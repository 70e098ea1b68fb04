//! Recovery of product snapshots that upstream systems serialized inconsistently.
//!
//! A snapshot may arrive as a JSON object, as a string holding either JSON or a
//! Python-literal repr (`{'nom': 'X', 'prix': None}`), or not at all. Parsing is
//! best effort: failures are logged and collapse to `None` or to defaults, they
//! never reach the caller as errors.

use std::{iter::Peekable, str::Chars};

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::wire::{as_decimal, as_int};

pub const DEFAULT_PRODUCT_NAME: &str = "Produit";

/// Product snapshot input, resolved by explicit three-way dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductData {
    Mapping(Map<String, Value>),
    RawString(String),
    Absent,
}

impl From<Value> for ProductData {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => ProductData::Mapping(map),
            Value::String(raw) => ProductData::RawString(raw),
            _ => ProductData::Absent,
        }
    }
}

impl From<Map<String, Value>> for ProductData {
    fn from(map: Map<String, Value>) -> Self {
        ProductData::Mapping(map)
    }
}

impl From<String> for ProductData {
    fn from(raw: String) -> Self {
        ProductData::RawString(raw)
    }
}

impl From<&str> for ProductData {
    fn from(raw: &str) -> Self {
        ProductData::RawString(raw.to_string())
    }
}

impl<T: Into<ProductData>> From<Option<T>> for ProductData {
    fn from(value: Option<T>) -> Self {
        value.map_or(ProductData::Absent, Into::into)
    }
}

/// Flattened product view with every field filled in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct ProductInfo {
    #[serde(rename = "nom")]
    pub name: String,
    pub description: String,
    #[serde(rename = "prix", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "quantite_stock")]
    pub stock_quantity: i32,
    #[serde(rename = "categorie")]
    pub category: String,
    pub image_url: String,
}

impl ProductInfo {
    /// Field-by-field fallback: a bad or missing entry takes its zero value.
    pub fn from_mapping(map: &Map<String, Value>) -> Self {
        let text = |key: &str| match map.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        let price = map
            .get("prix")
            .and_then(|v| as_decimal("prix", v).ok())
            .unwrap_or_default();
        let stock_quantity = map
            .get("quantite_stock")
            .and_then(|v| as_int("quantite_stock", v).ok())
            .unwrap_or_default();
        Self {
            name: text("nom"),
            description: text("description"),
            price,
            stock_quantity,
            category: text("categorie"),
            image_url: text("image_url"),
        }
    }

    /// JSON text written to `lignes_commande.produit`.
    pub fn to_snapshot(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "product snapshot encoding failed");
            String::from("{}")
        })
    }
}

pub fn parse_product_data(input: impl Into<ProductData>) -> Option<Map<String, Value>> {
    match input.into() {
        ProductData::Mapping(map) => Some(map),
        ProductData::RawString(raw) => parse_raw(&raw),
        ProductData::Absent => None,
    }
}

pub fn get_product_name(input: impl Into<ProductData>) -> String {
    parse_product_data(input)
        .and_then(|map| match map.get("nom") {
            Some(Value::String(name)) if !name.trim().is_empty() => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string())
}

pub fn get_product_info(input: impl Into<ProductData>) -> ProductInfo {
    parse_product_data(input)
        .map(|map| ProductInfo::from_mapping(&map))
        .unwrap_or_default()
}

fn parse_raw(raw: &str) -> Option<Map<String, Value>> {
    let normalized = python_literal_to_json(raw);
    match serde_json::from_str::<Value>(&normalized) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::warn!(kind = json_kind(&other), "product data is not a mapping");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, raw = %raw, "product data parse failed");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Rewrites a Python-literal repr into JSON text: quotes become `"`, and the
/// bare words `None`, `True`, `False` become their JSON spellings. Anything
/// else passes through untouched, so genuine JSON is unaffected.
fn python_literal_to_json(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => copy_quoted(c, &mut chars, &mut out),
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !(next.is_alphanumeric() || next == '_') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                out.push_str(match word.as_str() {
                    "None" => "null",
                    "True" => "true",
                    "False" => "false",
                    other => other,
                });
            }
            other => out.push(other),
        }
    }
    out
}

fn copy_quoted(delimiter: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    out.push('"');
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                // `\'` is valid in Python but not in JSON.
                Some('\'') => out.push('\''),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            c if c == delimiter => break,
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::python_literal_to_json;

    #[test]
    fn rewrites_python_repr() {
        assert_eq!(
            python_literal_to_json("{'nom': 'X', 'prix': None, 'actif': True}"),
            r#"{"nom": "X", "prix": null, "actif": true}"#
        );
    }

    #[test]
    fn keeps_words_inside_strings() {
        assert_eq!(
            python_literal_to_json("{'nom': 'None of those'}"),
            r#"{"nom": "None of those"}"#
        );
    }

    #[test]
    fn escapes_double_quotes_inside_single_quoted_strings() {
        assert_eq!(
            python_literal_to_json(r#"{'nom': 'Ecran 27"'}"#),
            r#"{"nom": "Ecran 27\""}"#
        );
    }

    #[test]
    fn leaves_json_untouched() {
        let json = r#"{"nom": "X", "prix": 12.5, "images": []}"#;
        assert_eq!(python_literal_to_json(json), json);
    }
}

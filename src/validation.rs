use rust_decimal::Decimal;
use thiserror::Error;

/// Failure raised while building a record from wire or row data.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid value for `{field}`: {rule}")]
    Validation { field: &'static str, rule: String },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("failed to encode record")]
    Encode(#[from] serde_json::Error),
}

impl ModelError {
    pub fn invalid(field: &'static str, rule: impl Into<String>) -> Self {
        ModelError::Validation {
            field,
            rule: rule.into(),
        }
    }

    /// Wire name of the offending field, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ModelError::Validation { field, .. } | ModelError::MissingField(field) => Some(field),
            _ => None,
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;

pub const ROLES: [&str; 3] = ["client", "admin", "manager"];

pub const ORDER_STATUSES: [&str; 5] = ["en_attente", "confirme", "expedie", "livre", "annule"];

/// Checks `value` against a closed label set and hands it back untouched.
pub fn one_of<'a>(field: &'static str, value: &'a str, allowed: &[&str]) -> ModelResult<&'a str> {
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(ModelError::invalid(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        ))
    }
}

pub fn role(value: &str) -> ModelResult<&str> {
    one_of("role", value, &ROLES)
}

pub fn order_status(value: &str) -> ModelResult<&str> {
    one_of("statut", value, &ORDER_STATUSES)
}

/// Digits after the decimal point a money amount may carry (`NUMERIC(12,2)`).
pub const MONEY_SCALE: u32 = 2;

/// Exclusive upper bound on money amounts, in whole units.
pub const MONEY_LIMIT: i64 = 10_000_000_000;

/// Prices and totals: non-negative, at most two decimals, below [`MONEY_LIMIT`].
///
/// Amounts inside these bounds survive the `f64` wire encoding exactly.
pub fn money(field: &'static str, value: Decimal) -> ModelResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ModelError::invalid(field, "must not be negative"));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ModelError::invalid(
            field,
            format!("must have at most {MONEY_SCALE} decimal places"),
        ));
    }
    if value >= Decimal::from(MONEY_LIMIT) {
        return Err(ModelError::invalid(field, format!("must be below {MONEY_LIMIT}")));
    }
    Ok(value)
}

pub fn non_negative_count(field: &'static str, value: i32) -> ModelResult<i32> {
    if value < 0 {
        return Err(ModelError::invalid(field, "must not be negative"));
    }
    Ok(value)
}

pub fn positive_count(field: &'static str, value: i32) -> ModelResult<i32> {
    if value <= 0 {
        return Err(ModelError::invalid(field, "must be greater than 0"));
    }
    Ok(value)
}

pub fn positive_id(field: &'static str, value: i32) -> ModelResult<i32> {
    if value <= 0 {
        return Err(ModelError::invalid(field, "must be a positive identifier"));
    }
    Ok(value)
}

pub fn optional_id(field: &'static str, value: Option<i32>) -> ModelResult<Option<i32>> {
    value.map(|id| positive_id(field, id)).transpose()
}

/// Mandatory text: whitespace-only counts as absent.
pub fn required_string(field: &'static str, value: &str) -> ModelResult<String> {
    if value.trim().is_empty() {
        return Err(ModelError::invalid(field, "must not be empty"));
    }
    Ok(value.to_string())
}

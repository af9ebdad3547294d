//! Validation of inbound product payloads.
//!
//! Payloads arrive as raw JSON so that every failing field can be reported at once instead of
//! stopping at the first deserialization error. Scalars are coerced leniently: integer fields
//! accept integral numbers and numeric strings (`"45"`), `price` accepts any finite number or a
//! numeric string. Text fields must be JSON strings.

use crate::domain::product::{Product, TEXT_COLUMN_MAX_LEN};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Missing,
    InvalidType,
    OutOfRange,
    TooLong,
    Mismatch,
}

/// One failing field of a payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.into(),
        }
    }
}

/// Every field that failed validation, in field declaration order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid product payload: {}", describe(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: &str, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, kind, message)],
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates a create/update payload for the product at `path_id`.
///
/// The path id is authoritative. A body `id` may be omitted; when present it must equal
/// `path_id` or the payload is rejected with a `mismatch` error on `id`.
pub fn validate_product(path_id: i32, payload: &JsonValue) -> Result<Product, ValidationErrors> {
    let obj = match payload.as_object() {
        Some(o) => o,
        None => {
            return Err(ValidationErrors::single(
                "body",
                FieldErrorKind::InvalidType,
                format!("expected a JSON object, got {}", json_kind(payload)),
            ))
        }
    };

    let mut errors: Vec<FieldError> = Vec::new();

    match obj.get("id") {
        None | Some(JsonValue::Null) => {}
        Some(v) => match coerce_i32("id", v) {
            Ok(body_id) if body_id != path_id => errors.push(FieldError::new(
                "id",
                FieldErrorKind::Mismatch,
                format!("body id {} does not match path id {}", body_id, path_id),
            )),
            Ok(_) => {}
            Err(e) => errors.push(e),
        },
    }

    let name = match obj.get("name") {
        None => {
            errors.push(missing("name"));
            None
        }
        Some(v) => collect(&mut errors, coerce_text("name", v)),
    };

    let description = match obj.get("description") {
        None | Some(JsonValue::Null) => Some(None),
        Some(v) => collect(&mut errors, coerce_text("description", v)).map(Some),
    };

    let price = match obj.get("price") {
        None => {
            errors.push(missing("price"));
            None
        }
        Some(v) => collect(&mut errors, coerce_price(v)),
    };

    let quantity = match obj.get("quantity") {
        None => {
            errors.push(missing("quantity"));
            None
        }
        Some(v) => collect(&mut errors, coerce_i32("quantity", v)),
    };

    match (name, description, price, quantity) {
        (Some(name), Some(description), Some(price), Some(quantity)) if errors.is_empty() => {
            Ok(Product {
                id: path_id,
                name,
                description,
                price,
                quantity,
            })
        }
        _ => Err(ValidationErrors { errors }),
    }
}

fn collect<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn missing(field: &str) -> FieldError {
    FieldError::new(field, FieldErrorKind::Missing, "field required")
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn invalid_type(field: &str, expected: &str, v: &JsonValue) -> FieldError {
    FieldError::new(
        field,
        FieldErrorKind::InvalidType,
        format!("expected {}, got {}", expected, json_kind(v)),
    )
}

fn coerce_i32(field: &str, v: &JsonValue) -> Result<i32, FieldError> {
    let wide: i64 = if let Some(n) = v.as_i64() {
        n
    } else if let Some(f) = v.as_f64() {
        if !f.is_finite() || f.fract() != 0.0 {
            return Err(invalid_type(field, "integer", v));
        }
        if f < i64::MIN as f64 || f > i64::MAX as f64 {
            return Err(out_of_range(field, f));
        }
        f as i64
    } else if let Some(s) = v.as_str() {
        s.trim()
            .parse::<i64>()
            .map_err(|_| invalid_type(field, "integer", v))?
    } else {
        return Err(invalid_type(field, "integer", v));
    };

    i32::try_from(wide).map_err(|_| out_of_range(field, wide))
}

fn out_of_range(field: &str, value: impl fmt::Display) -> FieldError {
    FieldError::new(
        field,
        FieldErrorKind::OutOfRange,
        format!("{} is outside the 32-bit integer range", value),
    )
}

fn coerce_price(v: &JsonValue) -> Result<f64, FieldError> {
    let price = if let Some(f) = v.as_f64() {
        f
    } else if let Some(s) = v.as_str() {
        s.trim()
            .parse::<f64>()
            .map_err(|_| invalid_type("price", "number", v))?
    } else {
        return Err(invalid_type("price", "number", v));
    };

    if !price.is_finite() {
        return Err(FieldError::new(
            "price",
            FieldErrorKind::OutOfRange,
            "price must be a finite number",
        ));
    }
    Ok(price)
}

fn coerce_text(field: &str, v: &JsonValue) -> Result<String, FieldError> {
    let s = v.as_str().ok_or_else(|| invalid_type(field, "string", v))?;
    if s.chars().count() > TEXT_COLUMN_MAX_LEN {
        return Err(FieldError::new(
            field,
            FieldErrorKind::TooLong,
            format!("exceeds maximum length of {} characters", TEXT_COLUMN_MAX_LEN),
        ));
    }
    Ok(s.to_string())
}

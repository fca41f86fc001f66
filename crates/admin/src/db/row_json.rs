//! Conversion of arbitrary `PostgreSQL` result rows into JSON objects.
//!
//! Query console results have no known shape, so each column is decoded by
//! its reported type name. Types without a mapping render as `<TYPE>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value as JsonValue};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use uuid::Uuid;

/// Convert one row into a JSON object keyed by column name.
///
/// # Errors
///
/// Returns `sqlx::Error` if a column of a mapped type fails to decode.
pub fn row_to_json(row: &PgRow) -> Result<JsonValue, sqlx::Error> {
    let mut object = Map::with_capacity(row.columns().len());

    for column in row.columns() {
        let index = column.ordinal();
        let value = if row.try_get_raw(index)?.is_null() {
            JsonValue::Null
        } else {
            decode_column(row, index, column.type_info().name())?
        };
        object.insert(column.name().to_string(), value);
    }

    Ok(JsonValue::Object(object))
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Result<JsonValue, sqlx::Error> {
    let value = match type_name {
        "BOOL" => JsonValue::Bool(row.try_get::<bool, _>(index)?),
        "INT2" => JsonValue::from(row.try_get::<i16, _>(index)?),
        "INT4" => JsonValue::from(row.try_get::<i32, _>(index)?),
        "INT8" => JsonValue::from(row.try_get::<i64, _>(index)?),
        "FLOAT4" => float(f64::from(row.try_get::<f32, _>(index)?)),
        "FLOAT8" => float(row.try_get::<f64, _>(index)?),
        "NUMERIC" => JsonValue::String(row.try_get::<Decimal, _>(index)?.to_string()),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => {
            JsonValue::String(row.try_get::<String, _>(index)?)
        }
        "JSON" | "JSONB" => row.try_get::<JsonValue, _>(index)?,
        "UUID" => JsonValue::String(row.try_get::<Uuid, _>(index)?.to_string()),
        "DATE" => JsonValue::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "TIMESTAMP" => JsonValue::String(row.try_get::<NaiveDateTime, _>(index)?.to_string()),
        "TIMESTAMPTZ" => JsonValue::String(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339()),
        other => row
            .try_get::<String, _>(index)
            .map_or_else(|_| JsonValue::String(format!("<{other}>")), JsonValue::String),
    };
    Ok(value)
}

/// NaN and infinities have no JSON form.
fn float(value: f64) -> JsonValue {
    Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
}

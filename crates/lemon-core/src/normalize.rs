//! Boundary normalization of report payloads.
//!
//! The API has returned reports as a bare array, as `{ "reports": [...] }`,
//! and as `{ "data": ... }`, with both `snake_case` and `camelCase` field
//! names and with `year`/`mileage` as either numbers or strings. Everything is
//! mapped onto [`Report`] here, immediately after the fetch.
//!
//! Status mapping (explicit `status` wins):
//!
//! | `status`          | `completed_at` | `created_at` | result       |
//! |-------------------|----------------|--------------|--------------|
//! | recognised value  | any            | any          | that value   |
//! | missing/unknown   | present        | any          | `completed`  |
//! | missing/unknown   | absent         | present      | `processing` |
//! | missing/unknown   | absent         | absent       | `pending`    |

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::enums::ReportStatus;
use crate::errors::CoreError;
use crate::report::{Report, ReportOwner};
use crate::result::ReportResult;

/// Normalize a list response in any of the known shapes.
///
/// # Errors
///
/// Returns [`CoreError::Malformed`] if no report array can be located or an
/// element cannot be normalized.
pub fn reports_from_value(value: &Value) -> Result<Vec<Report>, CoreError> {
    let items = locate_array(value)
        .ok_or_else(|| CoreError::Malformed("expected a report list".into()))?;
    items.iter().map(report_from_value).collect()
}

/// Normalize a single report, unwrapping `{ "report": ... }` / `{ "data": ... }`.
///
/// # Errors
///
/// Returns [`CoreError::Malformed`] if the payload is not an object or lacks
/// the vehicle fields.
pub fn report_from_value(value: &Value) -> Result<Report, CoreError> {
    let obj = unwrap_single(value)
        .ok_or_else(|| CoreError::Malformed("expected a report object".into()))?;

    let make = string_field(obj, &["make"])
        .ok_or_else(|| CoreError::Malformed("report is missing 'make'".into()))?;
    let model = string_field(obj, &["model"])
        .ok_or_else(|| CoreError::Malformed("report is missing 'model'".into()))?;
    let year = int_field(obj, &["year"])
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| CoreError::Malformed("report is missing 'year'".into()))?;
    let mileage = int_field(obj, &["mileage"])
        .and_then(|m| u32::try_from(m).ok())
        .unwrap_or(0);

    let created_at = time_field(obj, &["created_at", "createdAt"]);
    let completed_at = time_field(obj, &["completed_at", "completedAt"]);
    let status = string_field(obj, &["status"])
        .and_then(|s| ReportStatus::parse(&s))
        .unwrap_or_else(|| infer_status(completed_at.is_some(), created_at.is_some()));

    let result = obj
        .get("result")
        .filter(|v| !v.is_null())
        .map(|v| ReportResult(v.clone()))
        .filter(|r| !r.is_empty());

    let owner = string_field(obj, &["user_id", "userId"])
        .map(ReportOwner::User)
        .or_else(|| string_field(obj, &["session_id", "sessionId"]).map(ReportOwner::Session));

    let zip_code = string_field(obj, &["zip_code", "zipCode"]);
    let listing_link = string_field(obj, &["listing_link", "listingLink"]);
    let additional_info = string_field(obj, &["additional_info", "additionalInfo"]);
    let is_premium = obj
        .get("is_premium")
        .or_else(|| obj.get("isPremium"))
        .and_then(Value::as_bool)
        .or_else(|| string_field(obj, &["type"]).map(|t| t.eq_ignore_ascii_case("premium")))
        .unwrap_or(false);

    Ok(Report {
        id: obj.get("id").and_then(Value::as_i64),
        uuid: string_field(obj, &["uuid"])
            .or_else(|| obj.get("id").and_then(Value::as_str).map(str::to_owned)),
        make,
        model,
        year,
        mileage,
        vin: string_field(obj, &["vin"]),
        zip_code,
        listing_link,
        additional_info,
        is_premium,
        owner,
        status,
        result,
        created_at,
        updated_at: time_field(obj, &["updated_at", "updatedAt"]),
        completed_at,
    })
}

/// Legacy timestamp-presence inference; never yields `failed`.
#[must_use]
pub const fn infer_status(has_completed_at: bool, has_created_at: bool) -> ReportStatus {
    if has_completed_at {
        ReportStatus::Completed
    } else if has_created_at {
        ReportStatus::Processing
    } else {
        ReportStatus::Pending
    }
}

fn locate_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => ["reports", "data", "items"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(locate_array),
        _ => None,
    }
}

fn unwrap_single(value: &Value) -> Option<&Map<String, Value>> {
    let obj = value.as_object()?;
    if obj.contains_key("make") {
        return Some(obj);
    }
    ["report", "data"]
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(unwrap_single)
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn int_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    })
}

fn time_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter().find_map(|key| parse_time(obj.get(*key)?))
}

fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use rusqlite::Connection;
use serde_json::Value as JsonValue;

pub fn db_conn<'a>(state: &'a AppState, req: &Request) -> Result<&'a Connection, serde_json::Value> {
    state
        .db
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

pub fn current_user(state: &AppState, req: &Request) -> Result<String, serde_json::Value> {
    state
        .user_id
        .clone()
        .ok_or_else(|| err(&req.id, "no_account", "open an account first", None))
}

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(v: Option<&JsonValue>) -> Result<Option<String>, &'static str> {
    match v {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => {
            let s = v.as_str().ok_or("must be string or null")?.trim().to_string();
            if s.is_empty() {
                Ok(None)
            } else {
                Ok(Some(s))
            }
        }
    }
}

/// A score entered on the marks form: a finite number between 0 and 50.
/// The aggregation core is lenient about stored values; this is the
/// form-level constraint applied at entry time.
pub fn score_in_range(v: Option<&JsonValue>) -> Result<f64, &'static str> {
    let v = v.ok_or("is required")?;
    let n = v.as_f64().ok_or("must be a number")?;
    if !n.is_finite() || !(0.0..=50.0).contains(&n) {
        return Err("must be between 0 and 50");
    }
    Ok(n)
}

pub fn non_negative_minutes(v: Option<&JsonValue>) -> Result<i64, &'static str> {
    let v = v.ok_or("is required")?;
    let n = v.as_i64().ok_or("must be an integer")?;
    if n < 0 {
        return Err("must not be negative");
    }
    Ok(n)
}

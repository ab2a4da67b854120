use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{current_user, db_conn, optional_str};
use crate::ipc::types::{AppState, Request};
use chrono::NaiveDate;
use rusqlite::OptionalExtension;
use serde_json::json;

const THEMES: [&str; 3] = ["dark", "light", "neon"];

fn handle_profile_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let row: Option<(Option<String>, Option<String>, String)> = match conn
        .query_row(
            "SELECT name, birthday, theme FROM profiles WHERE id = ?",
            [&user_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()
    {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let Some((name, birthday, theme)) = row else {
        return err(&req.id, "not_found", "profile not found", None);
    };

    ok(
        &req.id,
        json!({ "name": name, "birthday": birthday, "theme": theme }),
    )
}

fn handle_profile_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let name = match optional_str(req.params.get("name")) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", format!("name {}", msg), None),
    };
    let birthday = match optional_str(req.params.get("birthday")) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", format!("birthday {}", msg), None),
    };
    if let Some(b) = birthday.as_deref() {
        if NaiveDate::parse_from_str(b, "%Y-%m-%d").is_err() {
            return err(
                &req.id,
                "bad_params",
                "birthday must be an ISO date (YYYY-MM-DD)",
                None,
            );
        }
    }
    let theme = match optional_str(req.params.get("theme")) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", format!("theme {}", msg), None),
    };
    if let Some(t) = theme.as_deref() {
        if !THEMES.contains(&t) {
            return err(
                &req.id,
                "bad_params",
                "theme must be one of dark, light, neon",
                None,
            );
        }
    }

    let updated = match conn.execute(
        "UPDATE profiles SET
            name = COALESCE(?, name),
            birthday = COALESCE(?, birthday),
            theme = COALESCE(?, theme)
         WHERE id = ?",
        (&name, &birthday, &theme, &user_id),
    ) {
        Ok(n) => n,
        Err(e) => {
            return err(
                &req.id,
                "db_update_failed",
                e.to_string(),
                Some(json!({ "table": "profiles" })),
            )
        }
    };
    if updated == 0 {
        return err(&req.id, "not_found", "profile not found", None);
    }

    handle_profile_get(state, req)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "profile.get" => Some(handle_profile_get(state, req)),
        "profile.update" => Some(handle_profile_update(state, req)),
        _ => None,
    }
}

use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{current_user, db_conn, non_negative_minutes, optional_str, required_str};
use crate::ipc::types::{AppState, Request};
use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde_json::json;
use uuid::Uuid;

fn load_sessions(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<calc::StudySession>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT subject, target_minutes, actual_minutes, session_date
         FROM study_sessions
         WHERE user_id = ?
         ORDER BY session_date",
    )?;
    let sessions = stmt
        .query_map([user_id], |r| {
            Ok(calc::StudySession {
                subject: r.get(0)?,
                target_minutes: r.get(1)?,
                actual_minutes: r.get(2)?,
                session_date: r.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sessions)
}

fn handle_sessions_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let mut stmt = match conn.prepare(
        "SELECT id, subject, target_minutes, actual_minutes, session_date
         FROM study_sessions
         WHERE user_id = ?
         ORDER BY session_date",
    ) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    let rows = stmt
        .query_map([&user_id], |r| {
            let id: String = r.get(0)?;
            let subject: String = r.get(1)?;
            let target: i64 = r.get(2)?;
            let actual: i64 = r.get(3)?;
            let date: String = r.get(4)?;
            Ok(json!({
                "id": id,
                "subject": subject,
                "targetMinutes": target,
                "actualMinutes": actual,
                "sessionDate": date
            }))
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match rows {
        Ok(sessions) => ok(&req.id, json!({ "sessions": sessions })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_sessions_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let subject = match required_str(req, "subject") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let target = match non_negative_minutes(req.params.get("targetMinutes")) {
        Ok(v) => v,
        Err(msg) => {
            return err(&req.id, "bad_params", format!("targetMinutes {}", msg), None)
        }
    };
    let actual = match non_negative_minutes(req.params.get("actualMinutes")) {
        Ok(v) => v,
        Err(msg) => {
            return err(&req.id, "bad_params", format!("actualMinutes {}", msg), None)
        }
    };
    let session_date = match optional_str(req.params.get("sessionDate")) {
        Ok(Some(s)) => match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            Ok(_) => s,
            Err(_) => {
                return err(
                    &req.id,
                    "bad_params",
                    "sessionDate must be an ISO date (YYYY-MM-DD)",
                    None,
                )
            }
        },
        Ok(None) => Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        Err(msg) => return err(&req.id, "bad_params", format!("sessionDate {}", msg), None),
    };

    let session_id = Uuid::new_v4().to_string();
    if let Err(e) = conn.execute(
        "INSERT INTO study_sessions(id, user_id, subject, target_minutes, actual_minutes, session_date)
         VALUES(?, ?, ?, ?, ?, ?)",
        (&session_id, &user_id, &subject, target, actual, &session_date),
    ) {
        return err(
            &req.id,
            "db_insert_failed",
            e.to_string(),
            Some(json!({ "table": "study_sessions" })),
        );
    }

    ok(
        &req.id,
        json!({ "sessionId": session_id, "sessionDate": session_date }),
    )
}

fn handle_planner_timeline(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let subjects = match super::subjects::subject_names(conn, &user_id) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    let sessions = match load_sessions(conn, &user_id) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let rows = calc::study_timeline(&sessions, &subjects);
    ok(
        &req.id,
        json!({ "subjects": subjects, "rows": rows }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "sessions.list" => Some(handle_sessions_list(state, req)),
        "sessions.create" => Some(handle_sessions_create(state, req)),
        "planner.timeline" => Some(handle_planner_timeline(state, req)),
        _ => None,
    }
}

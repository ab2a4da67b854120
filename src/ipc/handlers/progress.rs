use crate::calc;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{current_user, db_conn, optional_str};
use crate::ipc::types::{AppState, Request};
use rusqlite::Connection;
use serde_json::json;

// The chart-facing seam: fetch a consistent snapshot, hand it to the pure
// core, return plain view models. Everything derived lives in calc.

fn load_score_records(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<calc::ScoreRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT subject, mcq, essay, created_seq
         FROM marks
         WHERE user_id = ?
         ORDER BY created_seq",
    )?;
    let records = stmt
        .query_map([user_id], |r| {
            Ok(calc::ScoreRecord {
                subject: r.get(0)?,
                mcq: r.get(1)?,
                essay: r.get(2)?,
                created_seq: r.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

fn handle_progress_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let single_subject = match optional_str(req.params.get("subject")) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", format!("subject {}", msg), None),
    };

    // A single-subject request keeps the caller's display case; the
    // dashboard uses the registry in its insertion order.
    let subjects = match single_subject {
        Some(s) => vec![s],
        None => match super::subjects::subject_names(conn, &user_id) {
            Ok(v) => v,
            Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
        },
    };

    let records = match load_score_records(conn, &user_id) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let models = calc::build_subject_view_models(&records, &subjects);
    ok(&req.id, json!({ "subjects": models }))
}

fn handle_dashboard_tasks(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let mut stmt = match conn.prepare(
        "SELECT id, title, completed, priority
         FROM todos
         WHERE user_id = ?
         ORDER BY created_seq DESC",
    ) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    let tasks = stmt
        .query_map([&user_id], |r| {
            Ok(calc::TaskRecord {
                id: r.get(0)?,
                title: r.get(1)?,
                completed: r.get::<_, i64>(2)? != 0,
                priority: r.get(3)?,
            })
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match tasks {
        Ok(tasks) => ok(&req.id, json!({ "tasks": calc::sort_tasks(tasks) })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "progress.overview" => Some(handle_progress_overview(state, req)),
        "dashboard.tasks" => Some(handle_dashboard_tasks(state, req)),
        _ => None,
    }
}

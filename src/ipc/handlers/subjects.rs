use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{current_user, db_conn, required_str};
use crate::ipc::types::{AppState, Request};
use rusqlite::OptionalExtension;
use serde_json::json;
use uuid::Uuid;

pub fn subject_names(
    conn: &rusqlite::Connection,
    user_id: &str,
) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT name FROM subjects WHERE user_id = ? ORDER BY sort_order",
    )?;
    let names = stmt
        .query_map([user_id], |r| r.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn handle_subjects_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let mut stmt = match conn.prepare(
        "SELECT id, name FROM subjects WHERE user_id = ? ORDER BY sort_order",
    ) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    let rows = stmt
        .query_map([&user_id], |r| {
            let id: String = r.get(0)?;
            let name: String = r.get(1)?;
            Ok(json!({ "id": id, "name": name }))
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match rows {
        Ok(subjects) => ok(&req.id, json!({ "subjects": subjects })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_subjects_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };

    // Two registry entries that collide case-insensitively would make mark
    // aggregation ambiguous. Refuse at registration time.
    let collision: Option<String> = match conn
        .query_row(
            "SELECT name FROM subjects WHERE user_id = ? AND LOWER(name) = LOWER(?)",
            (&user_id, &name),
            |r| r.get(0),
        )
        .optional()
    {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    if let Some(existing) = collision {
        return err(
            &req.id,
            "bad_params",
            format!("subject already exists as {:?}", existing),
            None,
        );
    }

    let next_order: i64 = match conn.query_row(
        "SELECT COALESCE(MAX(sort_order), 0) + 1 FROM subjects WHERE user_id = ?",
        [&user_id],
        |r| r.get(0),
    ) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let subject_id = Uuid::new_v4().to_string();
    if let Err(e) = conn.execute(
        "INSERT INTO subjects(id, user_id, name, sort_order) VALUES(?, ?, ?, ?)",
        (&subject_id, &user_id, &name, next_order),
    ) {
        return err(
            &req.id,
            "db_insert_failed",
            e.to_string(),
            Some(json!({ "table": "subjects" })),
        );
    }

    ok(&req.id, json!({ "subjectId": subject_id, "name": name }))
}

fn handle_subjects_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let deleted = match conn.execute(
        "DELETE FROM subjects WHERE user_id = ? AND LOWER(name) = LOWER(?)",
        (&user_id, &name),
    ) {
        Ok(n) => n,
        Err(e) => {
            return err(
                &req.id,
                "db_delete_failed",
                e.to_string(),
                Some(json!({ "table": "subjects" })),
            )
        }
    };
    if deleted == 0 {
        return err(&req.id, "not_found", "subject not found", None);
    }

    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subjects.list" => Some(handle_subjects_list(state, req)),
        "subjects.create" => Some(handle_subjects_create(state, req)),
        "subjects.delete" => Some(handle_subjects_delete(state, req)),
        _ => None,
    }
}

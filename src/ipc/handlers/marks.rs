use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{current_user, db_conn, optional_str, required_str, score_in_range};
use crate::ipc::types::{AppState, Request};
use rusqlite::OptionalExtension;
use serde_json::json;
use uuid::Uuid;

fn handle_marks_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    // Newest first, the order the marks table shows them.
    let mut stmt = match conn.prepare(
        "SELECT id, subject, mcq, essay, note, created_seq
         FROM marks
         WHERE user_id = ?
         ORDER BY created_seq DESC",
    ) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    let rows = stmt
        .query_map([&user_id], |r| {
            let id: String = r.get(0)?;
            let subject: String = r.get(1)?;
            let mcq: Option<f64> = r.get(2)?;
            let essay: Option<f64> = r.get(3)?;
            let note: Option<String> = r.get(4)?;
            let created_seq: i64 = r.get(5)?;
            Ok(json!({
                "id": id,
                "subject": subject,
                "mcq": mcq,
                "essay": essay,
                "total": mcq.unwrap_or(0.0) + essay.unwrap_or(0.0),
                "note": note,
                "createdSeq": created_seq
            }))
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match rows {
        Ok(marks) => ok(&req.id, json!({ "marks": marks })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_marks_create(state: &mut AppState, req: &Request) -> serde_json::Value {
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
    let mcq = match score_in_range(req.params.get("mcq")) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", format!("mcq {}", msg), None),
    };
    let essay = match score_in_range(req.params.get("essay")) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", format!("essay {}", msg), None),
    };
    let note = match optional_str(req.params.get("note")) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", format!("note {}", msg), None),
    };

    let created_seq = match db::next_created_seq(conn, "marks", &user_id) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let mark_id = Uuid::new_v4().to_string();
    if let Err(e) = conn.execute(
        "INSERT INTO marks(id, user_id, subject, mcq, essay, note, created_seq)
         VALUES(?, ?, ?, ?, ?, ?, ?)",
        (&mark_id, &user_id, &subject, mcq, essay, &note, created_seq),
    ) {
        return err(
            &req.id,
            "db_insert_failed",
            e.to_string(),
            Some(json!({ "table": "marks" })),
        );
    }

    ok(
        &req.id,
        json!({ "markId": mark_id, "createdSeq": created_seq }),
    )
}

fn handle_marks_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mark_id = match required_str(req, "markId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let existing: Option<(String, Option<f64>, Option<f64>, Option<String>)> = match conn
        .query_row(
            "SELECT subject, mcq, essay, note FROM marks WHERE id = ? AND user_id = ?",
            (&mark_id, &user_id),
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()
    {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    let Some((cur_subject, cur_mcq, cur_essay, cur_note)) = existing else {
        return err(&req.id, "not_found", "mark not found", None);
    };

    let subject = match req.params.get("subject") {
        None => cur_subject,
        Some(_) => match required_str(req, "subject") {
            Ok(v) => v,
            Err(e) => return e,
        },
    };
    let mcq = match req.params.get("mcq") {
        None => cur_mcq,
        Some(_) => match score_in_range(req.params.get("mcq")) {
            Ok(v) => Some(v),
            Err(msg) => return err(&req.id, "bad_params", format!("mcq {}", msg), None),
        },
    };
    let essay = match req.params.get("essay") {
        None => cur_essay,
        Some(_) => match score_in_range(req.params.get("essay")) {
            Ok(v) => Some(v),
            Err(msg) => return err(&req.id, "bad_params", format!("essay {}", msg), None),
        },
    };
    let note = match req.params.get("note") {
        None => cur_note,
        Some(_) => match optional_str(req.params.get("note")) {
            Ok(v) => v,
            Err(msg) => return err(&req.id, "bad_params", format!("note {}", msg), None),
        },
    };

    // Edits never touch created_seq: an edited mark keeps its position in
    // the subject series.
    if let Err(e) = conn.execute(
        "UPDATE marks SET subject = ?, mcq = ?, essay = ?, note = ?
         WHERE id = ? AND user_id = ?",
        (&subject, mcq, essay, &note, &mark_id, &user_id),
    ) {
        return err(
            &req.id,
            "db_update_failed",
            e.to_string(),
            Some(json!({ "table": "marks" })),
        );
    }

    ok(&req.id, json!({ "markId": mark_id }))
}

fn handle_marks_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mark_id = match required_str(req, "markId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let deleted = match conn.execute(
        "DELETE FROM marks WHERE id = ? AND user_id = ?",
        (&mark_id, &user_id),
    ) {
        Ok(n) => n,
        Err(e) => {
            return err(
                &req.id,
                "db_delete_failed",
                e.to_string(),
                Some(json!({ "table": "marks" })),
            )
        }
    };
    if deleted == 0 {
        return err(&req.id, "not_found", "mark not found", None);
    }

    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "marks.list" => Some(handle_marks_list(state, req)),
        "marks.create" => Some(handle_marks_create(state, req)),
        "marks.update" => Some(handle_marks_update(state, req)),
        "marks.delete" => Some(handle_marks_delete(state, req)),
        _ => None,
    }
}

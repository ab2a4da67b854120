use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{current_user, db_conn, optional_str, required_str};
use crate::ipc::types::{AppState, Request};
use rusqlite::OptionalExtension;
use serde_json::json;
use uuid::Uuid;

const PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];

fn handle_todos_list(state: &mut AppState, req: &Request) -> serde_json::Value {
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
    let rows = stmt
        .query_map([&user_id], |r| {
            let id: String = r.get(0)?;
            let title: String = r.get(1)?;
            let completed: i64 = r.get(2)?;
            let priority: String = r.get(3)?;
            Ok(json!({
                "id": id,
                "title": title,
                "completed": completed != 0,
                "priority": priority
            }))
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>());

    match rows {
        Ok(todos) => ok(&req.id, json!({ "todos": todos })),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_todos_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let title = match required_str(req, "title") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let priority = match optional_str(req.params.get("priority")) {
        Ok(v) => v.unwrap_or_else(|| "Medium".to_string()),
        Err(msg) => return err(&req.id, "bad_params", format!("priority {}", msg), None),
    };
    if !PRIORITIES.contains(&priority.as_str()) {
        return err(
            &req.id,
            "bad_params",
            "priority must be one of High, Medium, Low",
            None,
        );
    }

    let created_seq = match db::next_created_seq(conn, "todos", &user_id) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let todo_id = Uuid::new_v4().to_string();
    if let Err(e) = conn.execute(
        "INSERT INTO todos(id, user_id, title, completed, priority, created_seq)
         VALUES(?, ?, ?, 0, ?, ?)",
        (&todo_id, &user_id, &title, &priority, created_seq),
    ) {
        return err(
            &req.id,
            "db_insert_failed",
            e.to_string(),
            Some(json!({ "table": "todos" })),
        );
    }

    ok(&req.id, json!({ "todoId": todo_id }))
}

fn handle_todos_toggle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let todo_id = match required_str(req, "todoId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let updated = match conn.execute(
        "UPDATE todos SET completed = 1 - completed WHERE id = ? AND user_id = ?",
        (&todo_id, &user_id),
    ) {
        Ok(n) => n,
        Err(e) => {
            return err(
                &req.id,
                "db_update_failed",
                e.to_string(),
                Some(json!({ "table": "todos" })),
            )
        }
    };
    if updated == 0 {
        return err(&req.id, "not_found", "todo not found", None);
    }

    let completed: Option<i64> = match conn
        .query_row(
            "SELECT completed FROM todos WHERE id = ? AND user_id = ?",
            (&todo_id, &user_id),
            |r| r.get(0),
        )
        .optional()
    {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    ok(
        &req.id,
        json!({ "todoId": todo_id, "completed": completed.unwrap_or(0) != 0 }),
    )
}

fn handle_todos_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match db_conn(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let user_id = match current_user(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let todo_id = match required_str(req, "todoId") {
        Ok(v) => v,
        Err(e) => return e,
    };

    let deleted = match conn.execute(
        "DELETE FROM todos WHERE id = ? AND user_id = ?",
        (&todo_id, &user_id),
    ) {
        Ok(n) => n,
        Err(e) => {
            return err(
                &req.id,
                "db_delete_failed",
                e.to_string(),
                Some(json!({ "table": "todos" })),
            )
        }
    };
    if deleted == 0 {
        return err(&req.id, "not_found", "todo not found", None);
    }

    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "todos.list" => Some(handle_todos_list(state, req)),
        "todos.create" => Some(handle_todos_create(state, req)),
        "todos.toggle" => Some(handle_todos_toggle(state, req)),
        "todos.delete" => Some(handle_todos_delete(state, req)),
        _ => None,
    }
}

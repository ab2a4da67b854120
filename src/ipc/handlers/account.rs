use crate::ipc::error::{err, ok};
use crate::ipc::helpers::required_str;
use crate::ipc::types::{AppState, Request};
use rusqlite::OptionalExtension;
use serde_json::json;
use uuid::Uuid;

// The identity boundary. Credential checks live with the hosting shell; the
// daemon only tracks which account is current and scopes every row by it.

fn handle_account_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let email = match required_str(req, "email") {
        Ok(v) => v.to_ascii_lowercase(),
        Err(e) => return e,
    };

    let existing: Option<String> = match conn
        .query_row("SELECT id FROM profiles WHERE email = ?", [&email], |r| {
            r.get(0)
        })
        .optional()
    {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let (user_id, created) = match existing {
        Some(id) => (id, false),
        None => {
            let id = Uuid::new_v4().to_string();
            if let Err(e) = conn.execute(
                "INSERT INTO profiles(id, email) VALUES(?, ?)",
                (&id, &email),
            ) {
                return err(
                    &req.id,
                    "db_insert_failed",
                    e.to_string(),
                    Some(json!({ "table": "profiles" })),
                );
            }
            (id, true)
        }
    };

    state.user_id = Some(user_id.clone());
    state.user_email = Some(email.clone());
    ok(
        &req.id,
        json!({ "userId": user_id, "email": email, "created": created }),
    )
}

fn handle_account_current(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "userId": state.user_id,
            "email": state.user_email
        }),
    )
}

fn handle_account_close(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.user_id = None;
    state.user_email = None;
    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "account.open" => Some(handle_account_open(state, req)),
        "account.current" => Some(handle_account_current(state, req)),
        "account.close" => Some(handle_account_close(state, req)),
        _ => None,
    }
}

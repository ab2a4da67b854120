
use serde_json::json;
use test_support::{open_account, request_ok, spawn_sidecar, temp_dir};

#[test]
fn rows_are_scoped_to_the_open_account() {
    let workspace = temp_dir("gradexa-account-scope");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "alice@gradexa.app");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "marks.create",
        json!({ "subject": "Maths", "mcq": 30, "essay": 30 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "todos.create",
        json!({ "title": "alice task" }),
    );

    // Same store, different identity: nothing leaks across.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "account.open",
        json!({ "email": "bob@gradexa.app" }),
    );
    let marks = request_ok(&mut stdin, &mut reader, "4", "marks.list", json!({}));
    assert_eq!(
        marks.get("marks").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(0)
    );
    let todos = request_ok(&mut stdin, &mut reader, "5", "todos.list", json!({}));
    assert_eq!(
        todos.get("todos").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(0)
    );

    // Re-opening the first account sees its rows again.
    let reopened = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "account.open",
        json!({ "email": "alice@gradexa.app" }),
    );
    assert_eq!(reopened.get("created").and_then(|v| v.as_bool()), Some(false));
    let marks = request_ok(&mut stdin, &mut reader, "7", "marks.list", json!({}));
    assert_eq!(
        marks.get("marks").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(1)
    );
}


use serde_json::json;
use test_support::{open_account, request_err, request_ok, spawn_sidecar, temp_dir};

#[test]
fn dashboard_tasks_sort_high_to_low_with_stable_ties() {
    let workspace = temp_dir("gradexa-todos-order");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    for (i, (title, priority)) in [("A", "Low"), ("B", "High"), ("C", "Medium"), ("D", "Medium")]
        .iter()
        .enumerate()
    {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("todo-{}", i),
            "todos.create",
            json!({ "title": title, "priority": priority }),
        );
    }

    let tasks = request_ok(&mut stdin, &mut reader, "1", "dashboard.tasks", json!({}));
    let titles: Vec<&str> = tasks
        .get("tasks")
        .and_then(|v| v.as_array())
        .expect("tasks")
        .iter()
        .map(|t| t.get("title").and_then(|v| v.as_str()).expect("title"))
        .collect();
    // The task list fetches newest-first, so the Medium tie keeps D before C.
    assert_eq!(titles, vec!["B", "D", "C", "A"]);
}

#[test]
fn toggle_flips_completed_and_default_priority_is_medium() {
    let workspace = temp_dir("gradexa-todos-toggle");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "todos.create",
        json!({ "title": "past papers" }),
    );
    let todo_id = created
        .get("todoId")
        .and_then(|v| v.as_str())
        .expect("todoId")
        .to_string();

    let todos = request_ok(&mut stdin, &mut reader, "2", "todos.list", json!({}));
    let first = todos
        .get("todos")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .cloned()
        .expect("todo row");
    assert_eq!(first.get("priority").and_then(|v| v.as_str()), Some("Medium"));
    assert_eq!(first.get("completed").and_then(|v| v.as_bool()), Some(false));

    let toggled = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "todos.toggle",
        json!({ "todoId": todo_id }),
    );
    assert_eq!(toggled.get("completed").and_then(|v| v.as_bool()), Some(true));

    let toggled = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "todos.toggle",
        json!({ "todoId": todo_id }),
    );
    assert_eq!(
        toggled.get("completed").and_then(|v| v.as_bool()),
        Some(false)
    );
}

#[test]
fn unknown_priority_is_rejected_at_creation() {
    let workspace = temp_dir("gradexa-todos-priority");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    let code = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "todos.create",
        json!({ "title": "X", "priority": "Urgent" }),
    );
    assert_eq!(code, "bad_params");
}

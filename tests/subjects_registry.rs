
use serde_json::json;
use test_support::{open_account, request_err, request_ok, spawn_sidecar, temp_dir};

#[test]
fn registry_rejects_case_insensitive_collisions() {
    let workspace = temp_dir("gradexa-subjects-collision");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subjects.create",
        json!({ "name": "Maths" }),
    );
    let code = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "subjects.create",
        json!({ "name": "MATHS" }),
    );
    assert_eq!(code, "bad_params");

    // Deletion matches the same way.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "subjects.delete",
        json!({ "name": "maths" }),
    );
    let subjects = request_ok(&mut stdin, &mut reader, "4", "subjects.list", json!({}));
    assert_eq!(
        subjects
            .get("subjects")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(0)
    );
}

#[test]
fn overview_subjects_follow_registry_insertion_order() {
    let workspace = temp_dir("gradexa-subjects-order");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    for (i, name) in ["Chemistry", "Maths", "Physics"].iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("subject-{}", i),
            "subjects.create",
            json!({ "name": name }),
        );
    }

    let overview = request_ok(&mut stdin, &mut reader, "1", "progress.overview", json!({}));
    let names: Vec<&str> = overview
        .get("subjects")
        .and_then(|v| v.as_array())
        .expect("subjects")
        .iter()
        .map(|s| s.get("subject").and_then(|v| v.as_str()).expect("subject"))
        .collect();
    // Insertion order, never alphabetical.
    assert_eq!(names, vec!["Chemistry", "Maths", "Physics"]);
}

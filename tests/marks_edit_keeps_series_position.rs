
use serde_json::json;
use test_support::{open_account, request_err, request_ok, spawn_sidecar, temp_dir};

fn overview_totals(
    stdin: &mut std::process::ChildStdin,
    reader: &mut std::io::BufReader<std::process::ChildStdout>,
    id: &str,
) -> Vec<f64> {
    let overview = request_ok(
        stdin,
        reader,
        id,
        "progress.overview",
        json!({ "subject": "Maths" }),
    );
    overview
        .get("subjects")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|s| s.get("series"))
        .and_then(|v| v.as_array())
        .expect("series")
        .iter()
        .map(|p| p.get("total").and_then(|v| v.as_f64()).expect("total"))
        .collect()
}

#[test]
fn editing_a_mark_keeps_its_slot_and_deleting_relabels() {
    let workspace = temp_dir("gradexa-marks-edit");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    let mut mark_ids = Vec::new();
    for (i, (mcq, essay)) in [(10, 10), (20, 20), (30, 15)].iter().enumerate() {
        let created = request_ok(
            &mut stdin,
            &mut reader,
            &format!("mark-{}", i),
            "marks.create",
            json!({ "subject": "Maths", "mcq": mcq, "essay": essay }),
        );
        mark_ids.push(
            created
                .get("markId")
                .and_then(|v| v.as_str())
                .expect("markId")
                .to_string(),
        );
    }
    assert_eq!(overview_totals(&mut stdin, &mut reader, "1"), vec![
        20.0, 40.0, 45.0
    ]);

    // Editing the middle mark changes its totals but not its position.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "marks.update",
        json!({ "markId": mark_ids[1], "mcq": 5, "essay": 5 }),
    );
    assert_eq!(overview_totals(&mut stdin, &mut reader, "3"), vec![
        20.0, 10.0, 45.0
    ]);

    // Deleting the first mark shifts the ordinals down.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "marks.delete",
        json!({ "markId": mark_ids[0] }),
    );
    let overview = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "progress.overview",
        json!({ "subject": "Maths" }),
    );
    let series = overview
        .get("subjects")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|s| s.get("series"))
        .and_then(|v| v.as_array())
        .cloned()
        .expect("series");
    let labels: Vec<&str> = series
        .iter()
        .map(|p| p.get("label").and_then(|v| v.as_str()).expect("label"))
        .collect();
    assert_eq!(labels, vec!["Test 1", "Test 2"]);
    let totals: Vec<f64> = series
        .iter()
        .map(|p| p.get("total").and_then(|v| v.as_f64()).expect("total"))
        .collect();
    assert_eq!(totals, vec![10.0, 45.0]);
}

#[test]
fn scores_outside_the_form_range_are_rejected() {
    let workspace = temp_dir("gradexa-marks-range");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    let code = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "marks.create",
        json!({ "subject": "Maths", "mcq": 51, "essay": 10 }),
    );
    assert_eq!(code, "bad_params");

    let code = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "marks.create",
        json!({ "subject": "Maths", "mcq": 10, "essay": -1 }),
    );
    assert_eq!(code, "bad_params");

    let code = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "marks.create",
        json!({ "subject": "Maths", "mcq": "lots", "essay": 10 }),
    );
    assert_eq!(code, "bad_params");
}

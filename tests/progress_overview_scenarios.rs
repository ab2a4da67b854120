
use serde_json::json;
use test_support::{open_account, request_ok, spawn_sidecar, temp_dir};

#[test]
fn overview_builds_ordered_series_and_summary_stats() {
    let workspace = temp_dir("gradexa-progress-overview");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subjects.create",
        json!({ "name": "Maths" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subjects.create",
        json!({ "name": "Physics" }),
    );

    // Stored subject case differs from the registry; matching must not care.
    for (i, (mcq, essay)) in [(20, 15), (25, 18), (30, 20)].iter().enumerate() {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("mark-{}", i),
            "marks.create",
            json!({ "subject": "maths", "mcq": mcq, "essay": essay }),
        );
    }

    let overview = request_ok(&mut stdin, &mut reader, "3", "progress.overview", json!({}));
    let subjects = overview
        .get("subjects")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("subjects array");
    assert_eq!(subjects.len(), 2);

    let maths = &subjects[0];
    assert_eq!(maths.get("subject").and_then(|v| v.as_str()), Some("Maths"));
    let series = maths
        .get("series")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("series");
    let labels: Vec<&str> = series
        .iter()
        .map(|p| p.get("label").and_then(|v| v.as_str()).expect("label"))
        .collect();
    assert_eq!(labels, vec!["Test 1", "Test 2", "Test 3"]);
    let totals: Vec<f64> = series
        .iter()
        .map(|p| p.get("total").and_then(|v| v.as_f64()).expect("total"))
        .collect();
    assert_eq!(totals, vec![35.0, 43.0, 50.0]);

    let stats = maths.get("stats").expect("stats");
    assert_eq!(stats.get("average").and_then(|v| v.as_f64()), Some(42.7));
    assert_eq!(stats.get("stdDev").and_then(|v| v.as_f64()), Some(6.1));
    assert_eq!(
        stats.get("lastDeltaPercent").and_then(|v| v.as_str()),
        Some("16.3%")
    );
    assert_eq!(stats.get("highest").and_then(|v| v.as_f64()), Some(50.0));
    assert_eq!(stats.get("mostRecent").and_then(|v| v.as_f64()), Some(50.0));
    assert_eq!(stats.get("trend").and_then(|v| v.as_str()), Some("up"));

    // Physics has no marks: still present, empty series, all-null stats.
    let physics = &subjects[1];
    assert_eq!(
        physics.get("subject").and_then(|v| v.as_str()),
        Some("Physics")
    );
    assert_eq!(
        physics
            .get("series")
            .and_then(|v| v.as_array())
            .map(|a| a.len()),
        Some(0)
    );
    let stats = physics.get("stats").expect("stats");
    for field in [
        "average",
        "stdDev",
        "lastDeltaPercent",
        "highest",
        "mostRecent",
        "trend",
    ] {
        assert!(
            stats.get(field).map(|v| v.is_null()).unwrap_or(false),
            "expected null {} for empty series",
            field
        );
    }
}

#[test]
fn single_subject_overview_keeps_request_casing() {
    let workspace = temp_dir("gradexa-progress-single");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "marks.create",
        json!({ "subject": "Chemistry", "mcq": 40, "essay": 35 }),
    );

    let overview = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "progress.overview",
        json!({ "subject": "CHEMISTRY" }),
    );
    let subjects = overview
        .get("subjects")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("subjects array");
    assert_eq!(subjects.len(), 1);
    assert_eq!(
        subjects[0].get("subject").and_then(|v| v.as_str()),
        Some("CHEMISTRY")
    );
    let series = subjects[0]
        .get("series")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("series");
    assert_eq!(series.len(), 1);
    assert_eq!(
        series[0].get("total").and_then(|v| v.as_f64()),
        Some(75.0)
    );
}

#[test]
fn delta_is_null_when_previous_total_is_zero() {
    let workspace = temp_dir("gradexa-progress-delta-guard");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    open_account(&mut stdin, &mut reader, &workspace, "student@gradexa.app");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "marks.create",
        json!({ "subject": "Maths", "mcq": 0, "essay": 0 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "marks.create",
        json!({ "subject": "Maths", "mcq": 5, "essay": 5 }),
    );

    let overview = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "progress.overview",
        json!({ "subject": "Maths" }),
    );
    let stats = overview
        .get("subjects")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|s| s.get("stats"))
        .cloned()
        .expect("stats");
    assert!(stats
        .get("lastDeltaPercent")
        .map(|v| v.is_null())
        .unwrap_or(false));
    assert_eq!(stats.get("trend").and_then(|v| v.as_str()), Some("up"));
}

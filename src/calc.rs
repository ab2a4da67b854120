use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Projection of a marks row as the aggregation core consumes it.
/// Score fields are `None` when the stored value was absent or non-numeric;
/// the core treats those as zero rather than rejecting the record.
#[derive(Debug, Clone)]
pub struct ScoreRecord {
    pub subject: String,
    pub mcq: Option<f64>,
    pub essay: Option<f64>,
    pub created_seq: i64,
}

#[derive(Debug, Clone)]
pub struct StudySession {
    pub subject: String,
    pub target_minutes: i64,
    pub actual_minutes: i64,
    /// ISO `YYYY-MM-DD`; lexicographic order is chronological order.
    pub session_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub label: String,
    pub mcq: f64,
    pub essay: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Summary metrics over one subject series. Every field is `None` for an
/// empty series, which keeps "no data yet" distinguishable from a real zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub average: Option<f64>,
    pub std_dev: Option<f64>,
    pub last_delta_percent: Option<String>,
    pub highest: Option<f64>,
    pub most_recent: Option<f64>,
    pub trend: Option<Trend>,
}

impl SubjectStats {
    pub fn empty() -> Self {
        Self {
            average: None,
            std_dev: None,
            last_delta_percent: None,
            highest: None,
            most_recent: None,
            trend: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectViewModel {
    pub subject: String,
    pub series: Vec<SeriesPoint>,
    pub stats: SubjectStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub subject: String,
    pub target: Option<i64>,
    pub actual: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    pub date: String,
    pub entries: Vec<TimelineEntry>,
}

pub fn round1(x: f64) -> f64 {
    (10.0 * x).round() / 10.0
}

/// Chronological series for one subject: records matched case-insensitively,
/// ordered by creation sequence, labeled by ordinal position. The stored rows
/// carry no exam number; the label is purely positional.
pub fn subject_series(records: &[ScoreRecord], subject: &str) -> Vec<SeriesPoint> {
    let mut matched: Vec<&ScoreRecord> = records
        .iter()
        .filter(|r| r.subject.eq_ignore_ascii_case(subject))
        .collect();
    matched.sort_by_key(|r| r.created_seq);

    matched
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mcq = r.mcq.unwrap_or(0.0);
            let essay = r.essay.unwrap_or(0.0);
            SeriesPoint {
                label: format!("Test {}", i + 1),
                mcq,
                essay,
                total: mcq + essay,
            }
        })
        .collect()
}

/// Group a flat snapshot of score records by the given subjects. Every
/// requested subject appears in the output, with an empty series when
/// nothing matched.
pub fn aggregate(
    records: &[ScoreRecord],
    subjects: &[String],
) -> HashMap<String, Vec<SeriesPoint>> {
    let mut out = HashMap::with_capacity(subjects.len());
    for subject in subjects {
        out.insert(subject.clone(), subject_series(records, subject));
    }
    out
}

/// Summary statistics over one series.
///
/// `average` and `std_dev` are rounded to one decimal; the standard deviation
/// is the population form (divide by N) since a series is the complete known
/// history, not a sample. With a single point the delta is taken against that
/// same point, so it reads 0% unless the total is zero, which falls into the
/// division guard and yields no delta at all.
pub fn compute_stats(series: &[SeriesPoint]) -> SubjectStats {
    if series.is_empty() {
        return SubjectStats::empty();
    }

    let totals: Vec<f64> = series.iter().map(|p| p.total).collect();
    let n = totals.len() as f64;
    let mean = totals.iter().sum::<f64>() / n;
    let variance = totals.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

    let last = totals[totals.len() - 1];
    let prev = if totals.len() > 1 {
        totals[totals.len() - 2]
    } else {
        last
    };

    let last_delta_percent = if prev == 0.0 {
        None
    } else {
        Some(format!("{:.1}%", (last - prev) / prev * 100.0))
    };

    let trend = if totals.len() < 2 {
        Trend::Flat
    } else if last > prev {
        Trend::Up
    } else if last < prev {
        Trend::Down
    } else {
        Trend::Flat
    };

    let highest = totals
        .iter()
        .cloned()
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    SubjectStats {
        average: Some(round1(mean)),
        std_dev: Some(round1(variance.sqrt())),
        last_delta_percent,
        highest,
        most_recent: Some(last),
        trend: Some(trend),
    }
}

/// Assemble one view model per subject, in the given registry order. The
/// subject list is deduplicated case-insensitively (first occurrence wins);
/// display case is preserved from the list, not from the matched records.
pub fn build_subject_view_models(
    records: &[ScoreRecord],
    subjects: &[String],
) -> Vec<SubjectViewModel> {
    let mut seen = HashSet::new();
    let subjects: Vec<String> = subjects
        .iter()
        .filter(|s| seen.insert(s.to_ascii_lowercase()))
        .cloned()
        .collect();

    let mut grouped = aggregate(records, &subjects);
    subjects
        .into_iter()
        .map(|subject| {
            let series = grouped.remove(&subject).unwrap_or_default();
            let stats = compute_stats(&series);
            SubjectViewModel {
                subject,
                series,
                stats,
            }
        })
        .collect()
}

fn priority_weight(priority: &str) -> i64 {
    match priority {
        "High" => 3,
        "Low" => 1,
        // Unknown values weigh the same as Medium.
        _ => 2,
    }
}

/// Order tasks by priority, highest first. The sort is stable, so tasks with
/// equal priority keep their fetch order.
pub fn sort_tasks(mut tasks: Vec<TaskRecord>) -> Vec<TaskRecord> {
    tasks.sort_by_key(|t| std::cmp::Reverse(priority_weight(&t.priority)));
    tasks
}

/// Planned-vs-actual chart model: one row per distinct session date, sorted
/// ascending, carrying the first matching session's minutes per subject.
/// Subject matching is exact here; the planner form writes registry names
/// verbatim.
pub fn study_timeline(sessions: &[StudySession], subjects: &[String]) -> Vec<TimelineRow> {
    let mut dates: Vec<String> = sessions.iter().map(|s| s.session_date.clone()).collect();
    dates.sort();
    dates.dedup();

    dates
        .into_iter()
        .map(|date| {
            let entries = subjects
                .iter()
                .map(|subject| {
                    let hit = sessions
                        .iter()
                        .find(|s| s.subject == *subject && s.session_date == date);
                    TimelineEntry {
                        subject: subject.clone(),
                        target: hit.map(|s| s.target_minutes),
                        actual: hit.map(|s| s.actual_minutes),
                    }
                })
                .collect();
            TimelineRow { date, entries }
        })
        .collect()
}

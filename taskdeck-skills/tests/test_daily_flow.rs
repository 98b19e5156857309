//! End-to-end flow over the demo task file: prioritize, plan the day,
//! assess capacity, and produce a standup report.

use chrono::{TimeZone, Utc};
use std::path::PathBuf;
use taskdeck_core::{TaskView, estimate_capacity, prioritize, suggest_daily};
use taskdeck_skills::standup;

fn demo_tasks_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("demos")
        .join("tasks.json")
}

fn load_demo_tasks() -> Vec<TaskView> {
    let raw = std::fs::read_to_string(demo_tasks_path()).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn demo_now() -> chrono::DateTime<Utc> {
    // Fixed clock matching the demo data: t-103 is overdue, the rest
    // are upcoming, t-106 was completed yesterday.
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

#[test]
fn demo_file_ranks_as_a_permutation() {
    let tasks = load_demo_tasks();
    let out = prioritize(&tasks, demo_now()).unwrap();

    assert_eq!(out.ranked.len(), tasks.len());
    let mut orders: Vec<usize> = out.ranked.iter().map(|t| t.recommended_order).collect();
    orders.sort_unstable();
    assert_eq!(orders, (1..=tasks.len()).collect::<Vec<_>>());

    for pair in out.ranked.windows(2) {
        assert!(pair[0].priority_score >= pair[1].priority_score);
    }
}

#[test]
fn overdue_urgent_bug_ranks_first() {
    let tasks = load_demo_tasks();
    let out = prioritize(&tasks, demo_now()).unwrap();
    // urgent (100) + overdue (50) + "urgent" tag (30) + "ASAP" (20)
    assert_eq!(out.ranked[0].task.title, "Fix bug in task filtering");
    assert_eq!(out.ranked[0].priority_score, 200.0);
}

#[test]
fn demo_advisories_cover_overdue_in_progress_and_blocked() {
    let tasks = load_demo_tasks();
    let out = prioritize(&tasks, demo_now()).unwrap();
    let recs = out.recommendations.join("\n");
    assert!(recs.contains("1 overdue task(s)"));
    assert!(recs.contains("2 task(s) currently in progress"));
    assert!(recs.contains("1 blocked task(s)"));
}

#[test]
fn daily_plan_truncates_and_keeps_recommendations() {
    let tasks = load_demo_tasks();
    let plan = suggest_daily(&tasks, 3, demo_now()).unwrap();
    assert_eq!(plan.suggested.len(), 3);
    assert!(!plan.recommendations.is_empty());
}

#[test]
fn demo_capacity_counts_urgent_and_high() {
    let tasks = load_demo_tasks();
    let cap = estimate_capacity(&tasks, demo_now()).unwrap();
    // t-101, t-103, t-106, t-107
    assert_eq!(cap.urgent_high_priority, 4);
    assert!(cap.assessment.contains("Heavy workload"));
}

#[test]
fn standup_from_demo_tasks() {
    let tasks = load_demo_tasks();
    let report = standup::from_tasks(&tasks, demo_now());
    assert_eq!(report.in_progress_count, 2);
    let text = report.render();
    assert!(text.contains("Implement user authentication"));
    assert!(text.contains("Optimize database queries"));
}

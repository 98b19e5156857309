//! Standup report assembly from task lists or commit subjects.

use std::sync::LazyLock;

use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use taskdeck_core::{TaskView, parse_stamp};

static CONVENTIONAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(fix|feat|docs|style|refactor|test|chore):\s*").expect("static regex")
});
static LEADING_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(fixed|added|updated|removed|created)\s+").expect("static regex")
});

const BLOCKER_KEYWORDS: [&str; 6] = ["wip", "todo", "fixme", "blocked", "issue", "bug"];

/// The three standup buckets plus pre-fallback counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandupReport {
    pub date: NaiveDate,
    pub yesterday: Vec<String>,
    pub today: Vec<String>,
    pub blockers: Vec<String>,
    pub completed_count: usize,
    pub in_progress_count: usize,
    pub blockers_count: usize,
}

impl StandupReport {
    /// Render the report in the bullet-list layout the original
    /// standup format uses.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("📅 Daily Standup Report - {}", self.date.format("%Y-%m-%d")),
            String::new(),
            "✅ Yesterday:".to_string(),
        ];
        for item in &self.yesterday {
            lines.push(format!("   • {item}"));
        }

        lines.push(String::new());
        lines.push("🎯 Today:".to_string());
        for item in &self.today {
            lines.push(format!("   • {item}"));
        }

        lines.push(String::new());
        lines.push("🚧 Blockers:".to_string());
        for item in &self.blockers {
            lines.push(format!("   • {item}"));
        }

        lines.join("\n")
    }
}

/// Build a standup report from a task list.
///
/// Bucketing is by exact status literal: `completed` tasks whose
/// `updated_at` falls on yesterday's calendar date, `in_progress`
/// tasks as today's work, `blocked` tasks as blockers.
pub fn from_tasks(tasks: &[TaskView], now: DateTime<Utc>) -> StandupReport {
    let today = now.with_timezone(&Local).date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

    let mut done = Vec::new();
    let mut in_progress = Vec::new();
    let mut blocked = Vec::new();

    for task in tasks {
        match task.status.as_str() {
            "completed" => {
                let completed_on = task
                    .updated_at
                    .as_deref()
                    .and_then(parse_stamp)
                    .map(|stamp| stamp.local_date());
                if completed_on == Some(yesterday) {
                    done.push(task.title.clone());
                }
            }
            "in_progress" => in_progress.push(task.title.clone()),
            "blocked" => blocked.push(task.title.clone()),
            _ => {}
        }
    }

    finish_report(today, done, in_progress, blocked)
}

/// Build a standup report from commit subjects (e.g. yesterday's
/// `git log --pretty=format:%s`).
pub fn from_commits(commits: &[String], date: NaiveDate) -> StandupReport {
    let done: Vec<String> = commits
        .iter()
        .filter_map(|c| clean_commit_subject(c))
        .collect();

    let blocked: Vec<String> = commits
        .iter()
        .filter(|c| {
            let lower = c.to_lowercase();
            BLOCKER_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .map(|c| format!("Potential blocker detected: {}...", truncate(c, 50)))
        .collect();

    let today = vec![
        "Continue ongoing tasks".to_string(),
        "Address any blockers".to_string(),
    ];

    let mut report = finish_report(date, done, Vec::new(), blocked);
    report.today = today;
    report.in_progress_count = 0;
    report
}

fn finish_report(
    date: NaiveDate,
    mut done: Vec<String>,
    mut in_progress: Vec<String>,
    mut blocked: Vec<String>,
) -> StandupReport {
    let completed_count = done.len();
    let in_progress_count = in_progress.len();
    let blockers_count = blocked.len();

    if done.is_empty() {
        done.push("Continued work on ongoing projects".to_string());
    }
    if in_progress.is_empty() {
        in_progress.push("Continue ongoing tasks".to_string());
    }
    if blocked.is_empty() {
        blocked.push("No blockers".to_string());
    }

    StandupReport {
        date,
        yesterday: done,
        today: in_progress,
        blockers: blocked,
        completed_count,
        in_progress_count,
        blockers_count,
    }
}

/// Strip conventional-commit prefixes and leading past-tense verbs,
/// then capitalize. Empty results are dropped.
fn clean_commit_subject(subject: &str) -> Option<String> {
    let stripped = CONVENTIONAL_PREFIX.replace(subject, "");
    let stripped = LEADING_VERB.replace(&stripped, "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut chars = trimmed.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().collect::<String>() + chars.as_str())
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

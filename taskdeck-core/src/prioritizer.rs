//! Deadline-aware task prioritization.
//!
//! Scoring is a pure sum of independent contributions; ranking is a
//! stable descending sort over those scores. Every operation takes an
//! explicit `now` so callers and tests control the clock.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;
use crate::task::{ScoredTask, TaskView};
use crate::time::{self, IsoStamp};

/// Default `max_tasks` for [`suggest_daily`].
pub const DEFAULT_DAILY_LIMIT: usize = 5;

/// Full ranking plus advisory strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prioritized {
    pub total_tasks: usize,
    pub ranked: Vec<ScoredTask>,
    pub recommendations: Vec<String>,
}

/// Top-of-the-day cut of a ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub suggested: Vec<ScoredTask>,
    pub recommendations: Vec<String>,
}

/// Workload classification over the urgent/high bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityAssessment {
    pub total_tasks: usize,
    pub urgent_high_priority: usize,
    pub assessment: String,
    pub top_tasks: Vec<ScoredTask>,
}

/// Score a single task. Never fails: malformed sub-fields contribute
/// zero for their term instead of aborting the call.
pub fn score_task(task: &TaskView, now: DateTime<Utc>) -> f64 {
    let mut score = task.priority.base_score();

    if let Some(due) = task.due_date.as_deref().and_then(time::parse_stamp) {
        score += urgency_score(due, now);
    }

    if task.status == "in_progress" {
        score += 20.0;
    }

    if let Some(tags) = task.tags.as_deref() {
        let tags = tags.to_lowercase();
        if tags.contains("urgent") {
            score += 30.0;
        }
        if tags.contains("critical") {
            score += 25.0;
        }
        if tags.contains("blocked") {
            score -= 40.0;
        }
    }

    if let Some(description) = task.description.as_deref() {
        let description = description.to_lowercase();
        if description.contains("asap") {
            score += 20.0;
        }
        if description.contains("deadline") {
            score += 15.0;
        }
    }

    score
}

fn urgency_score(due: IsoStamp, now: DateTime<Utc>) -> f64 {
    match time::days_until(due, now) {
        d if d < 0 => 50.0,
        0 => 45.0,
        1 => 40.0,
        2..=3 => 30.0,
        4..=7 => 20.0,
        8..=14 => 10.0,
        _ => 5.0,
    }
}

/// Rank tasks by descending score and build the advisory list.
///
/// The output is a permutation of the input: same tasks, annotated
/// copies, `recommended_order` exactly `1..=N`. Equal scores keep
/// their original relative order.
pub fn prioritize(tasks: &[TaskView], now: DateTime<Utc>) -> Result<Prioritized, InvalidInput> {
    validate(tasks)?;

    let mut ranked: Vec<ScoredTask> = tasks
        .iter()
        .map(|task| ScoredTask {
            task: task.clone(),
            priority_score: score_task(task, now),
            recommended_order: 0,
        })
        .collect();

    // sort_by is stable, so exact ties keep input order.
    ranked.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

    for (idx, scored) in ranked.iter_mut().enumerate() {
        scored.recommended_order = idx + 1;
    }

    let recommendations = build_recommendations(&ranked, now);

    Ok(Prioritized {
        total_tasks: tasks.len(),
        ranked,
        recommendations,
    })
}

/// Top `max_tasks` of the ranking, with the full-list recommendations.
pub fn suggest_daily(
    tasks: &[TaskView],
    max_tasks: usize,
    now: DateTime<Utc>,
) -> Result<DailyPlan, InvalidInput> {
    let mut result = prioritize(tasks, now)?;
    result.ranked.truncate(max_tasks);
    Ok(DailyPlan {
        date: now.with_timezone(&Local).date_naive(),
        suggested: result.ranked,
        recommendations: result.recommendations,
    })
}

/// Count urgent/high tasks across the whole ranking and classify the
/// day's load.
pub fn estimate_capacity(
    tasks: &[TaskView],
    now: DateTime<Utc>,
) -> Result<CapacityAssessment, InvalidInput> {
    let result = prioritize(tasks, now)?;

    let urgent_high = result
        .ranked
        .iter()
        .filter(|t| t.task.priority.is_high())
        .count();

    let assessment = if urgent_high > 5 {
        "⚠️  Too many high-priority tasks for one day - consider rescheduling"
    } else if urgent_high > 3 {
        "⚡ Heavy workload today - stay focused and minimize distractions"
    } else {
        "✅ Workload appears manageable"
    }
    .to_string();

    let mut top_tasks = result.ranked;
    top_tasks.truncate(5);

    Ok(CapacityAssessment {
        total_tasks: tasks.len(),
        urgent_high_priority: urgent_high,
        assessment,
        top_tasks,
    })
}

fn validate(tasks: &[TaskView]) -> Result<(), InvalidInput> {
    for (index, task) in tasks.iter().enumerate() {
        if task.title.trim().is_empty() {
            return Err(InvalidInput::MissingTitle { index });
        }
    }
    Ok(())
}

fn build_recommendations(ranked: &[ScoredTask], now: DateTime<Utc>) -> Vec<String> {
    if ranked.is_empty() {
        return vec!["No tasks to prioritize".to_string()];
    }

    let mut recommendations = Vec::new();

    let top = &ranked[0];
    recommendations.push(format!(
        "🎯 Focus on: '{}' (Score: {:.1})",
        top.task.title, top.priority_score
    ));

    let overdue = ranked
        .iter()
        .filter(|t| time::is_overdue(t.task.due_date.as_deref(), now))
        .count();
    if overdue > 0 {
        recommendations.push(format!(
            "⚠️  {overdue} overdue task(s) need immediate attention"
        ));
    }

    let in_progress = ranked
        .iter()
        .filter(|t| t.task.status == "in_progress")
        .count();
    if in_progress > 0 {
        recommendations.push(format!(
            "🔄 {in_progress} task(s) currently in progress - consider completing before starting new ones"
        ));
    }

    let high_in_top5 = ranked
        .iter()
        .take(5)
        .filter(|t| t.task.priority.is_high())
        .count();
    if high_in_top5 >= 3 {
        recommendations.push(
            "🔥 Multiple high-priority tasks detected - consider delegation or timeline adjustment"
                .to_string(),
        );
    }

    let blocked = ranked
        .iter()
        .filter(|t| {
            t.task
                .tags
                .as_deref()
                .is_some_and(|tags| tags.to_lowercase().contains("blocked"))
        })
        .count();
    if blocked > 0 {
        recommendations.push(format!(
            "🚧 {blocked} blocked task(s) - address blockers to improve flow"
        ));
    }

    recommendations
}

//! Task records as supplied by the caller (task file, API layer, ...).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Priority level, parsed case-insensitively from free text.
///
/// Anything outside the four known levels lands on `Unrecognized`,
/// which scores the same as `Medium` so unknown wire values degrade
/// instead of failing the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
    Unrecognized,
}

impl Priority {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            "urgent" => Priority::Urgent,
            _ => Priority::Unrecognized,
        }
    }

    /// Base contribution to the priority score.
    pub fn base_score(self) -> f64 {
        match self {
            Priority::Low => 25.0,
            Priority::Medium | Priority::Unrecognized => 50.0,
            Priority::High => 75.0,
            Priority::Urgent => 100.0,
        }
    }

    /// The urgent/high bucket used by capacity estimation and the
    /// delegation advisory.
    pub fn is_high(self) -> bool {
        matches!(self, Priority::Urgent | Priority::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
            Priority::Unrecognized => "unrecognized",
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Priority::parse(&raw))
    }
}

/// A task as seen by the prioritization engine. Read-only: every
/// operation clones before annotating.
///
/// `status` stays free text on purpose — only the literal
/// `"in_progress"` affects scoring, while the standup skill reacts to
/// `"completed"` and `"blocked"`. A `blocked` *status* does not touch
/// the score; only the tag substring does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: String,
    /// ISO-8601 text, naive or offset-carrying. Parsed lazily; bad
    /// text contributes nothing to the score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Free text, matched by case-insensitive substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Last-modified stamp; only the standup skill reads this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl TaskView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            priority: Priority::Medium,
            status: "todo".to_string(),
            due_date: None,
            tags: None,
            description: None,
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_due_date(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: impl Into<String>) -> Self {
        self.updated_at = Some(updated_at.into());
        self
    }
}

/// A task annotated with its score and 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: TaskView,
    pub priority_score: f64,
    pub recommended_order: usize,
}

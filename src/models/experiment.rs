use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// Write whole amounts without a fractional part, so `75000` is echoed as
/// `75000` rather than `75000.0`.
pub(crate) fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // Integers beyond 2^53 are not exact in f64.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// A closed set of string values stored and transmitted by name.
///
/// Implemented by every enum on [`Experiment`] so the validator and the store
/// can share one parsing path.
pub trait Choice: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }
}

/// A tracked experiment.
///
/// Optional fields are omitted from the JSON representation when unset.
/// `custom_fields` and `results.metrics` hold arbitrary JSON and round-trip
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ExperimentStatus,
    pub category: Category,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_amount")]
    pub budget: f64,
    pub researcher: String,
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_outcomes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<ExperimentResults>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where an experiment is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    #[default]
    Planned,
    Ongoing,
    Completed,
    Paused,
    Cancelled,
}

impl Choice for ExperimentStatus {
    const ALL: &'static [Self] = &[
        Self::Planned,
        Self::Ongoing,
        Self::Completed,
        Self::Paused,
        Self::Cancelled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The kind of work an experiment represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Research,
    Testing,
    Validation,
    Prototype,
    Other,
}

impl Choice for Category {
    const ALL: &'static [Self] = &[
        Self::Research,
        Self::Testing,
        Self::Validation,
        Self::Prototype,
        Self::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Testing => "testing",
            Self::Validation => "validation",
            Self::Prototype => "prototype",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Choice for Priority {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Critical];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A person working on an experiment. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Outcome summary recorded once an experiment has produced something.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<String>,
    /// Free-form measurements, e.g. `{"accuracy": 0.89}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Value>,
}

/// A file linked to an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Defaults to the time the payload was validated.
    pub uploaded_at: DateTime<Utc>,
}

/// A validated payload for creating an experiment, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateExperimentInput {
    pub title: String,
    pub description: String,
    pub status: ExperimentStatus,
    pub category: Category,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub budget: f64,
    pub researcher: String,
    pub team: Vec<TeamMember>,
    pub objectives: Vec<String>,
    pub methodology: Option<String>,
    pub expected_outcomes: Option<String>,
    pub results: Option<ExperimentResults>,
    pub attachments: Vec<Attachment>,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub notes: Option<String>,
    pub custom_fields: Option<Value>,
}

/// A validated partial update. `None` leaves the stored value untouched.
///
/// `end_date` is doubly optional: `Some(None)` clears the stored end date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExperimentInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ExperimentStatus>,
    pub category: Option<Category>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub budget: Option<f64>,
    pub researcher: Option<String>,
    pub team: Option<Vec<TeamMember>>,
    pub objectives: Option<Vec<String>>,
    pub methodology: Option<String>,
    pub expected_outcomes: Option<String>,
    pub results: Option<ExperimentResults>,
    pub attachments: Option<Vec<Attachment>>,
    pub tags: Option<Vec<String>>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub custom_fields: Option<Value>,
}

impl UpdateExperimentInput {
    /// True when the update carries no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

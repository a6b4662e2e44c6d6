use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileStatus {
    Success,
    Failed,
    Canceled,
    Running,
    Queued,
    Warning,
    Disabled,
    ActionRequired,
    #[default]
    Unknown,
}

impl TileStatus {
    pub const ALL: [TileStatus; 9] = [
        TileStatus::Success,
        TileStatus::Failed,
        TileStatus::Canceled,
        TileStatus::Running,
        TileStatus::Queued,
        TileStatus::Warning,
        TileStatus::Disabled,
        TileStatus::ActionRequired,
        TileStatus::Unknown,
    ];

    /// Terminal statuses are the ones a finished build can carry.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TileStatus::Queued | TileStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileStatus::Success => "SUCCESS",
            TileStatus::Failed => "FAILED",
            TileStatus::Canceled => "CANCELED",
            TileStatus::Running => "RUNNING",
            TileStatus::Queued => "QUEUED",
            TileStatus::Warning => "WARNING",
            TileStatus::Disabled => "DISABLED",
            TileStatus::ActionRequired => "ACTION_REQUIRED",
            TileStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum TileType {
    GithubChecks,
    GithubIssues,
    JenkinsBuild,
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TileType::GithubChecks => "GITHUB-CHECKS",
            TileType::GithubIssues => "GITHUB-ISSUES",
            TileType::JenkinsBuild => "JENKINS-BUILD",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct Author {
    pub name: String,
    pub avatar_url: String,
}

/// Durations are whole seconds.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Tile {
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub label: String,
    pub status: TileStatus,
    #[serde(skip_serializing_if = "is_unknown")]
    pub previous_status: TileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
}

impl Tile {
    pub fn new(tile_type: TileType, label: impl Into<String>) -> Self {
        Self {
            tile_type,
            label: label.into(),
            status: TileStatus::Unknown,
            previous_status: TileStatus::Unknown,
            message: None,
            author: None,
            duration: None,
            estimated_duration: None,
            started_at: None,
            finished_at: None,
            values: Vec::new(),
        }
    }
}

fn is_unknown(status: &TileStatus) -> bool {
    *status == TileStatus::Unknown
}

/// Caller-supplied field values. Zero values (empty string, 0, `None`,
/// `TileStatus::Unknown`) mean "not overridden".
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TileOverrides {
    pub status: TileStatus,
    pub previous_status: TileStatus,
    pub author_name: String,
    pub author_avatar_url: String,
    pub duration: i64,
    pub estimated_duration: i64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ChecksParams {
    pub owner: String,
    pub repository: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(flatten)]
    pub overrides: TileOverrides,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BuildParams {
    pub job: String,
    #[serde(default)]
    pub branch: String,
    #[serde(flatten)]
    pub overrides: TileOverrides,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IssuesParams {
    pub query: String,
    #[serde(default)]
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FakerConfig {
    pub statuses: Vec<StatusWeightConfig>,
    pub reference: ReferencePolicy,
    pub finish_span_secs: i64,
    pub start_fallback_secs: i64,
    pub estimated_duration_secs: i64,
    pub unstable_probability: f64,
    pub unstable_message: String,
    pub author_name: String,
    pub author_avatar_url: String,
    pub issues_value: f64,
    pub seed: Option<u64>,
}

impl Default for FakerConfig {
    fn default() -> Self {
        Self {
            statuses: default_statuses(),
            reference: ReferencePolicy::default(),
            finish_span_secs: 5 * 60,
            start_fallback_secs: 10 * 60,
            estimated_duration_secs: 300,
            unstable_probability: 0.5,
            unstable_message: "random error message".to_string(),
            author_name: "Faker".to_string(),
            author_avatar_url: "https://www.gravatar.com/avatar/00000000000000000000000000000000"
                .to_string(),
            issues_value: 42.0,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct StatusWeightConfig {
    pub status: TileStatus,
    pub hold_secs: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum ReferencePolicy {
    FixedOffset { offset_secs: i64 },
    Randomized { window_secs: i64 },
}

impl Default for ReferencePolicy {
    fn default() -> Self {
        ReferencePolicy::Randomized { window_secs: 3600 }
    }
}

impl fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferencePolicy::FixedOffset { offset_secs } => {
                write!(f, "fixed-offset({}s)", offset_secs)
            }
            ReferencePolicy::Randomized { window_secs } => {
                write!(f, "randomized({}s)", window_secs)
            }
        }
    }
}

fn default_statuses() -> Vec<StatusWeightConfig> {
    [
        (TileStatus::Success, 30),
        (TileStatus::Failed, 30),
        (TileStatus::Canceled, 20),
        (TileStatus::Running, 60),
        (TileStatus::Queued, 30),
        (TileStatus::Warning, 20),
        (TileStatus::Disabled, 20),
        (TileStatus::ActionRequired, 20),
    ]
    .into_iter()
    .map(|(status, hold_secs)| StatusWeightConfig { status, hold_secs })
    .collect()
}

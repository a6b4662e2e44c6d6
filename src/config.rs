use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::document;
use crate::engine::{validate_overrides, TileFaker};
use crate::error::{Error, Result};
use crate::models::{
    BuildParams, ChecksParams, FakerConfig, IssuesParams, ReferencePolicy, TileOverrides,
    TileStatus,
};
use crate::state::{Clock, FixedClock, SystemClock};
use crate::unstable::build_decider;

#[derive(Parser, Debug)]
#[command(name = "tile-sim", about = "Render simulated dashboard tiles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a GitHub checks tile
    Checks(ChecksArgs),
    /// Render a Jenkins build tile
    Build(BuildArgs),
    /// Render a GitHub issues tile
    Issues(IssuesArgs),
    /// Print every tile status
    ListStatuses,
    /// Print the resolved simulation configuration
    ShowConfig(SharedArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SharedArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, help = "Render at a fixed RFC 3339 instant instead of the wall clock")]
    pub at: Option<String>,
    #[arg(
        long,
        help = "Place every reference time this many seconds before the first request"
    )]
    pub reference_offset: Option<i64>,
    #[arg(long)]
    pub unstable_probability: Option<f64>,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    #[arg(long, value_enum)]
    pub previous_status: Option<StatusArg>,
    #[arg(long)]
    pub author_name: Option<String>,
    #[arg(long)]
    pub author_avatar_url: Option<String>,
    #[arg(long, help = "Running duration in seconds")]
    pub duration: Option<i64>,
    #[arg(long, help = "Estimated duration in seconds")]
    pub estimated_duration: Option<i64>,
    #[arg(long)]
    pub started_at: Option<String>,
    #[arg(long)]
    pub finished_at: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChecksArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub repository: String,
    #[arg(long = "ref")]
    pub git_ref: String,
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
    #[arg(long)]
    pub job: String,
    #[arg(long, default_value = "")]
    pub branch: String,
    #[arg(long, help = "Resolve from recorded jobs and builds (JSON) instead of simulating")]
    pub repository: Option<PathBuf>,
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args, Debug)]
pub struct IssuesArgs {
    #[command(flatten)]
    pub shared: SharedArgs,
    #[arg(long)]
    pub query: String,
    #[arg(long = "value")]
    pub values: Vec<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FormatArg {
    #[default]
    Human,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusArg {
    Success,
    Failed,
    Canceled,
    Running,
    Queued,
    Warning,
    Disabled,
    ActionRequired,
    Unknown,
}

impl From<StatusArg> for TileStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Success => TileStatus::Success,
            StatusArg::Failed => TileStatus::Failed,
            StatusArg::Canceled => TileStatus::Canceled,
            StatusArg::Running => TileStatus::Running,
            StatusArg::Queued => TileStatus::Queued,
            StatusArg::Warning => TileStatus::Warning,
            StatusArg::Disabled => TileStatus::Disabled,
            StatusArg::ActionRequired => TileStatus::ActionRequired,
            StatusArg::Unknown => TileStatus::Unknown,
        }
    }
}

impl OverrideArgs {
    pub fn to_overrides(&self) -> Result<TileOverrides> {
        let overrides = TileOverrides {
            status: self.status.map(TileStatus::from).unwrap_or_default(),
            previous_status: self.previous_status.map(TileStatus::from).unwrap_or_default(),
            author_name: self.author_name.clone().unwrap_or_default(),
            author_avatar_url: self.author_avatar_url.clone().unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            estimated_duration: self.estimated_duration.unwrap_or_default(),
            started_at: self.started_at.as_deref().map(parse_timestamp).transpose()?,
            finished_at: self.finished_at.as_deref().map(parse_timestamp).transpose()?,
        };
        validate_overrides(&overrides)?;
        Ok(overrides)
    }
}

impl ChecksArgs {
    pub fn params(&self) -> Result<ChecksParams> {
        Ok(ChecksParams {
            owner: self.owner.clone(),
            repository: self.repository.clone(),
            git_ref: self.git_ref.clone(),
            overrides: self.overrides.to_overrides()?,
        })
    }
}

impl BuildArgs {
    pub fn params(&self) -> Result<BuildParams> {
        Ok(BuildParams {
            job: self.job.clone(),
            branch: self.branch.clone(),
            overrides: self.overrides.to_overrides()?,
        })
    }
}

impl IssuesArgs {
    pub fn params(&self) -> IssuesParams {
        IssuesParams {
            query: self.query.clone(),
            values: self.values.clone(),
        }
    }
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|e| Error::Cli(e.to_string()))
}

pub fn load_config(path: &Path) -> Result<FakerConfig> {
    document::read(path, "config")
}

/// Config file (or defaults) with command-line flags layered on top.
pub fn resolve_config(shared: &SharedArgs) -> Result<FakerConfig> {
    let mut config = match &shared.config {
        Some(path) => load_config(path)?,
        None => FakerConfig::default(),
    };
    if let Some(seed) = shared.seed {
        config.seed = Some(seed);
    }
    if let Some(offset_secs) = shared.reference_offset {
        config.reference = ReferencePolicy::FixedOffset { offset_secs };
    }
    if let Some(probability) = shared.unstable_probability {
        config.unstable_probability = probability;
    }
    Ok(config)
}

pub fn build_clock(shared: &SharedArgs) -> Result<Box<dyn Clock>> {
    match shared.at.as_deref() {
        Some(value) => Ok(Box::new(FixedClock(parse_timestamp(value)?))),
        None => Ok(Box::new(SystemClock)),
    }
}

pub fn build_faker(shared: &SharedArgs) -> Result<TileFaker> {
    let config = resolve_config(shared)?;
    let unstable = build_decider(config.unstable_probability, config.seed)?;
    TileFaker::with_parts(config, build_clock(shared)?, unstable)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(value.to_string()))
}

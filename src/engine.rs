use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::key::{humanize_branch, ResourceKey};
use crate::models::{
    Author, BuildParams, ChecksParams, FakerConfig, IssuesParams, ReferencePolicy, Tile,
    TileOverrides, TileStatus, TileType,
};
use crate::nonempty;
use crate::state::{Clock, ReferenceClock, SystemClock};
use crate::timeline::{clamped_seconds, elapsed_running_duration, shift, span, Timeline};
use crate::unstable::{build_decider, UnstableDecider};

/// Synthesizes tiles for resources whose status is simulated rather than
/// fetched. Shared across request handlers; all per-key state lives in the
/// internal [`ReferenceClock`].
pub struct TileFaker {
    config: FakerConfig,
    timeline: Timeline,
    references: ReferenceClock,
    clock: Box<dyn Clock>,
    unstable: Box<dyn UnstableDecider>,
}

impl TileFaker {
    pub fn new(config: FakerConfig) -> Result<Self> {
        let unstable = build_decider(config.unstable_probability, config.seed)?;
        Self::with_parts(config, Box::new(SystemClock), unstable)
    }

    pub fn with_parts(
        config: FakerConfig,
        clock: Box<dyn Clock>,
        unstable: Box<dyn UnstableDecider>,
    ) -> Result<Self> {
        validate_config(&config)?;
        let timeline = Timeline::from_config(&config.statuses)?;
        let references = ReferenceClock::new(config.reference.clone(), config.seed);

        Ok(Self {
            config,
            timeline,
            references,
            clock,
            unstable,
        })
    }

    pub fn config(&self) -> &FakerConfig {
        &self.config
    }

    pub fn references(&self) -> &ReferenceClock {
        &self.references
    }

    pub fn checks(&self, params: &ChecksParams) -> Result<Tile> {
        let key = ResourceKey::checks(&params.owner, &params.repository, &params.git_ref)?;
        let label = format!(
            "{}\n{}",
            params.repository,
            humanize_branch(&params.git_ref)
        );
        validate_overrides(&params.overrides)?;
        let tile = Tile::new(TileType::GithubChecks, label);
        Ok(self.synthesize(tile, &key, &params.overrides))
    }

    pub fn build(&self, params: &BuildParams) -> Result<Tile> {
        let key = ResourceKey::build(&params.job, &params.branch)?;
        validate_overrides(&params.overrides)?;
        let tile = Tile::new(TileType::JenkinsBuild, build_label(params));
        Ok(self.synthesize(tile, &key, &params.overrides))
    }

    pub fn issues(&self, params: &IssuesParams) -> Result<Tile> {
        if params.query.trim().is_empty() {
            return Err(Error::EmptyIdentity("query"));
        }
        let mut tile = Tile::new(TileType::GithubIssues, params.query.clone());
        tile.status = TileStatus::Success;
        tile.values = if params.values.is_empty() {
            vec![self.config.issues_value]
        } else {
            params.values.clone()
        };
        Ok(tile)
    }

    fn simulated_status(&self, key: &ResourceKey, now: DateTime<Utc>) -> TileStatus {
        let reference = self.references.reference_time_for(key, now);
        self.timeline.current_status(reference, now)
    }

    fn synthesize(&self, mut tile: Tile, key: &ResourceKey, overrides: &TileOverrides) -> Tile {
        let now = self.clock.now();

        tile.status = nonempty::status(overrides.status, self.simulated_status(key, now));
        debug!(key = %key, status = %tile.status, "resolved tile status");

        if tile.status == TileStatus::Disabled {
            return tile;
        }

        if tile.status == TileStatus::Warning && self.unstable.is_unstable() {
            trace!(key = %key, "reporting warning as unstable build");
            tile.message = Some(self.config.unstable_message.clone());
            return tile;
        }

        tile.previous_status = nonempty::status(overrides.previous_status, TileStatus::Success);

        if tile.status == TileStatus::Failed {
            tile.author = Some(Author {
                name: nonempty::string(&overrides.author_name, &self.config.author_name),
                avatar_url: nonempty::string(
                    &overrides.author_avatar_url,
                    &self.config.author_avatar_url,
                ),
            });
        }

        if tile.status == TileStatus::Running {
            let estimated = nonempty::duration(
                clamped_seconds(overrides.estimated_duration),
                clamped_seconds(self.config.estimated_duration_secs),
            );
            let reference = self.references.reference_time_for(key, now);
            let simulated = elapsed_running_duration(reference, now, estimated);
            tile.duration = Some(nonempty::int64(overrides.duration, simulated.num_seconds()));
            tile.estimated_duration = Some(if tile.previous_status == TileStatus::Unknown {
                0
            } else {
                estimated.num_seconds()
            });
        }

        let started_default = match tile.duration {
            Some(duration) => shift(now, -clamped_seconds(duration)),
            None => shift(now, -clamped_seconds(self.config.start_fallback_secs)),
        };
        let started_at = nonempty::time(overrides.started_at, started_default);
        tile.started_at = Some(started_at);

        if tile.status.is_terminal() {
            tile.finished_at = Some(nonempty::time(
                overrides.finished_at,
                shift(started_at, clamped_seconds(self.config.finish_span_secs)),
            ));
        }

        tile
    }
}

pub(crate) fn build_label(params: &BuildParams) -> String {
    if params.branch.is_empty() {
        params.job.clone()
    } else {
        format!("{}\n{}", params.job, humanize_branch(&params.branch))
    }
}

/// Rejects duration overrides too large to place on the calendar.
pub fn validate_overrides(overrides: &TileOverrides) -> Result<()> {
    span("duration", overrides.duration)?;
    span("estimated_duration", overrides.estimated_duration)?;
    Ok(())
}

pub fn validate_config(config: &FakerConfig) -> Result<()> {
    Timeline::from_config(&config.statuses)?;
    span("finish_span_secs", config.finish_span_secs)?;
    span("start_fallback_secs", config.start_fallback_secs)?;
    span("estimated_duration_secs", config.estimated_duration_secs)?;
    let (field, secs) = match config.reference {
        ReferencePolicy::FixedOffset { offset_secs } => ("offset_secs", offset_secs),
        ReferencePolicy::Randomized { window_secs } => ("window_secs", window_secs),
    };
    span(field, secs)?;
    if !(0.0..=1.0).contains(&config.unstable_probability) {
        return Err(Error::InvalidProbability(config.unstable_probability));
    }
    if config.estimated_duration_secs <= 0 {
        return Err(Error::InvalidEstimatedDuration(
            config.estimated_duration_secs,
        ));
    }
    Ok(())
}

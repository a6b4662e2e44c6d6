use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::engine::{build_label, validate_overrides};
use crate::error::{Error, Result};
use crate::key::ResourceKey;
use crate::models::{Author, BuildParams, Tile, TileOverrides, TileStatus, TileType};
use crate::nonempty;
use crate::repository::{Build, BuildRepository};
use crate::state::Clock;
use crate::timeline::{clamped_seconds, shift};

/// Build tiles resolved from recorded job and build data. Field overrides
/// apply at the same points as in [`crate::engine::TileFaker`]; the status
/// always comes from the records.
pub struct RepositoryTiles<R> {
    repository: R,
    clock: Box<dyn Clock>,
    default_author: Author,
}

impl<R: BuildRepository> RepositoryTiles<R> {
    /// `default_author` fills in whatever a failed build did not record.
    pub fn new(repository: R, clock: Box<dyn Clock>, default_author: Author) -> Self {
        Self {
            repository,
            clock,
            default_author,
        }
    }

    pub fn build(&self, params: &BuildParams) -> Result<Tile> {
        ResourceKey::build(&params.job, &params.branch)?;
        validate_overrides(&params.overrides)?;
        let overrides = &params.overrides;
        let mut tile = Tile::new(TileType::JenkinsBuild, build_label(params));

        let job = self.repository.job(&params.job, &params.branch)?;
        if !job.buildable {
            tile.status = TileStatus::Disabled;
            return Ok(tile);
        }

        let now = self.clock.now();
        if job.in_queue {
            let previous = match self.repository.last_build(&job) {
                Ok(build) => build.result,
                Err(Error::BuildNotFound(_)) => TileStatus::Unknown,
                Err(err) => return Err(err),
            };
            return Ok(queued(tile, overrides, previous, job.queued_at.unwrap_or(now)));
        }

        let build = self.repository.last_build(&job)?;
        debug!(job = %job.name, number = build.number, "resolved last build");

        match build.result {
            _ if build.building => Ok(running(tile, overrides, &build, now)),
            TileStatus::Running => Ok(running(tile, overrides, &build, now)),
            TileStatus::Queued => {
                let started = job.queued_at.unwrap_or(build.started_at);
                Ok(queued(tile, overrides, build.previous_result, started))
            }
            TileStatus::Unknown => {
                warn!(job = %job.name, number = build.number, "finished build has no result");
                Err(Error::MalformedBuild {
                    job: job.name,
                    number: build.number,
                })
            }
            TileStatus::Disabled => {
                tile.status = TileStatus::Disabled;
                Ok(tile)
            }
            result => Ok(self.finished(tile, overrides, &build, result)),
        }
    }

    fn finished(
        &self,
        mut tile: Tile,
        overrides: &TileOverrides,
        build: &Build,
        result: TileStatus,
    ) -> Tile {
        tile.status = result;
        tile.previous_status = nonempty::status(overrides.previous_status, build.previous_result);

        if tile.status == TileStatus::Failed {
            let recorded = build.author.clone().unwrap_or_default();
            let name = nonempty::string(&recorded.name, &self.default_author.name);
            let avatar_url =
                nonempty::string(&recorded.avatar_url, &self.default_author.avatar_url);
            tile.author = Some(Author {
                name: nonempty::string(&overrides.author_name, &name),
                avatar_url: nonempty::string(&overrides.author_avatar_url, &avatar_url),
            });
        }

        let started_at = nonempty::time(overrides.started_at, build.started_at);
        tile.started_at = Some(started_at);
        if tile.status.is_terminal() {
            tile.finished_at = Some(nonempty::time(
                overrides.finished_at,
                shift(started_at, clamped_seconds(build.duration_secs)),
            ));
        }
        tile
    }
}

fn queued(
    mut tile: Tile,
    overrides: &TileOverrides,
    previous: TileStatus,
    queued_at: DateTime<Utc>,
) -> Tile {
    tile.status = TileStatus::Queued;
    tile.previous_status = nonempty::status(overrides.previous_status, previous);
    tile.started_at = Some(nonempty::time(overrides.started_at, queued_at));
    tile
}

fn running(mut tile: Tile, overrides: &TileOverrides, build: &Build, now: DateTime<Utc>) -> Tile {
    tile.status = TileStatus::Running;
    tile.previous_status = nonempty::status(overrides.previous_status, build.previous_result);
    let duration = nonempty::int64(
        overrides.duration,
        (now - build.started_at).num_seconds().max(0),
    );
    tile.duration = Some(duration);
    tile.estimated_duration = Some(if tile.previous_status == TileStatus::Unknown {
        0
    } else {
        nonempty::int64(overrides.estimated_duration, build.estimated_duration_secs)
    });
    tile.started_at = Some(nonempty::time(
        overrides.started_at,
        shift(now, -clamped_seconds(duration)),
    ));
    tile
}

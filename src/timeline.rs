use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::models::{StatusWeightConfig, TileStatus};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusWeight {
    pub status: TileStatus,
    pub hold: Duration,
}

impl StatusWeight {
    pub fn new(status: TileStatus, hold: Duration) -> Self {
        Self { status, hold }
    }
}

impl TryFrom<&StatusWeightConfig> for StatusWeight {
    type Error = Error;

    fn try_from(value: &StatusWeightConfig) -> Result<Self> {
        Ok(Self::new(value.status, span("hold_secs", value.hold_secs)?))
    }
}

/// Largest span, in seconds, accepted from callers and configuration.
pub const MAX_SPAN_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Converts caller-supplied seconds, rejecting spans beyond [`MAX_SPAN_SECS`].
pub fn span(field: &'static str, secs: i64) -> Result<Duration> {
    let out_of_range = Error::SpanOutOfRange {
        field,
        secs,
        limit: MAX_SPAN_SECS,
    };
    if !(-MAX_SPAN_SECS..=MAX_SPAN_SECS).contains(&secs) {
        return Err(out_of_range);
    }
    Duration::try_seconds(secs).ok_or(out_of_range)
}

/// Seconds clamped into [`MAX_SPAN_SECS`]; never panics.
pub fn clamped_seconds(secs: i64) -> Duration {
    Duration::seconds(secs.clamp(-MAX_SPAN_SECS, MAX_SPAN_SECS))
}

/// `at + delta`, saturating at the ends of the representable date range.
pub fn shift(at: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    match at.checked_add_signed(delta) {
        Some(shifted) => shifted,
        None if delta < Duration::zero() => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// A cyclic status table. The status at a given elapsed time is found by
/// reducing the elapsed time modulo the period and locating it in the
/// cumulative hold durations.
#[derive(Clone, Debug)]
pub struct Timeline {
    statuses: Vec<TileStatus>,
    prefix_sums_ms: Vec<i64>,
    period_ms: i64,
}

impl Timeline {
    pub fn new(weights: &[StatusWeight]) -> Result<Self> {
        if weights.is_empty() {
            return Err(Error::EmptyStatusWeights);
        }

        let mut statuses = Vec::with_capacity(weights.len());
        let mut prefix_sums_ms = Vec::with_capacity(weights.len());
        let mut total_ms = 0i64;
        for weight in weights {
            if weight.hold < Duration::zero() {
                return Err(Error::NegativeHoldDuration(weight.status.to_string()));
            }
            if weight.hold > Duration::seconds(MAX_SPAN_SECS) {
                return Err(Error::SpanOutOfRange {
                    field: "hold",
                    secs: weight.hold.num_seconds(),
                    limit: MAX_SPAN_SECS,
                });
            }
            total_ms = total_ms
                .checked_add(weight.hold.num_milliseconds())
                .ok_or(Error::SpanOutOfRange {
                    field: "status period",
                    secs: i64::MAX,
                    limit: MAX_SPAN_SECS,
                })?;
            statuses.push(weight.status);
            prefix_sums_ms.push(total_ms);
        }

        if total_ms == 0 {
            return Err(Error::ZeroStatusPeriod);
        }

        Ok(Self {
            statuses,
            prefix_sums_ms,
            period_ms: total_ms,
        })
    }

    pub fn from_config(weights: &[StatusWeightConfig]) -> Result<Self> {
        let weights = weights
            .iter()
            .map(StatusWeight::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(&weights)
    }

    pub fn period(&self) -> Duration {
        Duration::milliseconds(self.period_ms)
    }

    /// Status held at `elapsed` into the cycle. Negative elapsed times wrap
    /// backwards, so a reference in the future still maps onto the table.
    pub fn status_at(&self, elapsed: Duration) -> TileStatus {
        let position = elapsed.num_milliseconds().rem_euclid(self.period_ms);
        let idx = self
            .prefix_sums_ms
            .binary_search_by(|sum| {
                if *sum > position {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Less
                }
            })
            .unwrap_or_else(|idx| idx);

        self.statuses[idx]
    }

    pub fn current_status(&self, reference: DateTime<Utc>, now: DateTime<Utc>) -> TileStatus {
        self.status_at(now - reference)
    }
}

/// One-shot form of [`Timeline::current_status`]; rejects an empty or
/// zero-length table.
pub fn current_status(
    reference: DateTime<Utc>,
    now: DateTime<Utc>,
    weights: &[StatusWeight],
) -> Result<TileStatus> {
    Ok(Timeline::new(weights)?.current_status(reference, now))
}

/// How far into a run of length `estimated` the simulated build is.
/// Always within `[0, estimated)`; zero when `estimated` is not positive.
pub fn elapsed_running_duration(
    reference: DateTime<Utc>,
    now: DateTime<Utc>,
    estimated: Duration,
) -> Duration {
    let estimated_ms = estimated.num_milliseconds();
    if estimated_ms <= 0 {
        return Duration::zero();
    }
    let elapsed_ms = (now - reference).num_milliseconds();
    Duration::milliseconds(elapsed_ms.rem_euclid(estimated_ms))
}

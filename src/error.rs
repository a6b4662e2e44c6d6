use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} must not be empty")]
    EmptyIdentity(&'static str),
    #[error("status table must not be empty")]
    EmptyStatusWeights,
    #[error("status table must have a total hold duration greater than 0")]
    ZeroStatusPeriod,
    #[error("hold duration must be >= 0 for status '{0}'")]
    NegativeHoldDuration(String),
    #[error("unstable probability must be within [0, 1] (got {0})")]
    InvalidProbability(f64),
    #[error("estimated duration must be > 0 (got {0}s)")]
    InvalidEstimatedDuration(i64),
    #[error("{field} must be within {limit} seconds of zero (got {secs})")]
    SpanOutOfRange {
        field: &'static str,
        secs: i64,
        limit: i64,
    },
    #[error("job '{job}' not found (branch: '{branch}')")]
    JobNotFound { job: String, branch: String },
    #[error("no build found for job '{0}'")]
    BuildNotFound(String),
    #[error("build #{number} of job '{job}' has no result")]
    MalformedBuild { job: String, number: u64 },
    #[error("invalid timestamp '{0}': expected RFC 3339")]
    InvalidTimestamp(String),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

impl Error {
    /// Whether the failure is the caller's fault rather than a missing record.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::EmptyIdentity(_)
                | Error::EmptyStatusWeights
                | Error::ZeroStatusPeriod
                | Error::NegativeHoldDuration(_)
                | Error::InvalidProbability(_)
                | Error::InvalidEstimatedDuration(_)
                | Error::SpanOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

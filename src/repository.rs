use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document;
use crate::error::{Error, Result};
use crate::models::{Author, TileStatus};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Job {
    pub name: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default = "default_buildable")]
    pub buildable: bool,
    #[serde(default)]
    pub in_queue: bool,
    #[serde(default)]
    pub queued_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Build {
    pub number: u64,
    #[serde(default)]
    pub result: TileStatus,
    #[serde(default)]
    pub building: bool,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_secs: i64,
    #[serde(default)]
    pub estimated_duration_secs: i64,
    #[serde(default)]
    pub author: Option<Author>,
    /// Result of the build before this one, `Unknown` when there is none.
    #[serde(default)]
    pub previous_result: TileStatus,
}

/// Source of recorded job and build data.
pub trait BuildRepository: Send + Sync {
    fn job(&self, name: &str, branch: &str) -> Result<Job>;
    fn last_build(&self, job: &Job) -> Result<Build>;
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct JobRecord {
    #[serde(flatten)]
    pub job: Job,
    #[serde(default)]
    pub builds: Vec<Build>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct InMemoryRepository {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

impl InMemoryRepository {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        Self { jobs }
    }

    /// Loads recorded jobs from a `.json` or `.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        document::read(path, "repository")
    }

    fn record(&self, name: &str, branch: &str) -> Option<&JobRecord> {
        self.jobs
            .iter()
            .find(|record| record.job.name == name && record.job.branch == branch)
    }
}

impl BuildRepository for InMemoryRepository {
    fn job(&self, name: &str, branch: &str) -> Result<Job> {
        self.record(name, branch)
            .map(|record| record.job.clone())
            .ok_or_else(|| Error::JobNotFound {
                job: name.to_string(),
                branch: branch.to_string(),
            })
    }

    fn last_build(&self, job: &Job) -> Result<Build> {
        self.record(&job.name, &job.branch)
            .and_then(|record| record.builds.iter().max_by_key(|build| build.number))
            .cloned()
            .ok_or_else(|| Error::BuildNotFound(job.name.clone()))
    }
}

fn default_buildable() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn build(number: u64, result: TileStatus) -> Build {
        Build {
            number,
            result,
            building: false,
            started_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            duration_secs: 60,
            estimated_duration_secs: 60,
            author: None,
            previous_result: TileStatus::Unknown,
        }
    }

    fn repository() -> InMemoryRepository {
        InMemoryRepository::new(vec![
            JobRecord {
                job: Job {
                    name: "deploy".to_string(),
                    branch: "main".to_string(),
                    buildable: true,
                    in_queue: false,
                    queued_at: None,
                },
                builds: vec![build(7, TileStatus::Success), build(9, TileStatus::Failed)],
            },
            JobRecord {
                job: Job {
                    name: "nightly".to_string(),
                    branch: String::new(),
                    buildable: true,
                    in_queue: false,
                    queued_at: None,
                },
                builds: Vec::new(),
            },
        ])
    }

    #[test]
    fn job_lookup_matches_name_and_branch() {
        let repo = repository();
        assert_eq!(repo.job("deploy", "main").unwrap().name, "deploy");
        let err = repo.job("deploy", "dev").unwrap_err();
        assert_eq!(err.to_string(), "job 'deploy' not found (branch: 'dev')");
    }

    #[test]
    fn last_build_is_highest_number() {
        let repo = repository();
        let job = repo.job("deploy", "main").unwrap();
        let last = repo.last_build(&job).unwrap();
        assert_eq!(last.number, 9);
        assert_eq!(last.result, TileStatus::Failed);
    }

    #[test]
    fn missing_builds_are_not_found() {
        let repo = repository();
        let job = repo.job("nightly", "").unwrap();
        assert!(matches!(repo.last_build(&job), Err(Error::BuildNotFound(name)) if name == "nightly"));
    }

    #[test]
    fn repository_parses_from_json() {
        let json = r#"{
            "jobs": [
                {
                    "name": "deploy",
                    "buildable": false,
                    "builds": [
                        { "number": 1, "result": "ACTION_REQUIRED", "started_at": "2024-03-01T08:00:00Z" }
                    ]
                }
            ]
        }"#;
        let repo: InMemoryRepository = serde_json::from_str(json).unwrap();
        let job = repo.job("deploy", "").unwrap();
        assert!(!job.buildable);
        assert_eq!(
            repo.last_build(&job).unwrap().result,
            TileStatus::ActionRequired
        );
    }
}

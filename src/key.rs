use std::fmt;

use tracing::warn;

use crate::error::{Error, Result};

/// Identity of a simulated resource. Equal identity parts always produce
/// equal keys.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn checks(owner: &str, repository: &str, git_ref: &str) -> Result<Self> {
        require("owner", owner)?;
        require("repository", repository)?;
        require("ref", git_ref)?;
        Ok(Self(format!("{}-{}-{}", owner, repository, git_ref)))
    }

    pub fn build(job: &str, branch: &str) -> Result<Self> {
        require("job", job)?;
        Ok(Self(format!("{}-{}", job, branch)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        warn!(field, "rejected tile request with empty identity");
        return Err(Error::EmptyIdentity(field));
    }
    Ok(())
}

/// `refs/heads/main` -> `@main`. Empty stays empty.
pub fn humanize_branch(branch: &str) -> String {
    if branch.is_empty() {
        return String::new();
    }
    format!("@{}", branch.trim_start_matches("refs/heads/"))
}

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Outcome of a finished Jenkins build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
    #[serde(other)]
    Unknown,
}

/// One build from a job's `allBuilds` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Build number, increasing per job
    #[serde(default)]
    pub number: u64,
    /// When the build started
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Build duration in milliseconds
    pub duration: u64,
    /// Node the build ran on; empty for the controller
    #[serde(default)]
    pub built_on: String,
    /// `None` while the build is still running
    pub result: Option<BuildResult>,
}

impl Build {
    pub fn succeeded(&self) -> bool {
        self.result == Some(BuildResult::Success)
    }
}

/// A job as listed by the server, identified by name and its base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct JobIndex {
    pub jobs: Vec<JobRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AllBuilds {
    #[serde(default)]
    pub all_builds: Vec<Build>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BuildNumber {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct JobBuilds {
    #[serde(default)]
    pub builds: Vec<BuildNumber>,
}

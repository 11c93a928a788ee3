//! Jenkins URL scheme.
//!
//! Every request path the client sends is built here. Job URLs come back
//! from the server (usually absolute, ending in `/`) and are resolved against
//! the client's base URL, so both absolute and relative forms work.

use super::types::JobRef;

const API: &str = "api/json";

/// Fields requested for every build when computing build times.
const BUILD_TIMES_TREE: &str = "allBuilds[number,timestamp,duration,builtOn,result]";

/// Root listing of all jobs.
pub fn index_path() -> String {
    format!("/{API}")
}

/// API path for a job by name.
pub fn job_path(name: &str) -> String {
    format!("/job/{name}/{API}")
}

/// API path for the full build history of a job, one request, no paging.
pub fn build_times_path(name: &str) -> String {
    format!("{}?depth=1&tree={BUILD_TIMES_TREE}", job_path(name))
}

/// API path for the last build of a job.
pub fn last_build_path(job: &JobRef) -> String {
    format!("{}lastBuild/{API}", job_base(job))
}

/// API path for a job reached through its server-reported URL.
pub fn job_api_path(job: &JobRef) -> String {
    format!("{}{API}", job_base(job))
}

/// Plain-text console output of a build.
pub fn log_path(job: &JobRef, build_number: u64) -> String {
    format!("{}{build_number}/consoleText", job_base(job))
}

/// XML configuration of a job.
pub fn config_path(job: &JobRef) -> String {
    format!("{}config.xml", job_base(job))
}

fn job_base(job: &JobRef) -> String {
    if job.url.ends_with('/') {
        job.url.clone()
    } else {
        format!("{}/", job.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(url: &str) -> JobRef {
        JobRef {
            name: "deploy".to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_index_path() {
        assert_eq!(index_path(), "/api/json");
    }

    #[test]
    fn test_job_path() {
        assert_eq!(job_path("deploy"), "/job/deploy/api/json");
    }

    #[test]
    fn test_build_times_path_requests_all_builds() {
        assert_eq!(
            build_times_path("deploy"),
            "/job/deploy/api/json?depth=1&tree=allBuilds[number,timestamp,duration,builtOn,result]"
        );
    }

    #[test]
    fn test_log_path() {
        let job = job("http://ci.example.com/job/deploy/");
        assert_eq!(
            log_path(&job, 17),
            "http://ci.example.com/job/deploy/17/consoleText"
        );
    }

    #[test]
    fn test_config_path() {
        let job = job("http://ci.example.com/job/deploy/");
        assert_eq!(
            config_path(&job),
            "http://ci.example.com/job/deploy/config.xml"
        );
    }

    #[test]
    fn test_last_build_path() {
        let job = job("http://ci.example.com/job/deploy/");
        assert_eq!(
            last_build_path(&job),
            "http://ci.example.com/job/deploy/lastBuild/api/json"
        );
    }

    #[test]
    fn test_job_url_without_trailing_slash() {
        let job = job("/job/deploy");
        assert_eq!(job_api_path(&job), "/job/deploy/api/json");
        assert_eq!(log_path(&job, 3), "/job/deploy/3/consoleText");
    }
}

use log::debug;

use super::core::JenkinsClient;
use crate::error::Result;
use crate::jenkins::paths;
use crate::jenkins::types::{AllBuilds, Build, BuildNumber, JobBuilds, JobIndex, JobRef};

impl JenkinsClient {
    /// All jobs on the server's front page.
    pub async fn list_jobs(&self) -> Result<Vec<JobRef>> {
        let index: JobIndex = self.get_json(&paths::index_path()).await?;
        Ok(index.jobs)
    }

    /// Look up a job by name.
    pub async fn job(&self, name: &str) -> Result<JobRef> {
        self.get_json(&paths::job_path(name)).await
    }

    /// The whole build history of a job in one request.
    pub async fn all_builds(&self, job_name: &str) -> Result<Vec<Build>> {
        let response: AllBuilds = self
            .get_json(&paths::build_times_path(job_name))
            .await?;

        debug!(
            "Fetched {} builds for job {job_name}",
            response.all_builds.len()
        );

        Ok(response.all_builds)
    }

    pub async fn last_build_number(&self, job: &JobRef) -> Result<u64> {
        let build: BuildNumber = self.get_json(&paths::last_build_path(job)).await?;
        Ok(build.number)
    }

    /// Numbers of the builds the server still keeps for a job, newest first.
    pub async fn build_numbers(&self, job: &JobRef) -> Result<Vec<u64>> {
        let job_builds: JobBuilds = self.get_json(&paths::job_api_path(job)).await?;
        Ok(job_builds.builds.into_iter().map(|b| b.number).collect())
    }

    pub async fn console_log(&self, job: &JobRef, build_number: u64) -> Result<String> {
        self.get(&paths::log_path(job, build_number)).await
    }

    /// The job's `config.xml`, returned as raw text.
    pub async fn job_config(&self, job: &JobRef) -> Result<String> {
        self.get(&paths::config_path(job)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credentials, Token};
    use crate::error::JobStatsError;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> JenkinsClient {
        JenkinsClient::new(&server.url(), &Credentials::new("alice", Token::from("secret")))
            .unwrap()
    }

    fn job_ref(server: &Server) -> JobRef {
        JobRef {
            name: "deploy".to_string(),
            url: format!("{}/job/deploy/", server.url()),
        }
    }

    #[tokio::test]
    async fn test_list_jobs() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/json")
            .with_status(200)
            .with_body(
                r#"{"jobs": [
                    {"name": "build", "url": "http://ci/job/build/", "color": "blue"},
                    {"name": "deploy", "url": "http://ci/job/deploy/", "color": "red"}
                ]}"#,
            )
            .create_async()
            .await;

        let jobs = client_for(&server).list_jobs().await.unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].name, "build");
        assert_eq!(jobs[1].url, "http://ci/job/deploy/");
    }

    #[tokio::test]
    async fn test_job_lookup() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/job/deploy/api/json")
            .with_status(200)
            .with_body(r#"{"name": "deploy", "url": "http://ci/job/deploy/", "builds": []}"#)
            .create_async()
            .await;

        let job = client_for(&server).job("deploy").await.unwrap();

        assert_eq!(job.name, "deploy");
        assert_eq!(job.url, "http://ci/job/deploy/");
    }

    #[tokio::test]
    async fn test_all_builds_requests_tree_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/job/deploy/api/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("depth".into(), "1".into()),
                Matcher::UrlEncoded(
                    "tree".into(),
                    "allBuilds[number,timestamp,duration,builtOn,result]".into(),
                ),
            ]))
            .with_status(200)
            .with_body(
                r#"{"allBuilds": [
                    {"number": 2, "timestamp": 2000, "duration": 60000, "builtOn": "a", "result": "SUCCESS"},
                    {"number": 1, "timestamp": 1000, "duration": 30000, "builtOn": "", "result": "FAILURE"}
                ]}"#,
            )
            .create_async()
            .await;

        let builds = client_for(&server).all_builds("deploy").await.unwrap();

        assert_eq!(builds.len(), 2);
        assert_eq!(builds[0].number, 2);
        assert_eq!(builds[1].built_on, "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_all_builds_unexpected_shape_is_malformed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/job/deploy/api/json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"allBuilds": [{"duration": "soon"}]}"#)
            .create_async()
            .await;

        let result = client_for(&server).all_builds("deploy").await;

        assert!(matches!(
            result,
            Err(JobStatsError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_last_build_number() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/job/deploy/lastBuild/api/json")
            .with_status(200)
            .with_body(r#"{"number": 128, "result": "SUCCESS"}"#)
            .create_async()
            .await;

        let job = job_ref(&server);
        let number = client_for(&server).last_build_number(&job).await.unwrap();

        assert_eq!(number, 128);
    }

    #[tokio::test]
    async fn test_build_numbers() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/job/deploy/api/json")
            .with_status(200)
            .with_body(r#"{"builds": [{"number": 12}, {"number": 11}, {"number": 9}]}"#)
            .create_async()
            .await;

        let job = job_ref(&server);
        let numbers = client_for(&server).build_numbers(&job).await.unwrap();

        assert_eq!(numbers, vec![12, 11, 9]);
    }

    #[tokio::test]
    async fn test_console_log() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/job/deploy/12/consoleText")
            .with_status(200)
            .with_body("Started by user alice\nFinished: SUCCESS\n")
            .create_async()
            .await;

        let job = job_ref(&server);
        let log = client_for(&server).console_log(&job, 12).await.unwrap();

        assert!(log.ends_with("Finished: SUCCESS\n"));
    }

    #[tokio::test]
    async fn test_job_config() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/job/deploy/config.xml")
            .with_status(200)
            .with_body("<project><disabled>false</disabled></project>")
            .create_async()
            .await;

        let job = job_ref(&server);
        let config = client_for(&server).job_config(&job).await.unwrap();

        assert!(config.starts_with("<project>"));
    }
}

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;

use crate::auth::{self, Credentials, Token};
use crate::config::Config;
use crate::error::JobStatsError;
use crate::jenkins::JenkinsClient;
use crate::output::{self, FetchProgress};
use crate::report::{self, SeriesFilter, ALL_NODES};

#[derive(Parser)]
#[command(name = "jobstats")]
#[command(author, version, about = "Mean Jenkins build time per node", long_about = None)]
pub struct Cli {
    /// Name of the Jenkins job to report on
    job_name: String,

    /// Jenkins user [default: `[auth] user` from ~/.jenkinsapi, then the OS user]
    #[arg(long)]
    user: Option<String>,

    /// Jenkins API token [default: `[auth] token` from ~/.jenkinsapi, then prompt]
    #[arg(long, env = "JENKINS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Jenkins server, `host[:port]` or a full URL [default: `[jenkins] url` from ~/.jenkinsapi]
    #[arg(long)]
    url: Option<String>,

    /// Read credentials from this file instead of ~/.jenkinsapi
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write an SVG chart of build times to this file
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Transform applied to each series before plotting
    #[arg(long, value_enum, default_value_t = FilterKind::Id)]
    filter: FilterKind,

    /// Rolling mean window, in resampled points
    #[arg(long, default_value_t = 10)]
    window: usize,

    /// Rolling mean bucket size, in minutes
    #[arg(long, default_value_t = 1)]
    freq: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterKind {
    /// Raw build times
    Id,
    /// Forward-filled to one point per minute
    Pad,
    /// Centered rolling mean
    Mean,
}

/// Connection settings after merging the command line over the config file.
#[derive(Debug)]
struct Connection {
    url: String,
    user: Option<String>,
    token: Option<Token>,
}

impl Cli {
    fn connection(&self, config: Config) -> Result<Connection> {
        let url = self
            .url
            .clone()
            .or(config.jenkins.url)
            .ok_or_else(|| {
                JobStatsError::Config(
                    "No Jenkins URL: pass --url or set [jenkins] url in ~/.jenkinsapi".into(),
                )
            })?;

        Ok(Connection {
            url,
            user: self.user.clone().or(config.auth.user),
            token: self.token.clone().or(config.auth.token).map(Token::from),
        })
    }

    fn series_filter(&self) -> SeriesFilter {
        match self.filter {
            FilterKind::Id => SeriesFilter::Identity,
            FilterKind::Pad => SeriesFilter::Pad,
            FilterKind::Mean => SeriesFilter::RollingMean {
                window: self.window,
                freq_minutes: self.freq,
            },
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let connection = self.connection(config)?;

        let credentials =
            Credentials::resolve(connection.user, connection.token, auth::prompt_token)?;
        let client = JenkinsClient::new(&connection.url, &credentials)?;

        info!(
            "Collecting build times for job {} from {}",
            self.job_name,
            client.base_url()
        );

        let progress = FetchProgress::start(&self.job_name);
        let build_times = match report::get_build_times(&client, &self.job_name).await {
            Ok(build_times) => build_times,
            Err(e) => {
                progress.abandon();
                return Err(e)
                    .with_context(|| format!("Failed to fetch builds for {}", self.job_name));
            }
        };
        progress.finish(build_times.get(ALL_NODES).map_or(0, |s| s.len()));

        output::print_build_times(&build_times);

        if let Some(plot_path) = &self.plot {
            let mut file = std::fs::File::create(plot_path)
                .with_context(|| format!("Failed to create {}", plot_path.display()))?;
            output::write_build_times_chart(&build_times, &self.series_filter(), &mut file)?;
            info!("Chart written to: {}", plot_path.display());
        }

        Ok(())
    }
}

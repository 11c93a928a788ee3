use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::info;

use crate::error::Result;
use crate::jenkins::{Build, JenkinsClient};

/// Name of the bucket every successful build is also counted in.
pub const ALL_NODES: &str = "All";

/// Build durations in minutes for one node, ordered by build timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSeries {
    points: Vec<(DateTime<Utc>, f64)>,
}

/// Series per node name, iterated alphabetically.
pub type BuildTimes = BTreeMap<String, NodeSeries>;

impl NodeSeries {
    /// Build a series from arbitrary points, sorting them by timestamp.
    pub fn from_points(mut points: Vec<(DateTime<Utc>, f64)>) -> Self {
        points.sort_by_key(|(ts, _)| *ts);
        Self { points }
    }

    pub fn points(&self) -> &[(DateTime<Utc>, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of the durations; NaN for an empty series.
    pub fn mean(&self) -> f64 {
        if self.points.is_empty() {
            return f64::NAN;
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = self.points.iter().map(|(_, v)| v).sum::<f64>() / self.points.len() as f64;
        mean
    }

    /// First and last timestamps, if any.
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }
}

/// Fetch a job's history and turn it into per-node duration series.
pub async fn get_build_times(client: &JenkinsClient, job_name: &str) -> Result<BuildTimes> {
    let builds = client.all_builds(job_name).await?;
    let build_times = group_by_node(&builds);

    info!(
        "Job {job_name}: {} successful builds across {} nodes",
        build_times.get(ALL_NODES).map_or(0, NodeSeries::len),
        build_times.len() - 1
    );

    Ok(build_times)
}

/// Group successful builds by the node they ran on.
///
/// Every included build lands in its node's series and in [`ALL_NODES`]. An
/// empty `builtOn` is kept as its own `""` group. [`ALL_NODES`] is always
/// present, even when nothing succeeded.
pub fn group_by_node(builds: &[Build]) -> BuildTimes {
    let mut grouped: BTreeMap<String, Vec<(DateTime<Utc>, f64)>> = BTreeMap::new();
    grouped.insert(ALL_NODES.to_string(), Vec::new());

    for build in builds.iter().filter(|b| b.succeeded()) {
        let point = (build.timestamp, duration_minutes(build.duration));

        grouped
            .entry(build.built_on.clone())
            .or_default()
            .push(point);

        if build.built_on != ALL_NODES {
            grouped
                .entry(ALL_NODES.to_string())
                .or_default()
                .push(point);
        }
    }

    grouped
        .into_iter()
        .map(|(node, points)| (node, NodeSeries::from_points(points)))
        .collect()
}

pub fn duration_minutes(duration_ms: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let minutes = duration_ms as f64 / 60_000.0;
    minutes
}

mod client;
pub mod paths;
mod types;

pub use client::JenkinsClient;
pub use types::{Build, BuildResult, JobRef};

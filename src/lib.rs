//! Report mean Jenkins build times per node.
//!
//! [`jenkins::JenkinsClient`] talks to the server, [`report`] turns a job's
//! build history into per-node series, and [`output`] prints and plots them.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod jenkins;
pub mod output;
pub mod report;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobStatsError {
    #[error("Failed to get data from {path} after {attempts} attempts: {reason}")]
    RequestFailed {
        path: String,
        attempts: u32,
        reason: String,
    },

    #[error("Malformed response from {path}: {source}")]
    MalformedResponse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JobStatsError>;

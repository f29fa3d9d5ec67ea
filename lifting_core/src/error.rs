//! Error types for the lifting_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lifting_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Connection-level failure talking to the remote service
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote service answered with a non-success status
    #[error("API error (status {status}): {body}")]
    RemoteApi { status: u16, body: String },

    /// Successful response whose body could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No exercise template matched the given name
    #[error("no template found for exercise: {0}")]
    ExerciseNotFound(String),

    /// A training day could not be converted into a routine
    #[error("failed to convert {routine}: {source}")]
    Resolution {
        routine: String,
        #[source]
        source: Box<Error>,
    },

    /// A week folder could not be created
    #[error("failed to create folder {title}: {source}")]
    FolderSync {
        title: String,
        #[source]
        source: Box<Error>,
    },

    /// A routine could not be created or updated
    #[error("failed to sync routine {title}: {source}")]
    RoutineSync {
        title: String,
        #[source]
        source: Box<Error>,
    },

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Memory snapshot error
    #[error("Memory error: {0}")]
    Memory(String),

    /// Program generation error
    #[error("Program error: {0}")]
    Program(String),
}

impl Error {
    /// Whether the error looks like the remote service throttling us.
    ///
    /// Matches on the rendered text, so wrapped errors qualify too. So does
    /// any other error whose text happens to contain "429", such as a
    /// transport failure whose URL holds it in the host, port or routine id.
    pub fn is_rate_limited(&self) -> bool {
        let text = self.to_string();
        text.contains("429") || text.contains("rate limit")
    }
}

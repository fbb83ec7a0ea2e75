use thiserror::Error;

/// Structured error hierarchy for `AeroDoc`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum AeroDocError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("session: {0}")]
    Session(#[from] SessionError),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("api: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Precondition violations on session mutations. Session ids are sourced
/// from the store itself, so hitting one of these is a caller bug.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
}

/// Persistence failures. Reads that fail recover via the seeded fallback;
/// writes that fail are logged and swallowed so in-memory state stays
/// authoritative.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read key {key}: {message}")]
    Read { key: String, message: String },

    #[error("failed to write key {key}: {message}")]
    Write { key: String, message: String },
}

/// Remote collaborator failures. Surfaced to the user as an assistant
/// message in the transcript, never fatal.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Status(String),
}

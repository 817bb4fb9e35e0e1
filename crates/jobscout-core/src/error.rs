use jobscout_api::RemotiveError;
use jobscout_storage::StorageError;
use thiserror::Error;

/// Everything that can go wrong in JobScout
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success status, transport failure or an unreadable response
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The id is not in the fetched collection
    #[error("Job not found: {0}")]
    NotFound(u64),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<RemotiveError> for Error {
    fn from(err: RemotiveError) -> Self {
        match err {
            RemotiveError::NotFound(id) => Error::NotFound(id),
            other => Error::NetworkError(other.to_string()),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remotive_errors_collapse_to_two_kinds() {
        let not_found: Error = RemotiveError::NotFound(42).into();
        assert!(not_found.is_not_found());

        let failed: Error = RemotiveError::RequestFailed {
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert!(matches!(failed, Error::NetworkError(ref msg) if msg.contains("500")));
    }
}

use thiserror::Error;

/// A repository reference that could not be turned into an owner/name pair.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepoRefError {
    #[error("repository reference is empty")]
    Empty,

    #[error("not a GitHub repository URL: {0}")]
    UnsupportedUrl(String),

    #[error("expected 'owner/name', got {count} segment(s) in: {raw}")]
    SegmentCount { raw: String, count: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection failure or timeout, surfaced once retries are exhausted.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("no repositories to search")]
    NoRepositories,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_count_display() {
        let err = RepoRefError::SegmentCount {
            raw: "a/b/c".to_string(),
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "expected 'owner/name', got 3 segment(s) in: a/b/c"
        );
    }

    #[test]
    fn fetch_error_display() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
        assert_eq!(FetchError::Cancelled.to_string(), "request cancelled");
    }
}

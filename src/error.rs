use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced to callers of the search engine.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document source error: {0}")]
    Source(String),

    #[error("index error: {0}")]
    Index(String),
}

impl SearchError {
    pub fn source_error<S: Into<String>>(msg: S) -> Self {
        SearchError::Source(msg.into())
    }

    pub fn index_error<S: Into<String>>(msg: S) -> Self {
        SearchError::Index(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_the_message() {
        let err = SearchError::source_error("corpus directory vanished");
        assert_eq!(err.to_string(), "document source error: corpus directory vanished");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SearchError = io.into();
        assert!(matches!(err, SearchError::Io(_)));
    }
}

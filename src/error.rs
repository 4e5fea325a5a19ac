use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid status '{0}'. Use: backlog, doing, review, or done")]
    InvalidStatus(String),

    #[error("invalid difficulty '{0}'. Use: easy, medium, hard, or epic")]
    InvalidDifficulty(String),

    #[error("invalid date '{0}'. Use: YYYY-MM-DD")]
    InvalidDate(String),

    #[error("quest not found: {0}")]
    QuestNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_status_message_lists_choices() {
        let msg = Error::InvalidStatus("later".to_string()).to_string();
        assert!(msg.contains("later"));
        assert!(msg.contains("backlog"));
    }

    #[test]
    fn json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::Json(_)));
    }
}

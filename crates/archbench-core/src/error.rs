use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// Whether the failure only means "no usable summary for this side".
    ///
    /// The CLI degrades to a single-architecture report when the comparison
    /// side fails with a recoverable error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ReportError::MissingInput(_) | ReportError::MalformedInput(_)
        )
    }
}

impl Serialize for ReportError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_display() {
        let err = ReportError::MissingInput("no microservices summary".to_string());
        assert_eq!(err.to_string(), "Missing input: no microservices summary");
    }

    #[test]
    fn malformed_input_display() {
        let err = ReportError::MalformedInput("summary has no 'metrics' key".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed input: summary has no 'metrics' key"
        );
    }

    #[test]
    fn config_error_display() {
        let err = ReportError::Config("chart_width must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: chart_width must be at least 1"
        );
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReportError = io_err.into();
        let msg = err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn serde_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn input_errors_are_recoverable() {
        assert!(ReportError::MissingInput("x".to_string()).is_recoverable());
        assert!(ReportError::MalformedInput("x".to_string()).is_recoverable());
    }

    #[test]
    fn other_errors_are_not_recoverable() {
        assert!(!ReportError::Config("x".to_string()).is_recoverable());
        assert!(!ReportError::Internal("x".to_string()).is_recoverable());
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!ReportError::from(io_err).is_recoverable());
    }

    #[test]
    fn serialize_produces_string() {
        let err = ReportError::MissingInput("side B".to_string());
        let json = serde_json::to_string(&err).expect("serialize should succeed");
        assert_eq!(json, "\"Missing input: side B\"");
    }
}

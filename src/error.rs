use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid entry: {0}")]
    ValidationError(String),

    #[error("Unknown operation '{0}' (expected 1/all, 2/scopes or 3/reservations)")]
    SelectionError(String),

    #[error("Management interface unavailable: {0}")]
    TransportError(String),

    #[error("Management interface did not respond within {0}s")]
    Timeout(u64),

    #[error("User cancelled")]
    UserCancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GatewayError {
    /// 재시도하면 성공할 수 있는 에러인지 (서버 응답 지연 등)
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Timeout(_) | GatewayError::TransportError(_))
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(GatewayError::Timeout(30).is_retryable());
        assert!(GatewayError::TransportError("spawn failed".to_string()).is_retryable());
        assert!(!GatewayError::SelectionError("9".to_string()).is_retryable());
        assert!(!GatewayError::ConfigError("missing".to_string()).is_retryable());
    }

    #[test]
    fn test_selection_error_message() {
        let err = GatewayError::SelectionError("9".to_string());
        assert!(err.to_string().contains("'9'"));
    }
}

use thiserror::Error;

/// Errors raised while decoding backend payloads.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected payload: {0}")]
    Unexpected(String),
}

/// Convenience type alias for Results using WireError
pub type WireResult<T> = Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display() {
        let err: WireError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("Malformed payload:"));
    }

    #[test]
    fn unexpected_error_display() {
        let err = WireError::Unexpected("html page".to_string());
        assert_eq!(err.to_string(), "Unexpected payload: html page");
    }
}

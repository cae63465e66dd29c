//! Classification of upstream rejections.

/// Coarse reason behind a non-success status from the completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit or quota exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Prompt too large for the model.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl UpstreamErrorCode {
    /// Determine error code from HTTP status and the raw error body.
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::AuthenticationError,
            429 => Self::RateLimitExceeded,
            404 => Self::ModelNotFound,
            400 if body.contains("model_not_found") => Self::ModelNotFound,
            400 if body.contains("context_length") => Self::ContextLengthExceeded,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Short operator-facing hint for this failure.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::AuthenticationError => "check OPENAI_API_KEY",
            Self::RateLimitExceeded => "rate limit or quota exceeded, try again later",
            Self::ModelNotFound => "check OPENAI_MODEL",
            Self::ContextLengthExceeded => "too many matching notes, narrow the question",
            Self::ServerError => "the completion service is failing, try again later",
            Self::Unknown => "see the response body",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_401() {
        let code = UpstreamErrorCode::from_response(401, "invalid_api_key");
        assert_eq!(code, UpstreamErrorCode::AuthenticationError);
    }

    #[test]
    fn test_error_code_from_429() {
        let code = UpstreamErrorCode::from_response(429, "rate_limit_exceeded");
        assert_eq!(code, UpstreamErrorCode::RateLimitExceeded);
    }

    #[test]
    fn test_error_code_from_404() {
        let code = UpstreamErrorCode::from_response(404, "");
        assert_eq!(code, UpstreamErrorCode::ModelNotFound);
    }

    #[test]
    fn test_error_code_from_400_context_length() {
        let body = r#"{"error":{"code":"context_length_exceeded"}}"#;
        let code = UpstreamErrorCode::from_response(400, body);
        assert_eq!(code, UpstreamErrorCode::ContextLengthExceeded);
    }

    #[test]
    fn test_error_code_from_502() {
        let code = UpstreamErrorCode::from_response(502, "bad_gateway");
        assert_eq!(code, UpstreamErrorCode::ServerError);
    }

    #[test]
    fn test_error_code_from_unknown() {
        let code = UpstreamErrorCode::from_response(418, "im_a_teapot");
        assert_eq!(code, UpstreamErrorCode::Unknown);
    }

    #[test]
    fn test_auth_hint_names_the_variable() {
        assert!(UpstreamErrorCode::AuthenticationError
            .hint()
            .contains("OPENAI_API_KEY"));
    }
}

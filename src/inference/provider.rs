use std::fmt;

use async_trait::async_trait;

/// Classified failure of a completion call.
///
/// The `Display` text of each variant is what the user ends up reading in the
/// response area, so every variant renders to its own distinct message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// HTTP 429 from upstream.
    RateLimitExceeded,
    /// HTTP 401/403: bad, revoked or missing key.
    AuthenticationFailed,
    /// Any other non-success status.
    ServiceError { status: u16, message: String },
    /// Transport failure, undecodable body, or a response without choices.
    UnknownError(String),
}

impl CompletionError {
    /// Classifies a non-success HTTP status. `message` is the best upstream explanation.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => CompletionError::RateLimitExceeded,
            401 | 403 => CompletionError::AuthenticationFailed,
            _ => CompletionError::ServiceError { status, message },
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::RateLimitExceeded => {
                write!(f, "Rate limit exceeded. Please wait a moment and try again.")
            }
            CompletionError::AuthenticationFailed => {
                write!(f, "Authentication failed. Check that your API key is valid.")
            }
            CompletionError::ServiceError { status, message } => write!(
                f,
                "The completion service returned an error (HTTP {status}): {message}"
            ),
            CompletionError::UnknownError(detail) => write!(f, "An error occurred: {detail}"),
        }
    }
}

impl std::error::Error for CompletionError {}

/// Folds a completion result into the one string the surface displays.
pub fn response_text(result: Result<String, CompletionError>) -> String {
    result.unwrap_or_else(|e| e.to_string())
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the name of the backend.
    fn name(&self) -> &str;

    /// The fixed model identifier every request uses.
    fn model(&self) -> &str;

    /// Sends `prompt` as a single user message and returns the generated text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            CompletionError::from_status(429, "slow down".into()),
            CompletionError::RateLimitExceeded
        );
        assert_eq!(
            CompletionError::from_status(401, "bad key".into()),
            CompletionError::AuthenticationFailed
        );
        assert_eq!(
            CompletionError::from_status(403, "forbidden".into()),
            CompletionError::AuthenticationFailed
        );
        assert_eq!(
            CompletionError::from_status(503, "overloaded".into()),
            CompletionError::ServiceError {
                status: 503,
                message: "overloaded".into()
            }
        );
        assert!(matches!(
            CompletionError::from_status(400, "bad request".into()),
            CompletionError::ServiceError { status: 400, .. }
        ));
    }

    #[test]
    fn test_messages_are_distinct() {
        let messages = [
            CompletionError::RateLimitExceeded.to_string(),
            CompletionError::AuthenticationFailed.to_string(),
            CompletionError::ServiceError {
                status: 500,
                message: "boom".into(),
            }
            .to_string(),
            CompletionError::UnknownError("boom".into()).to_string(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(messages[2].contains("HTTP 500"));
        assert_eq!(messages[3], "An error occurred: boom");
    }

    #[test]
    fn test_response_text_passes_success_through() {
        assert_eq!(response_text(Ok("hello".into())), "hello");
    }

    #[test]
    fn test_response_text_renders_errors() {
        assert_eq!(
            response_text(Err(CompletionError::AuthenticationFailed)),
            "Authentication failed. Check that your API key is valid."
        );
    }
}

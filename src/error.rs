// API error taxonomy
// Handlers return these instead of raising; the router translates them
// into plain-text responses with the shared CORS headers.

use hyper::StatusCode;

/// Errors a handler can surface to the client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed input: bad JSON, wrong shape, bad data URL, oversized payload
    #[error("{0}")]
    BadRequest(String),

    /// No handler registered for the requested endpoint
    #[error("Endpoint not found")]
    NotFound,

    /// Endpoint exists but is intentionally unimplemented
    #[error("{0}")]
    NotImplemented(&'static str),

    /// Unexpected I/O or parse failure during an otherwise valid request
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("Invalid JSON data").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::NotImplemented("nope").status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ApiError::Internal("disk on fire".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_is_the_message() {
        let err = ApiError::bad_request("Collections must be an array");
        assert_eq!(err.to_string(), "Collections must be an array");
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            // The cut must land on a char boundary or slicing panics
            let mut cut = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}... (truncated, {} total bytes)",
                    &body[..cut],
                    body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_short_body_passes_through() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "database down");
        assert_eq!(err.to_string(), "Server error: database down");
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let text = err.to_string();
        assert!(text.contains("truncated, 2000 total bytes"));
        assert!(text.len() < body.len());
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // A multibyte char straddling the cut point must not panic the slice
        let mut body = "a".repeat(MAX_ERROR_BODY_LENGTH - 1);
        body.push('€');
        body.push_str(&"b".repeat(100));

        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let text = err.to_string();
        assert!(text.contains(&format!("truncated, {} total bytes", body.len())));
        assert!(!text.contains('€'));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "no access"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
    }
}

//! Error types for the composition root.

/// Errors from the sign-in flow.
///
/// Session monitoring itself has no fatal error conditions (bad
/// configuration degrades to defaults), so this covers only the
/// credential validation performed before anything is stored.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend handed back an empty access token.
    #[error("empty access token")]
    EmptyToken,

    /// The access token is not shaped like a JWT. Storing it would only
    /// defer the failure to the first authenticated API call.
    #[error("malformed access token: expected 3 dot-separated segments, found {segments}")]
    MalformedToken {
        /// Number of dot-separated segments actually found.
        segments: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_message() {
        assert_eq!(AuthError::EmptyToken.to_string(), "empty access token");
    }

    #[test]
    fn test_malformed_token_message_includes_segment_count() {
        let err = AuthError::MalformedToken { segments: 2 };
        assert!(err.to_string().contains("found 2"));
    }
}

//! Well-known entry names in the shared store.
//!
//! These names are part of the console's persisted vocabulary: other
//! parts of the application (settings panel, request layer, route
//! guards) read and write the same entries, so the spellings here are
//! load-bearing and must not drift.

/// Configured idle timeout, in minutes, as a decimal string.
///
/// Written by the settings panel, read each time session monitoring
/// starts. Absent or unparsable values fall back to the default; see
/// [`settings::session_timeout_minutes`](crate::settings::session_timeout_minutes).
pub const SESSION_TIMEOUT: &str = "sessionTimeout";

/// The access token attached to API requests.
pub const AUTH_TOKEN: &str = "authToken";

/// The backend session token checked by route guards.
pub const SESSION_TOKEN: &str = "sessionToken";

/// The refresh token, when the backend issues one.
///
/// Cleared by an explicit sign-out but NOT by a forced idle expiry;
/// see `EXPIRY_CLEARED_KEYS` in the session layer.
pub const REFRESH_TOKEN: &str = "refreshToken";

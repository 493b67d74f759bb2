use crate::ensure;
use crate::protocol::HttpError;

/// Protocol version a message defaults to.
pub const DEFAULT_VERSION: &str = "1.1";

/// Version tokens accepted by `with_protocol_version`.
const ACCEPTED_VERSIONS: &[&str] = &["1.0", "1.1", "2", "2.0"];

/// Validates a protocol version token.
///
/// Rejects the empty string first, then anything outside the accepted
/// HTTP version tokens.
pub(crate) fn validate(version: &str) -> Result<(), HttpError> {
    ensure!(!version.is_empty(), HttpError::EmptyVersion);
    ensure!(ACCEPTED_VERSIONS.contains(&version), HttpError::InvalidVersion(version.to_string()));

    Ok(())
}

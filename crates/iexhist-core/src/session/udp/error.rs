use thiserror::Error;

/// Errors from UDP envelope stripping.
///
/// The session treats all of these as "not a protocol frame" and skips the
/// frame with a diagnostic counter rather than aborting the capture.
#[derive(Debug, Error)]
pub enum UdpError {
    #[error("packet slice error: {0}")]
    Slice(String),
    #[error("missing network layer in frame")]
    MissingNetworkLayer,
    #[error("missing IP payload in frame")]
    MissingIpPayload,
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}

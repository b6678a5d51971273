use thiserror::Error;

/// Errors from decoding one message block.
///
/// Per-message, not fatal to the stream: the session surfaces the error and
/// leaves continue-or-stop as caller policy.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("truncated {message_type:#04x} message: need {needed} bytes, got {actual}")]
    Truncated {
        message_type: u8,
        needed: usize,
        actual: usize,
    },
}

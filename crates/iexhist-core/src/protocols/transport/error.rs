use thiserror::Error;

/// Errors from transport segment framing. All of these are fatal for the
/// stream: consistent framing cannot be guaranteed past an inconsistency.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("segment too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("unexpected transport version: expected {expected:#04x}, got {actual:#04x}")]
    VersionMismatch { expected: u8, actual: u8 },
    #[error("unexpected message protocol id: expected {expected:#06x}, got {actual:#06x}")]
    ProtocolMismatch { expected: u16, actual: u16 },
    #[error("segment declares {declared} payload bytes but only {available} are present")]
    PayloadOverrun { declared: usize, available: usize },
    #[error("message block declares {declared} bytes but only {remaining} remain in segment")]
    BlockOverrun { declared: usize, remaining: usize },
    #[error("zero-length message block")]
    EmptyBlock,
    #[error("message count exhausted with {leftover} undeclared bytes left in segment")]
    TrailingBytes { leftover: usize },
    #[error("message count exceeds segment payload: {remaining} blocks still declared")]
    CountOverrun { remaining: u16 },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid capture container ({context}): {message}")]
    InvalidContainer {
        context: &'static str,
        message: String,
    },
    #[error("truncated capture frame ({context})")]
    TruncatedFrame { context: &'static str },
}

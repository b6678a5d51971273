mod pcap;

pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured network frame: capture timestamp plus raw link-layer bytes.
///
/// Owned transiently; the session copies out anything it needs to retain.
#[derive(Debug, Clone)]
pub struct CaptureFrame {
    /// Capture timestamp in seconds (source clock), when known.
    pub ts: Option<f64>,
    /// Link-layer type of `data`.
    pub linktype: Linktype,
    /// Raw link-layer frame bytes.
    pub data: Vec<u8>,
}

/// Sequential source of capture frames, in file order.
pub trait FrameSource {
    /// Next frame, `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> Result<Option<CaptureFrame>, SourceError>;
}

/// Errors from the capture container layer.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The capture file's global header fails validation. Fatal at open.
    #[error("invalid capture container ({context}): {message}")]
    InvalidContainer {
        context: &'static str,
        message: String,
    },
    /// A frame record declares more bytes than the file holds. The stream
    /// is unusable past this point.
    #[error("truncated capture frame ({context})")]
    TruncatedFrame { context: &'static str },
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::InvalidContainer { context, message } => {
                SourceError::InvalidContainer { context, message }
            }
            pcap::error::PcapSourceError::TruncatedFrame { context } => {
                SourceError::TruncatedFrame { context }
            }
        }
    }
}

//! PCAP/PCAPNG capture source.
//!
//! Reads the capture-file container format and yields one [`CaptureFrame`]
//! per recorded frame, in file order. Container and frame-record envelope
//! bytes are consumed here; link/IP/UDP stripping happens in the session
//! layer. The global header is validated eagerly at open so a non-capture
//! file fails fast instead of producing garbage frames.
//!
//! [`CaptureFrame`]: crate::source::CaptureFrame

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;

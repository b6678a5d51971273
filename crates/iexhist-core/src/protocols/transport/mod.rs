//! IEX-TP transport segment framing.
//!
//! A UDP datagram carries exactly one transport segment: a fixed 40-byte
//! header followed by `message_count` length-prefixed message blocks packed
//! back-to-back. The header's message count and payload length are both
//! authoritative; any mismatch between them and the actual bytes is a fatal
//! framing error rather than a silent truncation, so corrupt data never
//! reaches the message decoder.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::TransportError;
pub use parser::{MessageBlock, Segment, SegmentHeader, parse_segment};

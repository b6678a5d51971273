//! Core library for decoding IEX historical market-data ("HIST") captures.
//!
//! A HIST file is a raw network capture of the IEX transport protocol
//! carrying TOPS/DEEP market-data messages. This crate implements the
//! offline decode pipeline used by the CLI: a capture source yields frame
//! payloads, the transport layer frames them into message blocks, and the
//! message layer decodes each block into a typed [`Message`]. The
//! [`Parser`] facade drives all three layers as a pull-based stream.
//!
//! Parsing is byte-oriented and side-effect free; all I/O is isolated in
//! `source` modules. Protocol byte offsets live in `layout` modules, safe
//! byte access in `reader` modules, domain decoding in `parser` modules.
//!
//! Invariants:
//! - Message blocks are consumed exactly as declared by their segment
//!   (count and byte extent); any mismatch is a fatal framing error.
//! - Prices and timestamps are carried as raw integers; calendar time and
//!   decimal rendering are derived on demand, never used for ordering.
//! - One `Parser` decodes one capture sequentially; parallelism is one
//!   parser per file.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use iexhist_core::{HistFormat, Parser};
//!
//! let mut parser = Parser::open(Path::new("20180103_IEXTP1_TOPS1.6.pcap"), HistFormat::Tops16)?;
//! while let Some(message) = parser.get_next_message(None)? {
//!     println!("{:?} @ {}", message.kind(), message.timestamp().nanos());
//! }
//! # Ok::<(), iexhist_core::ParserError>(())
//! ```

use serde::{Deserialize, Serialize};

mod protocols;
mod session;
mod source;

pub use protocols::HistFormat;
pub use protocols::messages::{
    AuctionInformation, Decoded, Message, MessageError, MessageKind, OfficialPrice,
    OperationalHalt, PriceLevelUpdate, QuoteUpdate, SecurityDirectory, SecurityEvent,
    ShortSalePriceTest, Side, SystemEvent, TradeBreak, TradeReport, TradingStatus, decode_message,
};
pub use protocols::transport::{MessageBlock, Segment, SegmentHeader, TransportError, parse_segment};
pub use session::{Messages, Parser, ParserError, SessionStats};
pub use source::{CaptureFrame, FrameSource, PcapFileSource, SourceError};

/// Number of implied decimal places in an IEX fixed-point price.
pub const PRICE_SCALE: i64 = 10_000;

/// Fixed-point price, `raw / 10_000` decimal units.
///
/// The raw integer is the authoritative value; [`Price::to_f64`] and the
/// `Display` rendering are derived. `Display` uses integer arithmetic so the
/// output is exact (`100150` renders as `10.0150`, never `10.0149...`).
///
/// # Examples
/// ```
/// use iexhist_core::Price;
///
/// let price = Price::from_raw(100_150);
/// assert_eq!(price.raw(), 100_150);
/// assert_eq!(price.to_string(), "10.0150");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw fixed-point integer (price * 10_000).
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Lossy floating-point view; use [`Price::raw`] for exact arithmetic.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let scale = PRICE_SCALE as u64;
        write!(f, "{sign}{}.{:04}", magnitude / scale, magnitude % scale)
    }
}

/// Nanoseconds since the Unix epoch, source clock, interpreted as UTC.
///
/// Ordering and filtering operate on the raw integer; conversion to
/// calendar time happens only on demand.
///
/// # Examples
/// ```
/// use iexhist_core::Timestamp;
///
/// let ts = Timestamp::from_nanos(1_514_984_427_833_117_218);
/// let dt = ts.to_datetime().unwrap();
/// assert_eq!(dt.hour(), 13);
/// assert_eq!(dt.microsecond(), 833_117);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn nanos(self) -> i64 {
        self.0
    }

    /// Calendar-time view of the raw nanosecond value.
    ///
    /// Returns `None` for values outside the representable range.
    pub fn to_datetime(self) -> Option<time::OffsetDateTime> {
        time::OffsetDateTime::from_unix_timestamp_nanos(self.0 as i128).ok()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use time::format_description::well_known::Rfc3339;

    use super::{Price, Timestamp};

    #[test]
    fn price_display_is_exact() {
        assert_eq!(Price::from_raw(100_150).to_string(), "10.0150");
        assert_eq!(Price::from_raw(1).to_string(), "0.0001");
        assert_eq!(Price::from_raw(0).to_string(), "0.0000");
        assert_eq!(Price::from_raw(-100_150).to_string(), "-10.0150");
        assert_eq!(Price::from_raw(2_140_000).to_string(), "214.0000");
    }

    #[test]
    fn price_round_trips_raw_value() {
        let price = Price::from_raw(100_150);
        assert_eq!(price.raw(), 100_150);
        assert!((price.to_f64() - 10.015).abs() < 1e-9);
    }

    #[test]
    fn timestamp_converts_to_utc_calendar_time() {
        let ts = Timestamp::from_nanos(1_514_984_427_833_117_218);
        let dt = ts.to_datetime().unwrap();
        let rendered = dt.format(&Rfc3339).unwrap();
        assert_eq!(rendered, "2018-01-03T13:00:27.833117218Z");
        assert_eq!(dt.microsecond(), 833_117);
    }

    #[test]
    fn timestamp_orders_on_raw_integer() {
        let earlier = Timestamp::from_nanos(100);
        let later = Timestamp::from_nanos(101);
        assert!(earlier < later);
    }
}

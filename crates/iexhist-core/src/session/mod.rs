//! Decode session: the pull-based facade over source, framing, and
//! message decoding.
//!
//! One [`Parser`] owns one capture stream and decodes it strictly
//! sequentially; framing depends on cumulative offsets and running message
//! counts, so a single parser must not be driven concurrently. Independent
//! capture files parallelize naturally with one parser each.

mod udp;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocols::HistFormat;
use crate::protocols::messages::{Decoded, Message, MessageError, MessageKind, decode_message};
use crate::protocols::transport::{Segment, TransportError, parse_segment};
use crate::source::{FrameSource, PcapFileSource, SourceError};

use udp::udp_payload;

/// Errors surfaced by a decode session.
///
/// `Source` and `Framing` poison the session: consistent framing cannot be
/// guaranteed past them, so subsequent calls report end of stream.
/// `Message` is per-block; the session stays usable at the next block.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("capture source error: {0}")]
    Source(#[from] SourceError),
    #[error("transport framing error: {0}")]
    Framing(#[from] TransportError),
    #[error("message decode error: {0}")]
    Message(#[from] MessageError),
}

/// Diagnostic counters recorded over the life of a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Capture frames pulled from the source.
    pub frames_read: u64,
    /// Frames that were not protocol frames (non-UDP, short, other link).
    pub frames_skipped: u64,
    /// Transport segments parsed.
    pub segments_read: u64,
    /// Segments with a zero message count.
    pub heartbeats: u64,
    /// Message blocks decoded into a typed message.
    pub messages_decoded: u64,
    /// Decoded messages discarded by the allow-list filter.
    pub messages_filtered: u64,
    /// Blocks with an unknown or out-of-format type tag, skipped.
    pub messages_unsupported: u64,
}

/// Streaming decoder for one HIST capture file.
///
/// Pulls frames from a [`FrameSource`], frames them into transport
/// segments, and decodes message blocks on demand. The underlying stream is
/// released when the parser is dropped, on every exit path.
pub struct Parser<S = PcapFileSource> {
    source: S,
    format: HistFormat,
    segment: Option<Segment>,
    last: Option<Message>,
    last_raw: Vec<u8>,
    last_type: Option<u8>,
    exhausted: bool,
    stats: SessionStats,
}

impl Parser<PcapFileSource> {
    /// Open a capture file for decoding.
    ///
    /// The container's global header is validated eagerly; a non-capture
    /// file fails here with [`SourceError::InvalidContainer`].
    pub fn open(path: &Path, format: HistFormat) -> Result<Self, ParserError> {
        let source = PcapFileSource::open(path)?;
        Ok(Self::from_source(source, format))
    }

    /// Scoped decode: open the capture, run `f`, release the stream on
    /// every path out, including panics and early returns inside `f`.
    pub fn with_capture<T>(
        path: &Path,
        format: HistFormat,
        f: impl FnOnce(&mut Self) -> T,
    ) -> Result<T, ParserError> {
        let mut parser = Self::open(path, format)?;
        Ok(f(&mut parser))
    }
}

impl<S: FrameSource> Parser<S> {
    /// Wrap an already-open frame source.
    pub fn from_source(source: S, format: HistFormat) -> Self {
        Self {
            source,
            format,
            segment: None,
            last: None,
            last_raw: Vec::new(),
            last_type: None,
            exhausted: false,
            stats: SessionStats::default(),
        }
    }

    pub fn format(&self) -> HistFormat {
        self.format
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Most recently returned message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.last.as_ref()
    }

    /// Type tag of the most recently returned message.
    pub fn last_message_type(&self) -> Option<u8> {
        self.last_type
    }

    /// Binary encoding (including the type tag) of the most recently
    /// returned message, copied out of its frame buffer.
    pub fn last_message_bytes(&self) -> Option<&[u8]> {
        self.last_type.map(|_| self.last_raw.as_slice())
    }

    /// Decode and return the next message, skipping non-protocol frames,
    /// heartbeat segments, and unsupported blocks.
    ///
    /// With an `allowed` list, decoded messages whose kind is not listed
    /// are discarded without being returned; the same frames and segments
    /// are still examined, so filtering bounds returned volume, not work.
    ///
    /// Returns `Ok(None)` at end of stream, idempotently: further calls
    /// keep returning `Ok(None)` with no side effects.
    ///
    /// # Errors
    /// Source and framing errors abort the session (later calls yield
    /// `Ok(None)`); a [`MessageError`] is returned but decoding may
    /// continue at the next block.
    pub fn get_next_message(
        &mut self,
        allowed: Option<&[MessageKind]>,
    ) -> Result<Option<Message>, ParserError> {
        if self.exhausted {
            return Ok(None);
        }
        loop {
            let has_blocks = self.segment.as_ref().is_some_and(|s| !s.is_exhausted());
            if !has_blocks && !self.advance_segment()? {
                return Ok(None);
            }
            let Some(segment) = self.segment.as_mut() else {
                continue;
            };

            let block = match segment.next_block() {
                Ok(Some(block)) => block,
                Ok(None) => continue,
                Err(err) => {
                    self.exhausted = true;
                    return Err(err.into());
                }
            };

            let message_type = block.message_type;
            match decode_message(self.format, message_type, block.payload)? {
                Decoded::Message(message) => {
                    self.stats.messages_decoded += 1;
                    if let Some(kinds) = allowed {
                        if !kinds.contains(&message.kind()) {
                            self.stats.messages_filtered += 1;
                            continue;
                        }
                    }
                    self.last_raw.clear();
                    self.last_raw.extend_from_slice(block.raw);
                    self.last_type = Some(message_type);
                    self.last = Some(message.clone());
                    return Ok(Some(message));
                }
                Decoded::Unsupported { .. } => {
                    self.stats.messages_unsupported += 1;
                    continue;
                }
            }
        }
    }

    /// Iterate all remaining messages without a filter.
    pub fn messages(&mut self) -> Messages<'_, S> {
        Messages { parser: self }
    }

    /// Release the underlying stream. Dropping the parser does the same;
    /// this form just makes the intent explicit at call sites.
    pub fn close(self) {}

    // Pull frames until one yields a segment with message blocks.
    // Ok(false) means the source is exhausted.
    fn advance_segment(&mut self) -> Result<bool, ParserError> {
        loop {
            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Err(err) => {
                    self.exhausted = true;
                    return Err(err.into());
                }
            };
            self.stats.frames_read += 1;

            let Ok(Some(datagram)) = udp_payload(frame.linktype, &frame.data) else {
                self.stats.frames_skipped += 1;
                continue;
            };

            let segment = match parse_segment(self.format, datagram) {
                Ok(segment) => segment,
                Err(err) => {
                    self.exhausted = true;
                    return Err(err.into());
                }
            };
            self.stats.segments_read += 1;
            if segment.is_exhausted() {
                self.stats.heartbeats += 1;
                continue;
            }
            self.segment = Some(segment);
            return Ok(true);
        }
    }
}

/// Forward-only iterator over the remaining messages of a session.
///
/// Finite (bounded by the file), not rewindable, and not usable from more
/// than one thread of control.
pub struct Messages<'a, S> {
    parser: &'a mut Parser<S>,
}

impl<S: FrameSource> Iterator for Messages<'_, S> {
    type Item = Result<Message, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.parser.get_next_message(None) {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use etherparse::PacketBuilder;
    use pcap_parser::Linktype;

    use super::{Parser, ParserError};
    use crate::protocols::HistFormat;
    use crate::protocols::transport::layout as tp;
    use crate::source::{CaptureFrame, FrameSource, SourceError};
    use crate::{Message, MessageKind};

    struct VecSource {
        frames: Vec<CaptureFrame>,
        pos: usize,
    }

    impl VecSource {
        fn new(frames: Vec<CaptureFrame>) -> Self {
            Self { frames, pos: 0 }
        }
    }

    impl FrameSource for VecSource {
        fn next_frame(&mut self) -> Result<Option<CaptureFrame>, SourceError> {
            let frame = self.frames.get(self.pos).cloned();
            self.pos += 1;
            Ok(frame)
        }
    }

    const TS: i64 = 1_514_984_427_833_117_218;

    fn udp_frame(payload: &[u8]) -> CaptureFrame {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .udp(10378, 10378);
        let mut data = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut data, payload).unwrap();
        CaptureFrame {
            ts: Some(0.0),
            linktype: Linktype::ETHERNET,
            data,
        }
    }

    fn segment(format: HistFormat, blocks: &[Vec<u8>]) -> Vec<u8> {
        let mut payload = Vec::new();
        for block in blocks {
            payload.extend_from_slice(&(block.len() as u16).to_le_bytes());
            payload.extend_from_slice(block);
        }
        let mut datagram = vec![0u8; tp::HEADER_LEN];
        datagram[tp::VERSION_OFFSET] = tp::VERSION;
        datagram[tp::PROTOCOL_ID_RANGE].copy_from_slice(&format.protocol_id().to_le_bytes());
        datagram[tp::PAYLOAD_LEN_RANGE].copy_from_slice(&(payload.len() as u16).to_le_bytes());
        datagram[tp::MESSAGE_COUNT_RANGE].copy_from_slice(&(blocks.len() as u16).to_le_bytes());
        datagram[tp::SEND_TIME_RANGE].copy_from_slice(&TS.to_le_bytes());
        datagram.extend_from_slice(&payload);
        datagram
    }

    fn trade_report_block(symbol: &[u8; 8], size: u32, price: i64, trade_id: i64) -> Vec<u8> {
        let mut block = vec![0x54, 0x00];
        block.extend_from_slice(&TS.to_le_bytes());
        block.extend_from_slice(symbol);
        block.extend_from_slice(&size.to_le_bytes());
        block.extend_from_slice(&price.to_le_bytes());
        block.extend_from_slice(&trade_id.to_le_bytes());
        block
    }

    fn quote_update_block(symbol: &[u8; 8]) -> Vec<u8> {
        let mut block = vec![0x51, 0x00];
        block.extend_from_slice(&TS.to_le_bytes());
        block.extend_from_slice(symbol);
        block.extend_from_slice(&100u32.to_le_bytes());
        block.extend_from_slice(&100_100i64.to_le_bytes());
        block.extend_from_slice(&100_200i64.to_le_bytes());
        block.extend_from_slice(&200u32.to_le_bytes());
        block
    }

    #[test]
    fn returns_messages_in_order_then_end_of_stream() {
        let blocks = vec![
            trade_report_block(b"ZIEXT\0\0\0", 100, 100_150, 1),
            quote_update_block(b"ZIEXT\0\0\0"),
        ];
        let source = VecSource::new(vec![udp_frame(&segment(HistFormat::Tops16, &blocks))]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);

        let first = parser.get_next_message(None).unwrap().unwrap();
        assert!(matches!(first, Message::TradeReport(_)));
        let second = parser.get_next_message(None).unwrap().unwrap();
        assert!(matches!(second, Message::QuoteUpdate(_)));
        assert!(parser.get_next_message(None).unwrap().is_none());
    }

    #[test]
    fn end_of_stream_is_idempotent() {
        let source = VecSource::new(vec![]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);
        for _ in 0..3 {
            assert!(parser.get_next_message(None).unwrap().is_none());
        }
        let stats = parser.stats();
        assert_eq!(stats.frames_read, 0);
        assert_eq!(stats.messages_decoded, 0);
    }

    #[test]
    fn filter_returns_exact_subsequence() {
        let blocks = vec![
            trade_report_block(b"A\0\0\0\0\0\0\0", 1, 10_000, 1),
            quote_update_block(b"A\0\0\0\0\0\0\0"),
            trade_report_block(b"B\0\0\0\0\0\0\0", 2, 20_000, 2),
        ];
        let frame = udp_frame(&segment(HistFormat::Tops16, &blocks));

        let unfiltered: Vec<Message> = {
            let source = VecSource::new(vec![frame.clone()]);
            let mut parser = Parser::from_source(source, HistFormat::Tops16);
            parser.messages().map(Result::unwrap).collect()
        };
        let expected: Vec<Message> = unfiltered
            .iter()
            .filter(|m| m.kind() == MessageKind::TradeReport)
            .cloned()
            .collect();

        let source = VecSource::new(vec![frame]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);
        let mut filtered = Vec::new();
        while let Some(message) = parser
            .get_next_message(Some(&[MessageKind::TradeReport]))
            .unwrap()
        {
            filtered.push(message);
        }
        assert_eq!(filtered, expected);
        assert_eq!(filtered.len(), 2);
        assert_eq!(parser.stats().messages_filtered, 1);
        assert_eq!(parser.stats().messages_decoded, 3);
    }

    #[test]
    fn unknown_type_tag_is_skipped_and_decoding_resumes() {
        let unknown = vec![0x7a, 0xff, 0xff, 0xff];
        let blocks = vec![
            unknown,
            trade_report_block(b"ZIEXT\0\0\0", 100, 100_150, 1),
        ];
        let source = VecSource::new(vec![udp_frame(&segment(HistFormat::Tops16, &blocks))]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);

        let message = parser.get_next_message(None).unwrap().unwrap();
        assert!(matches!(message, Message::TradeReport(_)));
        assert_eq!(parser.stats().messages_unsupported, 1);
    }

    #[test]
    fn non_protocol_frames_are_skipped_with_diagnostic() {
        let junk = CaptureFrame {
            ts: Some(0.0),
            linktype: Linktype::ETHERNET,
            data: vec![0u8; 12],
        };
        let blocks = vec![trade_report_block(b"ZIEXT\0\0\0", 100, 100_150, 1)];
        let source = VecSource::new(vec![
            junk,
            udp_frame(&segment(HistFormat::Tops16, &blocks)),
        ]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);

        assert!(parser.get_next_message(None).unwrap().is_some());
        assert_eq!(parser.stats().frames_skipped, 1);
        assert_eq!(parser.stats().frames_read, 2);
    }

    #[test]
    fn heartbeat_segments_are_skipped() {
        let blocks = vec![trade_report_block(b"ZIEXT\0\0\0", 100, 100_150, 1)];
        let source = VecSource::new(vec![
            udp_frame(&segment(HistFormat::Tops16, &[])),
            udp_frame(&segment(HistFormat::Tops16, &blocks)),
        ]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);

        assert!(parser.get_next_message(None).unwrap().is_some());
        assert_eq!(parser.stats().heartbeats, 1);
        assert_eq!(parser.stats().segments_read, 2);
    }

    #[test]
    fn framing_error_poisons_the_session() {
        // Wrong protocol id for the requested format.
        let source = VecSource::new(vec![udp_frame(&segment(HistFormat::Deep10, &[]))]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);

        let err = parser.get_next_message(None).unwrap_err();
        assert!(matches!(err, ParserError::Framing(_)));
        assert!(parser.get_next_message(None).unwrap().is_none());
    }

    #[test]
    fn truncated_message_does_not_poison_the_session() {
        let truncated = vec![0x54, 0x00, 0x01, 0x02];
        let blocks = vec![
            truncated,
            trade_report_block(b"ZIEXT\0\0\0", 100, 100_150, 1),
        ];
        let source = VecSource::new(vec![udp_frame(&segment(HistFormat::Tops16, &blocks))]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);

        let err = parser.get_next_message(None).unwrap_err();
        assert!(matches!(err, ParserError::Message(_)));
        let message = parser.get_next_message(None).unwrap().unwrap();
        assert!(matches!(message, Message::TradeReport(_)));
    }

    #[test]
    fn session_state_tracks_last_returned_message() {
        let trade = trade_report_block(b"ZIEXT\0\0\0", 100, 100_150, 1);
        let blocks = vec![trade.clone(), quote_update_block(b"ZIEXT\0\0\0")];
        let source = VecSource::new(vec![udp_frame(&segment(HistFormat::Tops16, &blocks))]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);

        assert!(parser.last_message().is_none());
        assert!(parser.last_message_bytes().is_none());

        parser.get_next_message(None).unwrap().unwrap();
        assert_eq!(parser.last_message_type(), Some(0x54));
        assert_eq!(parser.last_message_bytes(), Some(trade.as_slice()));
        assert!(matches!(
            parser.last_message(),
            Some(Message::TradeReport(_))
        ));

        // Discarded messages must not disturb the session state.
        while parser
            .get_next_message(Some(&[MessageKind::OfficialPrice]))
            .unwrap()
            .is_some()
        {}
        assert_eq!(parser.last_message_type(), Some(0x54));
    }

    #[test]
    fn iterator_yields_all_messages() {
        let blocks = vec![
            trade_report_block(b"ZIEXT\0\0\0", 100, 100_150, 1),
            quote_update_block(b"ZIEXT\0\0\0"),
        ];
        let source = VecSource::new(vec![udp_frame(&segment(HistFormat::Tops16, &blocks))]);
        let mut parser = Parser::from_source(source, HistFormat::Tops16);
        let messages: Vec<_> = parser.messages().map(Result::unwrap).collect();
        assert_eq!(messages.len(), 2);
    }
}

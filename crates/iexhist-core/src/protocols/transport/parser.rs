use crate::Timestamp;
use crate::protocols::HistFormat;

use super::error::TransportError;
use super::layout;
use super::reader::SegmentReader;

/// Fixed IEX-TP segment header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    pub version: u8,
    pub protocol_id: u16,
    pub channel_id: u32,
    pub session_id: u32,
    pub payload_length: u16,
    pub message_count: u16,
    pub stream_offset: i64,
    pub first_sequence: i64,
    pub send_time: Timestamp,
}

/// One parsed transport segment with its message-block payload.
///
/// The payload bytes are owned so the segment can outlive the capture frame
/// it was framed from; blocks handed out by [`Segment::next_block`] borrow
/// from the segment and are only valid until the next call.
#[derive(Debug)]
pub struct Segment {
    header: SegmentHeader,
    payload: Vec<u8>,
    cursor: usize,
    remaining: u16,
}

/// A borrowed view of one length-prefixed message block.
#[derive(Debug, Clone, Copy)]
pub struct MessageBlock<'a> {
    /// Type tag, the first byte of the block.
    pub message_type: u8,
    /// Block bytes after the type tag.
    pub payload: &'a [u8],
    /// Full block bytes including the type tag.
    pub raw: &'a [u8],
}

/// Parse a transport segment from one UDP datagram payload.
///
/// # Errors
/// Fails when the header is shorter than the fixed size, the version or
/// message protocol id does not match `format`, or the declared payload
/// length exceeds the datagram.
pub fn parse_segment(format: HistFormat, datagram: &[u8]) -> Result<Segment, TransportError> {
    let reader = SegmentReader::new(datagram);
    reader.require_len(layout::HEADER_LEN)?;

    let version = reader.read_u8(layout::VERSION_OFFSET)?;
    if version != layout::VERSION {
        return Err(TransportError::VersionMismatch {
            expected: layout::VERSION,
            actual: version,
        });
    }

    let protocol_id = reader.read_u16_le(layout::PROTOCOL_ID_RANGE.clone())?;
    if protocol_id != format.protocol_id() {
        return Err(TransportError::ProtocolMismatch {
            expected: format.protocol_id(),
            actual: protocol_id,
        });
    }

    let header = SegmentHeader {
        version,
        protocol_id,
        channel_id: reader.read_u32_le(layout::CHANNEL_ID_RANGE.clone())?,
        session_id: reader.read_u32_le(layout::SESSION_ID_RANGE.clone())?,
        payload_length: reader.read_u16_le(layout::PAYLOAD_LEN_RANGE.clone())?,
        message_count: reader.read_u16_le(layout::MESSAGE_COUNT_RANGE.clone())?,
        stream_offset: reader.read_i64_le(layout::STREAM_OFFSET_RANGE.clone())?,
        first_sequence: reader.read_i64_le(layout::FIRST_SEQUENCE_RANGE.clone())?,
        send_time: Timestamp::from_nanos(reader.read_i64_le(layout::SEND_TIME_RANGE.clone())?),
    };

    let declared = header.payload_length as usize;
    let available = datagram.len() - layout::HEADER_LEN;
    if declared > available {
        return Err(TransportError::PayloadOverrun {
            declared,
            available,
        });
    }
    let payload = reader
        .read_slice(layout::HEADER_LEN..layout::HEADER_LEN + declared)?
        .to_vec();

    Ok(Segment {
        remaining: header.message_count,
        header,
        payload,
        cursor: 0,
    })
}

impl Segment {
    pub fn header(&self) -> &SegmentHeader {
        &self.header
    }

    /// Whether all declared message blocks have been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Message blocks still declared but not yet read.
    pub fn remaining(&self) -> u16 {
        self.remaining
    }

    /// Read the next length-prefixed message block.
    ///
    /// Returns `Ok(None)` once the declared message count is exhausted.
    ///
    /// # Errors
    /// Fails when a block length runs past the segment payload, a block is
    /// empty, or the declared count disagrees with the payload extent.
    pub fn next_block(&mut self) -> Result<Option<MessageBlock<'_>>, TransportError> {
        if self.remaining == 0 {
            return Ok(None);
        }

        let prefix_end = self.cursor + layout::BLOCK_LEN_PREFIX;
        if prefix_end > self.payload.len() {
            return Err(TransportError::CountOverrun {
                remaining: self.remaining,
            });
        }
        let declared =
            u16::from_le_bytes([self.payload[self.cursor], self.payload[self.cursor + 1]]) as usize;
        if declared == 0 {
            return Err(TransportError::EmptyBlock);
        }
        let end = prefix_end + declared;
        if end > self.payload.len() {
            return Err(TransportError::BlockOverrun {
                declared,
                remaining: self.payload.len() - prefix_end,
            });
        }

        self.cursor = end;
        self.remaining -= 1;
        if self.remaining == 0 && self.cursor != self.payload.len() {
            return Err(TransportError::TrailingBytes {
                leftover: self.payload.len() - self.cursor,
            });
        }

        let raw = &self.payload[prefix_end..end];
        Ok(Some(MessageBlock {
            message_type: raw[0],
            payload: &raw[1..],
            raw,
        }))
    }
}

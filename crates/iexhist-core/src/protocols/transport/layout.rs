pub const VERSION_OFFSET: usize = 0;
pub const PROTOCOL_ID_RANGE: std::ops::Range<usize> = 2..4;
pub const CHANNEL_ID_RANGE: std::ops::Range<usize> = 4..8;
pub const SESSION_ID_RANGE: std::ops::Range<usize> = 8..12;
pub const PAYLOAD_LEN_RANGE: std::ops::Range<usize> = 12..14;
pub const MESSAGE_COUNT_RANGE: std::ops::Range<usize> = 14..16;
pub const STREAM_OFFSET_RANGE: std::ops::Range<usize> = 16..24;
pub const FIRST_SEQUENCE_RANGE: std::ops::Range<usize> = 24..32;
pub const SEND_TIME_RANGE: std::ops::Range<usize> = 32..40;

pub const HEADER_LEN: usize = 40;
pub const VERSION: u8 = 0x01;

/// Every message block starts with a 2-byte little-endian length prefix.
pub const BLOCK_LEN_PREFIX: usize = 2;

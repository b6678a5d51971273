use crate::{Price, Timestamp};

use super::error::MessageError;
use super::layout;

/// Safe fixed-offset field access over one message-block payload.
///
/// Carries the type tag so truncation errors identify the offending
/// message type.
pub struct BlockReader<'a> {
    message_type: u8,
    payload: &'a [u8],
}

impl<'a> BlockReader<'a> {
    pub fn new(message_type: u8, payload: &'a [u8]) -> Self {
        Self {
            message_type,
            payload,
        }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), MessageError> {
        if self.payload.len() < needed {
            return Err(self.truncated(needed));
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, MessageError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated(offset + 1))
    }

    /// Single-byte ASCII code field (status, side, price type).
    pub fn read_char(&self, offset: usize) -> Result<char, MessageError> {
        Ok(self.read_u8(offset)? as char)
    }

    pub fn read_u32_le(&self, range: std::ops::Range<usize>) -> Result<u32, MessageError> {
        let bytes = self.read_slice(range)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i64_le(&self, range: std::ops::Range<usize>) -> Result<i64, MessageError> {
        let bytes = self.read_slice(range)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(buf))
    }

    pub fn read_timestamp(&self) -> Result<Timestamp, MessageError> {
        Ok(Timestamp::from_nanos(
            self.read_i64_le(layout::TIMESTAMP_RANGE.clone())?,
        ))
    }

    pub fn read_price(&self, range: std::ops::Range<usize>) -> Result<Price, MessageError> {
        Ok(Price::from_raw(self.read_i64_le(range)?))
    }

    /// Fixed-width symbol field, right-padded with spaces or NULs.
    pub fn read_symbol(&self) -> Result<String, MessageError> {
        self.read_padded_string(layout::SYMBOL_RANGE.clone())
    }

    pub fn read_padded_string(
        &self,
        range: std::ops::Range<usize>,
    ) -> Result<String, MessageError> {
        let bytes = self.read_slice(range)?;
        let raw = String::from_utf8_lossy(bytes);
        Ok(raw.trim_end_matches(['\0', ' ']).to_string())
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], MessageError> {
        self.payload
            .get(range.clone())
            .ok_or_else(|| self.truncated(range.end))
    }

    fn truncated(&self, needed: usize) -> MessageError {
        MessageError::Truncated {
            message_type: self.message_type,
            needed,
            actual: self.payload.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BlockReader;
    use crate::protocols::messages::error::MessageError;

    #[test]
    fn symbol_is_trimmed_of_padding() {
        let mut payload = vec![0u8; 17];
        payload[9..17].copy_from_slice(b"ZIEXT\0\0\0");
        let reader = BlockReader::new(0x54, &payload);
        assert_eq!(reader.read_symbol().unwrap(), "ZIEXT");

        payload[9..17].copy_from_slice(b"AAPL    ");
        let reader = BlockReader::new(0x54, &payload);
        assert_eq!(reader.read_symbol().unwrap(), "AAPL");
    }

    #[test]
    fn truncation_reports_message_type_and_lengths() {
        let payload = [0u8; 4];
        let reader = BlockReader::new(0x51, &payload);
        let err = reader.require_len(41).unwrap_err();
        assert!(matches!(
            err,
            MessageError::Truncated {
                message_type: 0x51,
                needed: 41,
                actual: 4
            }
        ));
    }

    #[test]
    fn reads_little_endian_price_and_timestamp() {
        let mut payload = vec![0u8; 29];
        payload[1..9].copy_from_slice(&1_514_984_427_833_117_218i64.to_le_bytes());
        payload[21..29].copy_from_slice(&100_150i64.to_le_bytes());
        let reader = BlockReader::new(0x54, &payload);
        assert_eq!(reader.read_timestamp().unwrap().nanos(), 1_514_984_427_833_117_218);
        assert_eq!(reader.read_price(21..29).unwrap().raw(), 100_150);
    }
}

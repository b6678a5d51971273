use super::error::TransportError;

/// Safe little-endian field access over a segment header or payload.
pub struct SegmentReader<'a> {
    payload: &'a [u8],
}

impl<'a> SegmentReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), TransportError> {
        if self.payload.len() < needed {
            return Err(TransportError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, TransportError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(TransportError::TooShort {
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, TransportError> {
        let bytes = self.read_slice(range)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&self, range: std::ops::Range<usize>) -> Result<u32, TransportError> {
        let bytes = self.read_slice(range)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i64_le(&self, range: std::ops::Range<usize>) -> Result<i64, TransportError> {
        let bytes = self.read_slice(range)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(buf))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], TransportError> {
        self.payload.get(range.clone()).ok_or(TransportError::TooShort {
            needed: range.end,
            actual: self.payload.len(),
        })
    }
}

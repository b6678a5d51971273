use super::error::UdpError;

/// Length of the fixed UDP header preceding the datagram payload.
pub const UDP_HEADER_LEN: usize = 8;

pub struct UdpReader<'a> {
    payload: &'a [u8],
}

impl<'a> UdpReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), UdpError> {
        if self.payload.len() < needed {
            return Err(UdpError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    /// Datagram payload with the fixed 8-byte UDP header removed.
    pub fn payload_without_header(&self) -> Result<&'a [u8], UdpError> {
        self.require_len(UDP_HEADER_LEN)?;
        self.payload.get(UDP_HEADER_LEN..).ok_or(UdpError::TooShort {
            needed: UDP_HEADER_LEN,
            actual: self.payload.len(),
        })
    }
}

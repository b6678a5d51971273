/// Buffer size handed to the streaming pcap readers. Must hold a
/// maximum-snaplen legacy record (16-byte record header + 65535 captured
/// bytes) in one piece, or the reader would stall on a valid frame.
pub const PCAP_READER_BUFFER_SIZE: usize = 131_072;

/// PCAPNG section header block magic, as stored on disk.
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

/// Legacy PCAP magics: microsecond and nanosecond variants, both byte orders.
pub const PCAP_LEGACY_MAGICS: [[u8; 4]; 4] = [
    [0xd4, 0xc3, 0xb2, 0xa1],
    [0xa1, 0xb2, 0xc3, 0xd4],
    [0x4d, 0x3c, 0xb2, 0xa1],
    [0xa1, 0xb2, 0x3c, 0x4d],
];

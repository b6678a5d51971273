use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapNGReader, traits::PcapReaderIterator,
};

use crate::source::{CaptureFrame, FrameSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    is_legacy_magic, is_pcapng_magic, legacy_ts_to_seconds, linktype_for_interface,
    pcapng_ts_to_seconds, read_magic_and_rewind,
};

/// Capture source backed by a legacy PCAP or PCAPNG file.
pub struct PcapFileSource {
    inner: PcapReader,
    // Set after a refill triggered by an incomplete frame record. A second
    // consecutive incomplete means no more bytes arrived: the last record
    // declares more data than the file holds.
    stalled: bool,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    /// Open a capture file, validating the container's global header.
    ///
    /// # Errors
    /// `SourceError::InvalidContainer` when the magic or global header is
    /// not a recognized capture format; `SourceError::Io` on read failure.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        let inner = create_reader(file).map_err(SourceError::from)?;
        Ok(Self {
            inner,
            stalled: false,
        })
    }
}

impl FrameSource for PcapFileSource {
    fn next_frame(&mut self) -> Result<Option<CaptureFrame>, SourceError> {
        next_frame(&mut self.inner, &mut self.stalled).map_err(SourceError::from)
    }
}

fn create_reader(file: File) -> Result<PcapReader, PcapSourceError> {
    let mut file = file;
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::InvalidContainer {
                context: "pcapng global header",
                message: e.to_string(),
            }
        })?;
        Ok(PcapReader::Ng {
            reader,
            linktypes: Vec::new(),
        })
    } else if is_legacy_magic(&magic) {
        let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
            PcapSourceError::InvalidContainer {
                context: "pcap global header",
                message: e.to_string(),
            }
        })?;
        Ok(PcapReader::Legacy {
            reader,
            linktype: None,
        })
    } else {
        Err(PcapSourceError::InvalidContainer {
            context: "capture magic",
            message: format!("unrecognized magic bytes {magic:02x?}"),
        })
    }
}

fn next_frame(
    reader: &mut PcapReader,
    stalled: &mut bool,
) -> Result<Option<CaptureFrame>, PcapSourceError> {
    loop {
        match reader {
            PcapReader::Legacy { reader, linktype } => match reader.next() {
                Ok((offset, block)) => {
                    *stalled = false;
                    let frame = match block {
                        PcapBlockOwned::LegacyHeader(header) => {
                            *linktype = Some(header.network);
                            None
                        }
                        PcapBlockOwned::Legacy(packet) => {
                            let ts = legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec);
                            let lt = linktype.unwrap_or(Linktype::ETHERNET);
                            Some(CaptureFrame {
                                ts: Some(ts),
                                linktype: lt,
                                data: packet.data.to_vec(),
                            })
                        }
                        _ => None,
                    };
                    reader.consume(offset);
                    if frame.is_some() {
                        return Ok(frame);
                    }
                }
                Err(pcap_parser::PcapError::Eof) => return Ok(None),
                Err(pcap_parser::PcapError::Incomplete(_)) => {
                    if *stalled {
                        return Err(PcapSourceError::TruncatedFrame {
                            context: "pcap frame record",
                        });
                    }
                    *stalled = true;
                    reader
                        .refill()
                        .map_err(|e| PcapSourceError::InvalidContainer {
                            context: "pcap reader refill",
                            message: e.to_string(),
                        })?;
                }
                Err(e) => {
                    return Err(PcapSourceError::InvalidContainer {
                        context: "pcap frame record",
                        message: e.to_string(),
                    });
                }
            },
            PcapReader::Ng { reader, linktypes } => match reader.next() {
                Ok((offset, block)) => {
                    *stalled = false;
                    let frame = match block {
                        PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                            linktypes.push(intf.linktype);
                            None
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                            let ts = pcapng_ts_to_seconds(packet.ts_high, packet.ts_low);
                            let lt = linktype_for_interface(linktypes, packet.if_id);
                            Some(CaptureFrame {
                                ts: Some(ts),
                                linktype: lt,
                                data: packet.data.to_vec(),
                            })
                        }
                        _ => None,
                    };
                    reader.consume(offset);
                    if frame.is_some() {
                        return Ok(frame);
                    }
                }
                Err(pcap_parser::PcapError::Eof) => return Ok(None),
                Err(pcap_parser::PcapError::Incomplete(_)) => {
                    if *stalled {
                        return Err(PcapSourceError::TruncatedFrame {
                            context: "pcapng frame record",
                        });
                    }
                    *stalled = true;
                    reader
                        .refill()
                        .map_err(|e| PcapSourceError::InvalidContainer {
                            context: "pcapng reader refill",
                            message: e.to_string(),
                        })?;
                }
                Err(e) => {
                    return Err(PcapSourceError::InvalidContainer {
                        context: "pcapng frame record",
                        message: e.to_string(),
                    });
                }
            },
        }
    }
}

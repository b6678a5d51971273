//! UDP envelope stripping.
//!
//! HIST captures carry IEX-TP segments as UDP datagrams. This module peels
//! the Ethernet/IP/UDP envelope off a captured frame and hands the bare
//! datagram payload to the transport framer. Frames that are not UDP (ARP,
//! TCP, unsupported link types) are not errors; the session skips and
//! counts them.

pub mod error;
pub mod parser;
pub mod reader;

pub use parser::udp_payload;

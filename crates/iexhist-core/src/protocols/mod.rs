//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`: safe byte access and protocol conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! `transport` frames IEX-TP segments into message blocks; `messages`
//! decodes one block into a typed message. Parsers are pure and contain no
//! I/O; sources and the session handle file access and state.

pub mod messages;
pub mod transport;

use serde::{Deserialize, Serialize};

/// HIST feed subformat. TOPS and DEEP share transport framing but differ in
/// the set and layout of supported message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistFormat {
    /// TOPS 1.5 (quote/trade/break only, padded trade layouts).
    Tops15,
    /// TOPS 1.6, the current top-of-book feed.
    Tops16,
    /// DEEP 1.0, full order-book depth.
    Deep10,
}

impl HistFormat {
    /// Message protocol id carried in the IEX-TP segment header.
    pub const fn protocol_id(self) -> u16 {
        match self {
            HistFormat::Tops15 => 0x8002,
            HistFormat::Tops16 => 0x8003,
            HistFormat::Deep10 => 0x8004,
        }
    }
}

impl std::fmt::Display for HistFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HistFormat::Tops15 => "TOPS 1.5",
            HistFormat::Tops16 => "TOPS 1.6",
            HistFormat::Deep10 => "DEEP 1.0",
        };
        write!(f, "{name}")
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use etherparse::PacketBuilder;

use iexhist_core::HistFormat;

pub const TS: i64 = 1_514_984_427_833_117_218;

/// Write capture bytes to a uniquely named temp file and return its path.
pub fn write_temp_capture(prefix: &str, ext: &str, bytes: &[u8]) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("iexhist_{prefix}_{unique}.{ext}"));
    fs::write(&path, bytes).unwrap();
    path
}

/// Legacy pcap container: microsecond global header plus one record per
/// frame, Ethernet linktype.
pub fn legacy_pcap(frames: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0xd4, 0xc3, 0xb2, 0xa1]);
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&65535u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    for (index, frame) in frames.iter().enumerate() {
        bytes.extend_from_slice(&(1_514_984_427u32 + index as u32).to_le_bytes());
        bytes.extend_from_slice(&833_117u32.to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(frame);
    }
    bytes
}

/// PCAPNG container: section header, one Ethernet interface, one enhanced
/// packet block per frame.
pub fn pcapng_capture(frames: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Vec::new();
    // Section header block.
    bytes.extend_from_slice(&0x0a0d_0d0au32.to_le_bytes());
    bytes.extend_from_slice(&28u32.to_le_bytes());
    bytes.extend_from_slice(&0x1a2b_3c4du32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&u64::MAX.to_le_bytes());
    bytes.extend_from_slice(&28u32.to_le_bytes());
    // Interface description block, Ethernet.
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&20u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&20u32.to_le_bytes());
    // Enhanced packet blocks, data padded to 32-bit boundaries.
    for frame in frames {
        let padded = frame.len().div_ceil(4) * 4;
        let total = 32 + padded as u32;
        bytes.extend_from_slice(&6u32.to_le_bytes());
        bytes.extend_from_slice(&total.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        bytes.extend_from_slice(frame);
        bytes.resize(bytes.len() + (padded - frame.len()), 0);
        bytes.extend_from_slice(&total.to_le_bytes());
    }
    bytes
}

/// Ethernet/IPv4/UDP frame around a datagram payload.
pub fn udp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
        .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
        .udp(10378, 10378);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

/// Transport segment wrapping the given message blocks.
pub fn segment(format: HistFormat, blocks: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    for block in blocks {
        payload.extend_from_slice(&(block.len() as u16).to_le_bytes());
        payload.extend_from_slice(block);
    }
    let mut datagram = vec![0u8; 40];
    datagram[0] = 0x01;
    datagram[2..4].copy_from_slice(&format.protocol_id().to_le_bytes());
    datagram[4..8].copy_from_slice(&1u32.to_le_bytes());
    datagram[8..12].copy_from_slice(&session_id().to_le_bytes());
    datagram[12..14].copy_from_slice(&(payload.len() as u16).to_le_bytes());
    datagram[14..16].copy_from_slice(&(blocks.len() as u16).to_le_bytes());
    datagram[32..40].copy_from_slice(&TS.to_le_bytes());
    datagram.extend_from_slice(&payload);
    datagram
}

fn session_id() -> u32 {
    1_090_354_342
}

pub fn trade_report_block(symbol: &[u8; 8], size: u32, price: i64, trade_id: i64) -> Vec<u8> {
    let mut block = vec![0x54, 0x00];
    block.extend_from_slice(&TS.to_le_bytes());
    block.extend_from_slice(symbol);
    block.extend_from_slice(&size.to_le_bytes());
    block.extend_from_slice(&price.to_le_bytes());
    block.extend_from_slice(&trade_id.to_le_bytes());
    block
}

pub fn quote_update_block(symbol: &[u8; 8], bid: i64, ask: i64) -> Vec<u8> {
    let mut block = vec![0x51, 0x00];
    block.extend_from_slice(&TS.to_le_bytes());
    block.extend_from_slice(symbol);
    block.extend_from_slice(&9700u32.to_le_bytes());
    block.extend_from_slice(&bid.to_le_bytes());
    block.extend_from_slice(&ask.to_le_bytes());
    block.extend_from_slice(&1000u32.to_le_bytes());
    block
}

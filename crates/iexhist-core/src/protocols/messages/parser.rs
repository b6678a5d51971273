use serde::{Deserialize, Serialize};

use crate::protocols::HistFormat;
use crate::{Price, Timestamp};

use super::error::MessageError;
use super::layout;
use super::reader::BlockReader;

/// Side of the book touched by a DEEP price level update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// Discriminant-only view of a [`Message`], used by allow-list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    SystemEvent,
    SecurityDirectory,
    TradingStatus,
    OperationalHalt,
    ShortSalePriceTest,
    SecurityEvent,
    QuoteUpdate,
    TradeReport,
    OfficialPrice,
    TradeBreak,
    AuctionInformation,
    PriceLevelUpdate,
}

/// System-wide or feed-wide event, one per event type per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemEvent {
    /// Event code byte (e.g. `O` start of messages, `C` end of messages).
    pub system_event: u8,
    pub timestamp: Timestamp,
}

/// Security reference data, disseminated as a pre-market spin plus updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityDirectory {
    pub flags: u8,
    pub timestamp: Timestamp,
    pub symbol: String,
    pub round_lot_size: u32,
    pub adjusted_poc_close: Price,
    pub luld_tier: u8,
}

/// Current trading status of a security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingStatus {
    /// `H` halted, `O` order acceptance, `P` paused, `T` trading.
    pub status: char,
    pub timestamp: Timestamp,
    pub symbol: String,
    /// Four-character reason code (e.g. `T1`, `IPO1`, `MCB3`), trimmed.
    pub reason: String,
}

/// Operational halt state for a security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalHalt {
    pub halt_status: char,
    pub timestamp: Timestamp,
    pub symbol: String,
}

/// Reg SHO short sale price test state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortSalePriceTest {
    pub status: u8,
    pub timestamp: Timestamp,
    pub symbol: String,
    pub detail: char,
}

/// Per-security event (DEEP only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub security_event: u8,
    pub timestamp: Timestamp,
    pub symbol: String,
}

/// Best bid and offer update (TOPS only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    pub flags: u8,
    pub timestamp: Timestamp,
    pub symbol: String,
    pub bid_size: u32,
    pub bid_price: Price,
    pub ask_price: Price,
    pub ask_size: u32,
}

/// One fill on the IEX order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReport {
    pub flags: u8,
    pub timestamp: Timestamp,
    pub symbol: String,
    pub size: u32,
    pub price: Price,
    /// Unique within the trading day.
    pub trade_id: i64,
}

/// IEX official opening or closing price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialPrice {
    /// `Q` opening price, `M` closing price.
    pub price_type: char,
    pub timestamp: Timestamp,
    pub symbol: String,
    pub price: Price,
}

/// A same-day break of a prior execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeBreak {
    pub sale_flags: u8,
    pub timestamp: Timestamp,
    pub symbol: String,
    /// Zero for TOPS 1.5 captures, whose trade break carries no size field.
    pub size: u32,
    pub price: Price,
    pub trade_id: i64,
}

/// Auction imbalance and collar state, broadcast around auction windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionInformation {
    /// `O` opening, `C` closing, `I` IPO, `H` halt, `V` volatility.
    pub auction_type: char,
    pub timestamp: Timestamp,
    pub symbol: String,
    pub paired_shares: u32,
    pub reference_price: Price,
    pub indicative_clearing_price: Price,
    pub imbalance_shares: u32,
    pub imbalance_side: char,
    pub extension_number: u8,
    /// Seconds since the Unix epoch, unlike every other time field.
    pub scheduled_auction_time: u32,
    pub auction_book_clearing_price: Price,
    pub collar_reference_price: Price,
    pub lower_auction_collar_price: Price,
    pub upper_auction_collar_price: Price,
}

/// Displayed price level change on one side of the book (DEEP only).
/// A size of zero removes the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevelUpdate {
    pub side: Side,
    pub event_flags: u8,
    pub timestamp: Timestamp,
    pub symbol: String,
    pub size: u32,
    pub price: Price,
}

/// Closed set of decoded HIST messages, one variant per supported type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    SystemEvent(SystemEvent),
    SecurityDirectory(SecurityDirectory),
    TradingStatus(TradingStatus),
    OperationalHalt(OperationalHalt),
    ShortSalePriceTest(ShortSalePriceTest),
    SecurityEvent(SecurityEvent),
    QuoteUpdate(QuoteUpdate),
    TradeReport(TradeReport),
    OfficialPrice(OfficialPrice),
    TradeBreak(TradeBreak),
    AuctionInformation(AuctionInformation),
    PriceLevelUpdate(PriceLevelUpdate),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::SystemEvent(_) => MessageKind::SystemEvent,
            Message::SecurityDirectory(_) => MessageKind::SecurityDirectory,
            Message::TradingStatus(_) => MessageKind::TradingStatus,
            Message::OperationalHalt(_) => MessageKind::OperationalHalt,
            Message::ShortSalePriceTest(_) => MessageKind::ShortSalePriceTest,
            Message::SecurityEvent(_) => MessageKind::SecurityEvent,
            Message::QuoteUpdate(_) => MessageKind::QuoteUpdate,
            Message::TradeReport(_) => MessageKind::TradeReport,
            Message::OfficialPrice(_) => MessageKind::OfficialPrice,
            Message::TradeBreak(_) => MessageKind::TradeBreak,
            Message::AuctionInformation(_) => MessageKind::AuctionInformation,
            Message::PriceLevelUpdate(_) => MessageKind::PriceLevelUpdate,
        }
    }

    /// Raw nanosecond timestamp shared by every message type.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Message::SystemEvent(m) => m.timestamp,
            Message::SecurityDirectory(m) => m.timestamp,
            Message::TradingStatus(m) => m.timestamp,
            Message::OperationalHalt(m) => m.timestamp,
            Message::ShortSalePriceTest(m) => m.timestamp,
            Message::SecurityEvent(m) => m.timestamp,
            Message::QuoteUpdate(m) => m.timestamp,
            Message::TradeReport(m) => m.timestamp,
            Message::OfficialPrice(m) => m.timestamp,
            Message::TradeBreak(m) => m.timestamp,
            Message::AuctionInformation(m) => m.timestamp,
            Message::PriceLevelUpdate(m) => m.timestamp,
        }
    }

    /// The leading flags/subtype byte shared by every message type.
    pub fn flags_byte(&self) -> u8 {
        match self {
            Message::SystemEvent(m) => m.system_event,
            Message::SecurityDirectory(m) => m.flags,
            Message::TradingStatus(m) => m.status as u8,
            Message::OperationalHalt(m) => m.halt_status as u8,
            Message::ShortSalePriceTest(m) => m.status,
            Message::SecurityEvent(m) => m.security_event,
            Message::QuoteUpdate(m) => m.flags,
            Message::TradeReport(m) => m.flags,
            Message::OfficialPrice(m) => m.price_type as u8,
            Message::TradeBreak(m) => m.sale_flags,
            Message::AuctionInformation(m) => m.auction_type as u8,
            Message::PriceLevelUpdate(m) => m.event_flags,
        }
    }

    /// Symbol for per-security messages; `None` for system events.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Message::SystemEvent(_) => None,
            Message::SecurityDirectory(m) => Some(&m.symbol),
            Message::TradingStatus(m) => Some(&m.symbol),
            Message::OperationalHalt(m) => Some(&m.symbol),
            Message::ShortSalePriceTest(m) => Some(&m.symbol),
            Message::SecurityEvent(m) => Some(&m.symbol),
            Message::QuoteUpdate(m) => Some(&m.symbol),
            Message::TradeReport(m) => Some(&m.symbol),
            Message::OfficialPrice(m) => Some(&m.symbol),
            Message::TradeBreak(m) => Some(&m.symbol),
            Message::AuctionInformation(m) => Some(&m.symbol),
            Message::PriceLevelUpdate(m) => Some(&m.symbol),
        }
    }
}

/// Result of decoding one message block.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Message(Message),
    /// Recognized-but-unimplemented or genuinely unknown type tag.
    /// `length` is the full block length including the tag byte, so the
    /// caller can account for consumed bytes without interpreting content.
    Unsupported { message_type: u8, length: usize },
}

/// Decode one message block given its type tag and the bytes after it.
///
/// Purely a function of `(format, message_type, payload)`; no cross-message
/// state. Tags outside `format`'s supported set yield
/// [`Decoded::Unsupported`], never an error.
///
/// # Errors
/// `MessageError::Truncated` when a known type's block is shorter than its
/// fixed layout. Trailing bytes beyond the layout are ignored.
pub fn decode_message(
    format: HistFormat,
    message_type: u8,
    payload: &[u8],
) -> Result<Decoded, MessageError> {
    let v15 = format == HistFormat::Tops15;
    let message = match message_type {
        layout::SYSTEM_EVENT if !v15 => Message::SystemEvent(decode_system_event(payload)?),
        layout::SECURITY_DIRECTORY if !v15 => {
            Message::SecurityDirectory(decode_security_directory(payload)?)
        }
        layout::TRADING_STATUS if !v15 => Message::TradingStatus(decode_trading_status(payload)?),
        layout::OPERATIONAL_HALT if !v15 => {
            Message::OperationalHalt(decode_operational_halt(payload)?)
        }
        layout::SHORT_SALE_PRICE_TEST if !v15 => {
            Message::ShortSalePriceTest(decode_short_sale_price_test(payload)?)
        }
        layout::SECURITY_EVENT if format == HistFormat::Deep10 => {
            Message::SecurityEvent(decode_security_event(payload)?)
        }
        layout::QUOTE_UPDATE if format != HistFormat::Deep10 => {
            Message::QuoteUpdate(decode_quote_update(payload)?)
        }
        layout::TRADE_REPORT => Message::TradeReport(decode_trade_report(payload)?),
        layout::OFFICIAL_PRICE if !v15 => Message::OfficialPrice(decode_official_price(payload)?),
        layout::TRADE_BREAK if v15 => Message::TradeBreak(decode_trade_break_v15(payload)?),
        layout::TRADE_BREAK => Message::TradeBreak(decode_trade_break(payload)?),
        layout::AUCTION_INFORMATION if !v15 => {
            Message::AuctionInformation(decode_auction_information(payload)?)
        }
        layout::PRICE_LEVEL_UPDATE_BUY if format == HistFormat::Deep10 => {
            Message::PriceLevelUpdate(decode_price_level_update(Side::Buy, payload)?)
        }
        layout::PRICE_LEVEL_UPDATE_SELL if format == HistFormat::Deep10 => {
            Message::PriceLevelUpdate(decode_price_level_update(Side::Sell, payload)?)
        }
        _ => {
            return Ok(Decoded::Unsupported {
                message_type,
                length: payload.len() + 1,
            });
        }
    };
    Ok(Decoded::Message(message))
}

fn decode_system_event(payload: &[u8]) -> Result<SystemEvent, MessageError> {
    let reader = BlockReader::new(layout::SYSTEM_EVENT, payload);
    reader.require_len(layout::SYSTEM_EVENT_MIN_LEN)?;
    Ok(SystemEvent {
        system_event: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
    })
}

fn decode_security_directory(payload: &[u8]) -> Result<SecurityDirectory, MessageError> {
    let reader = BlockReader::new(layout::SECURITY_DIRECTORY, payload);
    reader.require_len(layout::DIRECTORY_MIN_LEN)?;
    Ok(SecurityDirectory {
        flags: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        round_lot_size: reader.read_u32_le(layout::DIRECTORY_ROUND_LOT_RANGE.clone())?,
        adjusted_poc_close: reader.read_price(layout::DIRECTORY_POC_PRICE_RANGE.clone())?,
        luld_tier: reader.read_u8(layout::DIRECTORY_LULD_TIER_OFFSET)?,
    })
}

fn decode_trading_status(payload: &[u8]) -> Result<TradingStatus, MessageError> {
    let reader = BlockReader::new(layout::TRADING_STATUS, payload);
    reader.require_len(layout::TRADING_STATUS_MIN_LEN)?;
    Ok(TradingStatus {
        status: reader.read_char(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        reason: reader.read_padded_string(layout::TRADING_STATUS_REASON_RANGE.clone())?,
    })
}

fn decode_operational_halt(payload: &[u8]) -> Result<OperationalHalt, MessageError> {
    let reader = BlockReader::new(layout::OPERATIONAL_HALT, payload);
    reader.require_len(layout::OPERATIONAL_HALT_MIN_LEN)?;
    Ok(OperationalHalt {
        halt_status: reader.read_char(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
    })
}

fn decode_short_sale_price_test(payload: &[u8]) -> Result<ShortSalePriceTest, MessageError> {
    let reader = BlockReader::new(layout::SHORT_SALE_PRICE_TEST, payload);
    reader.require_len(layout::SHORT_SALE_MIN_LEN)?;
    Ok(ShortSalePriceTest {
        status: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        detail: reader.read_char(layout::SHORT_SALE_DETAIL_OFFSET)?,
    })
}

fn decode_security_event(payload: &[u8]) -> Result<SecurityEvent, MessageError> {
    let reader = BlockReader::new(layout::SECURITY_EVENT, payload);
    reader.require_len(layout::SECURITY_EVENT_MIN_LEN)?;
    Ok(SecurityEvent {
        security_event: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
    })
}

fn decode_quote_update(payload: &[u8]) -> Result<QuoteUpdate, MessageError> {
    let reader = BlockReader::new(layout::QUOTE_UPDATE, payload);
    reader.require_len(layout::QUOTE_MIN_LEN)?;
    Ok(QuoteUpdate {
        flags: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        bid_size: reader.read_u32_le(layout::QUOTE_BID_SIZE_RANGE.clone())?,
        bid_price: reader.read_price(layout::QUOTE_BID_PRICE_RANGE.clone())?,
        ask_price: reader.read_price(layout::QUOTE_ASK_PRICE_RANGE.clone())?,
        ask_size: reader.read_u32_le(layout::QUOTE_ASK_SIZE_RANGE.clone())?,
    })
}

fn decode_trade_report(payload: &[u8]) -> Result<TradeReport, MessageError> {
    let reader = BlockReader::new(layout::TRADE_REPORT, payload);
    reader.require_len(layout::TRADE_MIN_LEN)?;
    Ok(TradeReport {
        flags: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        size: reader.read_u32_le(layout::TRADE_SIZE_RANGE.clone())?,
        price: reader.read_price(layout::TRADE_PRICE_RANGE.clone())?,
        trade_id: reader.read_i64_le(layout::TRADE_ID_RANGE.clone())?,
    })
}

fn decode_official_price(payload: &[u8]) -> Result<OfficialPrice, MessageError> {
    let reader = BlockReader::new(layout::OFFICIAL_PRICE, payload);
    reader.require_len(layout::OFFICIAL_PRICE_MIN_LEN)?;
    Ok(OfficialPrice {
        price_type: reader.read_char(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        price: reader.read_price(layout::OFFICIAL_PRICE_RANGE.clone())?,
    })
}

fn decode_trade_break(payload: &[u8]) -> Result<TradeBreak, MessageError> {
    let reader = BlockReader::new(layout::TRADE_BREAK, payload);
    reader.require_len(layout::TRADE_MIN_LEN)?;
    Ok(TradeBreak {
        sale_flags: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        size: reader.read_u32_le(layout::TRADE_SIZE_RANGE.clone())?,
        price: reader.read_price(layout::TRADE_PRICE_RANGE.clone())?,
        trade_id: reader.read_i64_le(layout::TRADE_ID_RANGE.clone())?,
    })
}

fn decode_trade_break_v15(payload: &[u8]) -> Result<TradeBreak, MessageError> {
    let reader = BlockReader::new(layout::TRADE_BREAK, payload);
    reader.require_len(layout::TRADE_BREAK_V15_MIN_LEN)?;
    Ok(TradeBreak {
        sale_flags: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        size: 0,
        price: reader.read_price(layout::TRADE_BREAK_V15_PRICE_RANGE.clone())?,
        trade_id: reader.read_i64_le(layout::TRADE_BREAK_V15_ID_RANGE.clone())?,
    })
}

fn decode_auction_information(payload: &[u8]) -> Result<AuctionInformation, MessageError> {
    let reader = BlockReader::new(layout::AUCTION_INFORMATION, payload);
    reader.require_len(layout::AUCTION_MIN_LEN)?;
    Ok(AuctionInformation {
        auction_type: reader.read_char(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        paired_shares: reader.read_u32_le(layout::AUCTION_PAIRED_SHARES_RANGE.clone())?,
        reference_price: reader.read_price(layout::AUCTION_REFERENCE_PRICE_RANGE.clone())?,
        indicative_clearing_price: reader
            .read_price(layout::AUCTION_INDICATIVE_PRICE_RANGE.clone())?,
        imbalance_shares: reader.read_u32_le(layout::AUCTION_IMBALANCE_SHARES_RANGE.clone())?,
        imbalance_side: reader.read_char(layout::AUCTION_IMBALANCE_SIDE_OFFSET)?,
        extension_number: reader.read_u8(layout::AUCTION_EXTENSION_NUMBER_OFFSET)?,
        scheduled_auction_time: reader.read_u32_le(layout::AUCTION_SCHEDULED_TIME_RANGE.clone())?,
        auction_book_clearing_price: reader
            .read_price(layout::AUCTION_BOOK_CLEARING_PRICE_RANGE.clone())?,
        collar_reference_price: reader
            .read_price(layout::AUCTION_COLLAR_REFERENCE_PRICE_RANGE.clone())?,
        lower_auction_collar_price: reader
            .read_price(layout::AUCTION_LOWER_COLLAR_PRICE_RANGE.clone())?,
        upper_auction_collar_price: reader
            .read_price(layout::AUCTION_UPPER_COLLAR_PRICE_RANGE.clone())?,
    })
}

fn decode_price_level_update(
    side: Side,
    payload: &[u8],
) -> Result<PriceLevelUpdate, MessageError> {
    let tag = match side {
        Side::Buy => layout::PRICE_LEVEL_UPDATE_BUY,
        Side::Sell => layout::PRICE_LEVEL_UPDATE_SELL,
    };
    let reader = BlockReader::new(tag, payload);
    reader.require_len(layout::LEVEL_MIN_LEN)?;
    Ok(PriceLevelUpdate {
        side,
        event_flags: reader.read_u8(layout::FLAGS_OFFSET)?,
        timestamp: reader.read_timestamp()?,
        symbol: reader.read_symbol()?,
        size: reader.read_u32_le(layout::LEVEL_SIZE_RANGE.clone())?,
        price: reader.read_price(layout::LEVEL_PRICE_RANGE.clone())?,
    })
}

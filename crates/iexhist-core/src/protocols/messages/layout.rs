// Type tags (the first byte of every message block).
pub const SYSTEM_EVENT: u8 = 0x53;
pub const SECURITY_DIRECTORY: u8 = 0x44;
pub const TRADING_STATUS: u8 = 0x48;
pub const OPERATIONAL_HALT: u8 = 0x4f;
pub const SHORT_SALE_PRICE_TEST: u8 = 0x50;
pub const SECURITY_EVENT: u8 = 0x45;
pub const QUOTE_UPDATE: u8 = 0x51;
pub const TRADE_REPORT: u8 = 0x54;
pub const OFFICIAL_PRICE: u8 = 0x58;
pub const TRADE_BREAK: u8 = 0x42;
pub const AUCTION_INFORMATION: u8 = 0x41;
pub const PRICE_LEVEL_UPDATE_BUY: u8 = 0x38;
pub const PRICE_LEVEL_UPDATE_SELL: u8 = 0x35;

// Offsets below are relative to the block payload, i.e. the bytes after the
// type tag. Every message starts with a 1-byte flags/subtype field and an
// 8-byte nanosecond timestamp; most follow with an 8-byte padded symbol.
pub const FLAGS_OFFSET: usize = 0;
pub const TIMESTAMP_RANGE: std::ops::Range<usize> = 1..9;
pub const SYMBOL_RANGE: std::ops::Range<usize> = 9..17;
pub const SYMBOL_LEN: usize = 8;

pub const SYSTEM_EVENT_MIN_LEN: usize = 9;

pub const DIRECTORY_ROUND_LOT_RANGE: std::ops::Range<usize> = 17..21;
pub const DIRECTORY_POC_PRICE_RANGE: std::ops::Range<usize> = 21..29;
pub const DIRECTORY_LULD_TIER_OFFSET: usize = 29;
pub const DIRECTORY_MIN_LEN: usize = 30;

pub const TRADING_STATUS_REASON_RANGE: std::ops::Range<usize> = 17..21;
pub const TRADING_STATUS_MIN_LEN: usize = 21;

pub const OPERATIONAL_HALT_MIN_LEN: usize = 17;

pub const SHORT_SALE_DETAIL_OFFSET: usize = 17;
pub const SHORT_SALE_MIN_LEN: usize = 18;

pub const SECURITY_EVENT_MIN_LEN: usize = 17;

pub const QUOTE_BID_SIZE_RANGE: std::ops::Range<usize> = 17..21;
pub const QUOTE_BID_PRICE_RANGE: std::ops::Range<usize> = 21..29;
pub const QUOTE_ASK_PRICE_RANGE: std::ops::Range<usize> = 29..37;
pub const QUOTE_ASK_SIZE_RANGE: std::ops::Range<usize> = 37..41;
pub const QUOTE_MIN_LEN: usize = 41;

pub const TRADE_SIZE_RANGE: std::ops::Range<usize> = 17..21;
pub const TRADE_PRICE_RANGE: std::ops::Range<usize> = 21..29;
pub const TRADE_ID_RANGE: std::ops::Range<usize> = 29..37;
pub const TRADE_MIN_LEN: usize = 37;

pub const OFFICIAL_PRICE_RANGE: std::ops::Range<usize> = 17..25;
pub const OFFICIAL_PRICE_MIN_LEN: usize = 25;

pub const AUCTION_PAIRED_SHARES_RANGE: std::ops::Range<usize> = 17..21;
pub const AUCTION_REFERENCE_PRICE_RANGE: std::ops::Range<usize> = 21..29;
pub const AUCTION_INDICATIVE_PRICE_RANGE: std::ops::Range<usize> = 29..37;
pub const AUCTION_IMBALANCE_SHARES_RANGE: std::ops::Range<usize> = 37..41;
pub const AUCTION_IMBALANCE_SIDE_OFFSET: usize = 41;
pub const AUCTION_EXTENSION_NUMBER_OFFSET: usize = 42;
pub const AUCTION_SCHEDULED_TIME_RANGE: std::ops::Range<usize> = 43..47;
pub const AUCTION_BOOK_CLEARING_PRICE_RANGE: std::ops::Range<usize> = 47..55;
pub const AUCTION_COLLAR_REFERENCE_PRICE_RANGE: std::ops::Range<usize> = 55..63;
pub const AUCTION_LOWER_COLLAR_PRICE_RANGE: std::ops::Range<usize> = 63..71;
pub const AUCTION_UPPER_COLLAR_PRICE_RANGE: std::ops::Range<usize> = 71..79;
pub const AUCTION_MIN_LEN: usize = 79;

pub const LEVEL_SIZE_RANGE: std::ops::Range<usize> = 17..21;
pub const LEVEL_PRICE_RANGE: std::ops::Range<usize> = 21..29;
pub const LEVEL_MIN_LEN: usize = 29;

// TOPS 1.5 trade break carries no size field; price and trade id shift
// forward and the block ends with 4 pad bytes (ignored).
pub const TRADE_BREAK_V15_PRICE_RANGE: std::ops::Range<usize> = 17..25;
pub const TRADE_BREAK_V15_ID_RANGE: std::ops::Range<usize> = 25..33;
pub const TRADE_BREAK_V15_MIN_LEN: usize = 33;

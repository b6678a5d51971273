//! TOPS/DEEP message decoding.
//!
//! One message block decodes into one [`Message`] variant purely from its
//! type tag and bytes; there is no cross-message state. Unknown or
//! out-of-format tags are not errors: they decode to
//! [`Decoded::Unsupported`] with the consumed length so the caller can keep
//! its byte accounting without interpreting content. Trailing bytes beyond
//! a known fixed layout are ignored for forward compatibility.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::MessageError;
pub use parser::{
    AuctionInformation, Decoded, Message, MessageKind, OfficialPrice, OperationalHalt,
    PriceLevelUpdate, QuoteUpdate, SecurityDirectory, SecurityEvent, ShortSalePriceTest, Side,
    SystemEvent, TradeBreak, TradeReport, TradingStatus, decode_message,
};

//! # Lodive Core
//!
//! Core types shared by every Lodive crate.
//!
//! Lodive is a ticketing marketplace whose state lives entirely in an
//! on-chain program. This crate holds the chain-facing vocabulary that the
//! rest of the client speaks:
//!
//! - [`WalletIdentity`] and [`Network`]: who is connected and where
//! - [`InputValue`]: typed on-chain literals (`100u32`, `7field`, ...)
//! - [`DecodedRecord`], [`EventRecord`], [`VenueRecord`]: mapping values
//!   decoded from the chain's structured text format
//! - [`Balance`]: microcredit balances with display formatting
//!
//! ## Example
//!
//! ```rust
//! use lodive_core::{decode_struct, EventRecord};
//!
//! let text = "{ event_id: 7field, ticket_supply: 100u32, ticket_price: 50u64, \
//!             venue_id: 3field, event_owner: 9field, is_started: false, is_ended: false }";
//! let record = decode_struct(text).unwrap();
//! let event = EventRecord::try_from(&record).unwrap();
//! assert_eq!(event.ticket_supply, 100);
//! ```

pub mod balance;
pub mod error;
pub mod identity;
pub mod literal;
pub mod record;

// Re-exports
pub use balance::{Balance, MICROCREDITS_PER_CREDIT};
pub use error::{CoreError, CoreResult};
pub use identity::{Network, WalletIdentity};
pub use literal::{
    InputValue, LiteralType, parse_bool, parse_u8, parse_u32, parse_u64, split_literal,
    strip_type_suffix,
};
pub use record::{
    DecodeOutcome, DecodedRecord, EventRecord, EventStatus, FromRecord, MappingEntry, Owned,
    VenueRecord, decode_entries, decode_struct,
};

//! Decoding of on-chain mapping values
//!
//! The indexer returns each mapping value as the program's struct text
//! format:
//!
//! ```text
//! {
//!   event_id: 7field,
//!   ticket_supply: 100u32,
//!   ...
//! }
//! ```
//!
//! [`decode_struct`] turns that into a [`DecodedRecord`]; [`FromRecord`]
//! lifts a decoded record into a typed entity. [`decode_entries`] decodes a
//! whole batch and isolates failures per entry.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::literal::{LiteralType, parse_bool, parse_u8, parse_u32, parse_u64, split_literal};

/// Raw key/value pair from a program mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub key: String,
    pub value: String,
}

impl MappingEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Field name to literal text, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedRecord {
    fields: Vec<(String, String)>,
}

impl DecodedRecord {
    /// Build a record from `(name, literal)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Literal text of a field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Literal text of a required field
    pub fn require(&self, name: &str) -> CoreResult<&str> {
        self.get(name)
            .ok_or_else(|| CoreError::MissingField(name.to_string()))
    }

    /// Iterate over `(name, literal)` pairs
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse the struct text format into a [`DecodedRecord`].
///
/// Only flat structs are supported; nested structs are a decode error.
pub fn decode_struct(text: &str) -> CoreResult<DecodedRecord> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| CoreError::Decode(format!("expected braces around struct: {}", trimmed)))?;

    if inner.contains('{') || inner.contains('}') {
        return Err(CoreError::Decode("nested structs are not supported".to_string()));
    }

    let mut fields: Vec<(String, String)> = Vec::new();
    for part in inner.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (name, value) = part
            .split_once(':')
            .ok_or_else(|| CoreError::Decode(format!("expected `name: value`, got `{}`", part)))?;
        let name = name.trim();
        let value = value.trim();

        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(CoreError::Decode(format!("invalid field name `{}`", name)));
        }
        if value.is_empty() {
            return Err(CoreError::Decode(format!("empty value for `{}`", name)));
        }
        if fields.iter().any(|(k, _)| k == name) {
            return Err(CoreError::Decode(format!("duplicate field `{}`", name)));
        }

        fields.push((name.to_string(), value.to_string()));
    }

    Ok(DecodedRecord { fields })
}

/// Typed entities decodable from a [`DecodedRecord`]
pub trait FromRecord: Sized {
    fn from_record(record: &DecodedRecord) -> CoreResult<Self>;
}

impl FromRecord for DecodedRecord {
    fn from_record(record: &DecodedRecord) -> CoreResult<Self> {
        Ok(record.clone())
    }
}

/// Entities carrying an owner hash
pub trait Owned {
    /// Name of the owner field in the mapping value
    const OWNER_FIELD: &'static str;

    /// Owner hash literal as stored on chain
    fn owner(&self) -> &str;
}

/// Result of decoding a batch of mapping entries
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome<R> {
    /// Successfully decoded records, in input order
    pub records: Vec<R>,
    /// Number of entries that failed to decode
    pub skipped: usize,
}

/// Decode every entry, skipping (and logging) the ones that fail.
pub fn decode_entries<R: FromRecord>(entries: &[MappingEntry]) -> DecodeOutcome<R> {
    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for entry in entries {
        match decode_struct(&entry.value).and_then(|record| R::from_record(&record)) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(key = %entry.key, error = %e, "Skipping undecodable mapping entry");
            }
        }
    }

    DecodeOutcome { records, skipped }
}

/// Lifecycle of an event as reflected by its flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Scheduled,
    Started,
    Ended,
}

/// An event registered on chain (`events` mapping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event id literal (`<digits>field`)
    pub event_id: String,
    pub ticket_supply: u32,
    /// Ticket price in microcredits
    pub ticket_price: u64,
    /// Venue this event takes place at
    pub venue_id: String,
    /// Owner hash literal
    pub event_owner: String,
    pub is_started: bool,
    pub is_ended: bool,
}

impl EventRecord {
    pub fn status(&self) -> EventStatus {
        if self.is_ended {
            EventStatus::Ended
        } else if self.is_started {
            EventStatus::Started
        } else {
            EventStatus::Scheduled
        }
    }
}

/// Field literal with any visibility marker removed
fn field_literal(record: &DecodedRecord, name: &str) -> CoreResult<String> {
    let raw = record.require(name)?;
    match split_literal(raw) {
        (body, Some(LiteralType::Field)) => Ok(format!("{}field", body)),
        (_, Some(other)) => Err(CoreError::TypeMismatch {
            expected: LiteralType::Field.to_string(),
            actual: other.to_string(),
        }),
        (_, None) => Err(CoreError::InvalidLiteral(raw.to_string())),
    }
}

/// Lifecycle flags may be absent on entries written by older program versions
fn optional_flag(record: &DecodedRecord, name: &str) -> CoreResult<bool> {
    record.get(name).map(parse_bool).unwrap_or(Ok(false))
}

impl FromRecord for EventRecord {
    fn from_record(record: &DecodedRecord) -> CoreResult<Self> {
        Ok(Self {
            event_id: field_literal(record, "event_id")?,
            ticket_supply: parse_u32(record.require("ticket_supply")?)?,
            ticket_price: parse_u64(record.require("ticket_price")?)?,
            venue_id: field_literal(record, "venue_id")?,
            event_owner: field_literal(record, "event_owner")?,
            is_started: optional_flag(record, "is_started")?,
            is_ended: optional_flag(record, "is_ended")?,
        })
    }
}

impl TryFrom<&DecodedRecord> for EventRecord {
    type Error = CoreError;

    fn try_from(record: &DecodedRecord) -> CoreResult<Self> {
        Self::from_record(record)
    }
}

impl Owned for EventRecord {
    const OWNER_FIELD: &'static str = "event_owner";

    fn owner(&self) -> &str {
        &self.event_owner
    }
}

/// A venue registered on chain (`venues` mapping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub venue_id: String,
    /// Commission percentage, 0..=100
    pub commission: u8,
    pub venue_owner: String,
}

impl FromRecord for VenueRecord {
    fn from_record(record: &DecodedRecord) -> CoreResult<Self> {
        Ok(Self {
            venue_id: field_literal(record, "venue_id")?,
            commission: parse_u8(record.require("commission")?)?,
            venue_owner: field_literal(record, "venue_owner")?,
        })
    }
}

impl TryFrom<&DecodedRecord> for VenueRecord {
    type Error = CoreError;

    fn try_from(record: &DecodedRecord) -> CoreResult<Self> {
        Self::from_record(record)
    }
}

impl Owned for VenueRecord {
    const OWNER_FIELD: &'static str = "venue_owner";

    fn owner(&self) -> &str {
        &self.venue_owner
    }
}

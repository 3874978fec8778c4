//! Outbound transactions
//!
//! A [`TransactionDescriptor`] is the value handed to the wallet for signing
//! and broadcast. Inputs are [`InputValue`]s, so every input carries its
//! on-chain type suffix by construction and keeps the order it was given in.
//!
//! [`ProgramCall`] covers the functions the marketplace program exposes and
//! produces correctly typed input lists for each of them.

use async_trait::async_trait;
use lodive_core::{InputValue, Network, WalletIdentity};
use lodive_crypto::{BitHasher, IdentityHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DEFAULT_FEE, DEFAULT_PROGRAM_ID};
use crate::error::{ClientError, ClientResult};

/// Largest commission a venue may charge, in percent
pub const MAX_COMMISSION: u8 = 100;

/// Errors reported by a wallet adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("User rejected the request")]
    Rejected,

    #[error("Insufficient balance for fee")]
    InsufficientFee,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("{0}")]
    Other(String),
}

/// Signing and broadcast, implemented by the wallet integration
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Ask the wallet to sign and broadcast; resolves to the transaction id
    async fn request_transaction(
        &self,
        descriptor: &TransactionDescriptor,
    ) -> Result<String, WalletError>;

    /// Current status string of a previously submitted transaction
    async fn transaction_status(&self, transaction_id: &str) -> Result<String, WalletError>;
}

/// A fully specified program call awaiting signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDescriptor {
    pub caller: WalletIdentity,
    pub network: Network,
    pub program_id: String,
    pub function: String,
    pub inputs: Vec<InputValue>,
    /// Fee in microcredits
    pub fee: u64,
    pub fee_private: bool,
}

impl TransactionDescriptor {
    /// Inputs as the typed literal strings submitted on chain
    pub fn input_strings(&self) -> Vec<String> {
        self.inputs.iter().map(ToString::to_string).collect()
    }

    /// Request body in the shape wallet adapters accept
    pub fn to_wallet_request(&self) -> WalletRequest {
        WalletRequest {
            address: self.caller.to_string(),
            chain_id: self.network.chain_id().to_string(),
            transitions: vec![Transition {
                program: self.program_id.clone(),
                function_name: self.function.clone(),
                inputs: self.input_strings(),
            }],
            fee: self.fee,
            fee_private: self.fee_private,
        }
    }
}

/// Wallet adapter transaction request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRequest {
    pub address: String,
    pub chain_id: String,
    pub transitions: Vec<Transition>,
    pub fee: u64,
    pub fee_private: bool,
}

/// One program function invocation within a [`WalletRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub program: String,
    pub function_name: String,
    pub inputs: Vec<String>,
}

/// Builder for [`TransactionDescriptor`]
///
/// # Example
///
/// ```
/// use lodive_client::TransactionBuilder;
/// use lodive_core::{InputValue, Network, WalletIdentity};
///
/// let tx = TransactionBuilder::new(WalletIdentity::new("aleo1caller"), Network::TestnetBeta, "lodive_v0_1_0.aleo")
///     .function("start_event")
///     .input(InputValue::field("7").unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(tx.input_strings(), vec!["7field"]);
/// assert_eq!(tx.fee, 42_150);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    caller: WalletIdentity,
    network: Network,
    program_id: String,
    function: Option<String>,
    inputs: Vec<InputValue>,
    fee: u64,
    fee_private: bool,
}

impl TransactionBuilder {
    pub fn new(caller: WalletIdentity, network: Network, program_id: impl Into<String>) -> Self {
        Self {
            caller,
            network,
            program_id: program_id.into(),
            function: None,
            inputs: Vec::new(),
            fee: DEFAULT_FEE,
            fee_private: false,
        }
    }

    /// Builder against the default deployment on the test network
    pub fn for_caller(caller: WalletIdentity) -> Self {
        Self::new(caller, Network::TestnetBeta, DEFAULT_PROGRAM_ID)
    }

    pub fn function(mut self, name: impl Into<String>) -> Self {
        self.function = Some(name.into());
        self
    }

    /// Append one input
    pub fn input(mut self, value: impl Into<InputValue>) -> Self {
        self.inputs.push(value.into());
        self
    }

    /// Append inputs in order
    pub fn inputs(mut self, values: impl IntoIterator<Item = InputValue>) -> Self {
        self.inputs.extend(values);
        self
    }

    pub fn fee(mut self, microcredits: u64) -> Self {
        self.fee = microcredits;
        self
    }

    pub fn fee_private(mut self, private: bool) -> Self {
        self.fee_private = private;
        self
    }

    /// Set function and inputs from a program call
    pub fn call(self, call: &ProgramCall) -> Self {
        self.function(call.function_name()).inputs(call.inputs())
    }

    pub fn build(self) -> ClientResult<TransactionDescriptor> {
        let function = self
            .function
            .filter(|f| !f.trim().is_empty())
            .ok_or(ClientError::MissingFunction)?;

        Ok(TransactionDescriptor {
            caller: self.caller,
            network: self.network,
            program_id: self.program_id,
            function,
            inputs: self.inputs,
            fee: self.fee,
            fee_private: self.fee_private,
        })
    }
}

/// Build a descriptor in one call
pub fn build_transaction(
    caller: WalletIdentity,
    network: Network,
    program_id: &str,
    function: &str,
    inputs: Vec<InputValue>,
    fee: u64,
    fee_private: bool,
) -> ClientResult<TransactionDescriptor> {
    TransactionBuilder::new(caller, network, program_id)
        .function(function)
        .inputs(inputs)
        .fee(fee)
        .fee_private(fee_private)
        .build()
}

/// Lifecycle transition of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventToggle {
    #[default]
    Start,
    End,
}

impl EventToggle {
    /// The other transition
    pub fn toggled(self) -> Self {
        match self {
            EventToggle::Start => EventToggle::End,
            EventToggle::End => EventToggle::Start,
        }
    }

    pub fn function_name(self) -> &'static str {
        match self {
            EventToggle::Start => "start_event",
            EventToggle::End => "end_event",
        }
    }

    /// The program call applying this transition to an event
    pub fn for_event(self, event_id: InputValue) -> ClientResult<ProgramCall> {
        match self {
            EventToggle::Start => ProgramCall::start_event(event_id),
            EventToggle::End => ProgramCall::end_event(event_id),
        }
    }
}

/// Functions of the marketplace program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramCall {
    RegisterEvent {
        event_id: InputValue,
        ticket_supply: u32,
        ticket_price: u64,
        venue_id: InputValue,
        owner_hash: IdentityHash,
    },
    RegisterVenue {
        venue_id: InputValue,
        commission: u8,
    },
    StartEvent {
        event_id: InputValue,
    },
    EndEvent {
        event_id: InputValue,
    },
}

fn require_field(value: InputValue, name: &str) -> ClientResult<InputValue> {
    match value {
        InputValue::Field(_) => Ok(value),
        other => Err(ClientError::InvalidInput(format!(
            "{} must be a field, got {}",
            name, other
        ))),
    }
}

impl ProgramCall {
    pub fn register_event(
        event_id: InputValue,
        ticket_supply: u32,
        ticket_price: u64,
        venue_id: InputValue,
        owner_hash: IdentityHash,
    ) -> ClientResult<Self> {
        Ok(ProgramCall::RegisterEvent {
            event_id: require_field(event_id, "event_id")?,
            ticket_supply,
            ticket_price,
            venue_id: require_field(venue_id, "venue_id")?,
            owner_hash,
        })
    }

    /// Register an event by name
    ///
    /// Event and venue names are hashed with the character encoding, the
    /// owner with the address encoding.
    pub fn register_event_named(
        hasher: &dyn BitHasher,
        event_name: &str,
        ticket_supply: u32,
        ticket_price: u64,
        venue_name: &str,
        owner: &WalletIdentity,
    ) -> ClientResult<Self> {
        Self::register_event(
            hasher.hash_name(event_name)?.to_input(),
            ticket_supply,
            ticket_price,
            hasher.hash_name(venue_name)?.to_input(),
            hasher.hash_address(owner)?,
        )
    }

    pub fn register_venue(venue_id: InputValue, commission: u8) -> ClientResult<Self> {
        if commission > MAX_COMMISSION {
            return Err(ClientError::InvalidCommission(commission));
        }
        Ok(ProgramCall::RegisterVenue {
            venue_id: require_field(venue_id, "venue_id")?,
            commission,
        })
    }

    /// Register a venue by name
    pub fn register_venue_named(
        hasher: &dyn BitHasher,
        venue_name: &str,
        commission: u8,
    ) -> ClientResult<Self> {
        Self::register_venue(hasher.hash_name(venue_name)?.to_input(), commission)
    }

    pub fn start_event(event_id: InputValue) -> ClientResult<Self> {
        Ok(ProgramCall::StartEvent {
            event_id: require_field(event_id, "event_id")?,
        })
    }

    pub fn end_event(event_id: InputValue) -> ClientResult<Self> {
        Ok(ProgramCall::EndEvent {
            event_id: require_field(event_id, "event_id")?,
        })
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            ProgramCall::RegisterEvent { .. } => "register_event",
            ProgramCall::RegisterVenue { .. } => "register_venue",
            ProgramCall::StartEvent { .. } => EventToggle::Start.function_name(),
            ProgramCall::EndEvent { .. } => EventToggle::End.function_name(),
        }
    }

    /// Inputs in the order the program function declares them
    pub fn inputs(&self) -> Vec<InputValue> {
        match self {
            ProgramCall::RegisterEvent {
                event_id,
                ticket_supply,
                ticket_price,
                venue_id,
                owner_hash,
            } => vec![
                event_id.clone(),
                InputValue::U32(*ticket_supply),
                InputValue::U64(*ticket_price),
                venue_id.clone(),
                owner_hash.to_input(),
            ],
            ProgramCall::RegisterVenue {
                venue_id,
                commission,
            } => vec![venue_id.clone(), InputValue::U8(*commission)],
            ProgramCall::StartEvent { event_id } | ProgramCall::EndEvent { event_id } => {
                vec![event_id.clone()]
            }
        }
    }
}

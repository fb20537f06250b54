//! Rule violations reported by the validators.

use crate::money::{Currency, Money, MoneyError};
use crate::types::{ContractKind, PartyRef};
use std::collections::BTreeSet;
use thiserror::Error;

/// The first rule a candidate transaction violated
///
/// Every variant is terminal: the transaction is rejected outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Required {contract} command not found.")]
    MissingCommand { contract: ContractKind },
    #[error("Exactly one {contract} command is allowed, found {found}.")]
    MultipleCommands { contract: ContractKind, found: usize },
    #[error("No inputs should be consumed when issuing a {record}.")]
    UnexpectedInputs { record: &'static str },
    #[error("Only one output state should be created when issuing a {record}.")]
    WrongOutputCount { record: &'static str, found: usize },
    #[error("A {record} transition should consume one input and create one output (found {inputs} and {outputs}).")]
    WrongInputOutputCount {
        record: &'static str,
        inputs: usize,
        outputs: usize,
    },
    #[error("A newly issued {record} must have a positive amount.")]
    NonPositiveAmount { record: &'static str },
    #[error("The {first} and {second} cannot have the same identity.")]
    IdenticalParties {
        first: &'static str,
        second: &'static str,
    },
    #[error("The signers must be exactly the required participants.")]
    MissingOrExtraSigners {
        required: BTreeSet<PartyRef>,
        signed: BTreeSet<PartyRef>,
    },
    #[error("Only the {field} property may change.")]
    IllegalFieldChange { field: &'static str },
    #[error("The {field} property must change in a transfer.")]
    NoOpTransfer { field: &'static str },
    #[error("Onboarding may only append one operator and book one more slot.")]
    IllegalOnboarding,
    #[error("There must be exactly one group of {record} records (found {found}).")]
    MultipleOrZeroGroups { record: &'static str, found: usize },
    #[error("There must be one input {record}.")]
    MissingInputRecord { record: &'static str, found: usize },
    #[error("There must be output cash.")]
    NoCashOutputs,
    #[error("Output cash must be paid to the {payee}.")]
    CashNotPaidToCounterparty { payee: &'static str },
    #[error("Token mismatch: {expected} vs {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },
    #[error("Amount arithmetic left the representable range.")]
    AmountOverflow,
    #[error("The amount settled cannot be more than the amount outstanding (settled {settled}, outstanding {outstanding}).")]
    SettlementExceedsOutstanding { settled: Money, outstanding: Money },
    #[error("There must be no output {record} as it has been fully settled.")]
    UnexpectedOutputOnFullSettlement { record: &'static str },
    #[error("There must be one output {record} (found {found}).")]
    WrongOutputCountOnPartialSettlement { record: &'static str, found: usize },
    #[error("Only the paid amount can change.")]
    IllegalFieldChangeOnSettlement,
}

impl VerificationError {
    /// Stable, machine-readable identifier for the violated rule
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCommand { .. } => "MISSING_COMMAND",
            Self::MultipleCommands { .. } => "MULTIPLE_COMMANDS",
            Self::UnexpectedInputs { .. } => "UNEXPECTED_INPUTS",
            Self::WrongOutputCount { .. } => "WRONG_OUTPUT_COUNT",
            Self::WrongInputOutputCount { .. } => "WRONG_INPUT_OUTPUT_COUNT",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::IdenticalParties { .. } => "IDENTICAL_PARTIES",
            Self::MissingOrExtraSigners { .. } => "MISSING_OR_EXTRA_SIGNERS",
            Self::IllegalFieldChange { .. } => "ILLEGAL_FIELD_CHANGE",
            Self::NoOpTransfer { .. } => "NO_OP_TRANSFER",
            Self::IllegalOnboarding => "ILLEGAL_ONBOARDING",
            Self::MultipleOrZeroGroups { .. } => "MULTIPLE_OR_ZERO_GROUPS",
            Self::MissingInputRecord { .. } => "MISSING_INPUT_RECORD",
            Self::NoCashOutputs => "NO_CASH_OUTPUTS",
            Self::CashNotPaidToCounterparty { .. } => "CASH_NOT_PAID_TO_COUNTERPARTY",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::SettlementExceedsOutstanding { .. } => "SETTLEMENT_EXCEEDS_OUTSTANDING",
            Self::UnexpectedOutputOnFullSettlement { .. } => "UNEXPECTED_OUTPUT_ON_FULL_SETTLEMENT",
            Self::WrongOutputCountOnPartialSettlement { .. } => {
                "WRONG_OUTPUT_COUNT_ON_PARTIAL_SETTLEMENT"
            }
            Self::IllegalFieldChangeOnSettlement => "ILLEGAL_FIELD_CHANGE_ON_SETTLEMENT",
        }
    }
}

impl From<MoneyError> for VerificationError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::CurrencyMismatch { left, right } => VerificationError::CurrencyMismatch {
                expected: left,
                found: right,
            },
            MoneyError::Overflow | MoneyError::Underflow => VerificationError::AmountOverflow,
        }
    }
}

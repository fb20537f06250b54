use crate::money::{Money, MoneyError};
use crate::types::{PartyRef, UniqueIdentifier};
use crate::validation::VerificationError;
use thiserror::Error;

/// Reasons a workflow refuses to assemble a transaction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Record {0} not found in the vault")]
    RecordNotFound(UniqueIdentifier),
    #[error("Only the tower provider can onboard operators")]
    NotProvider,
    #[error("Only the current proposer can transfer or settle a rental proposal")]
    NotProposer,
    #[error("{party} has only {balance} but needs {needed} to settle")]
    InsufficientBalance {
        party: PartyRef,
        balance: Money,
        needed: Money,
    },
    #[error("Tried to settle with {amount} but only {outstanding} is outstanding")]
    SettlementTooLarge { amount: Money, outstanding: Money },
    #[error(transparent)]
    Money(#[from] MoneyError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

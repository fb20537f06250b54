//! Rule shapes shared by the tower and rental-proposal validators.

use super::error::VerificationError;
use crate::types::{
    PartyRef, RecordKind, RentalProposalRecord, TowerRecord, Transaction, UniqueIdentifier,
};
use std::collections::BTreeSet;

/// A record type governed by one of the validators
pub trait ContractRecord: RecordKind + Clone + PartialEq {
    /// Human-readable name used in rule messages
    const RECORD: &'static str;

    fn id(&self) -> &UniqueIdentifier;

    fn participants(&self) -> Vec<PartyRef>;
}

/// A record whose owner role can be handed to another party
pub trait Transferable: ContractRecord {
    const OWNER_FIELD: &'static str;

    fn owner(&self) -> &PartyRef;

    fn with_owner(&self, owner: PartyRef) -> Self;
}

impl ContractRecord for TowerRecord {
    const RECORD: &'static str = "tower";

    fn id(&self) -> &UniqueIdentifier {
        &self.id
    }

    fn participants(&self) -> Vec<PartyRef> {
        TowerRecord::participants(self)
    }
}

impl Transferable for TowerRecord {
    const OWNER_FIELD: &'static str = "provider";

    fn owner(&self) -> &PartyRef {
        &self.provider
    }

    fn with_owner(&self, owner: PartyRef) -> Self {
        self.with_provider(owner)
    }
}

impl ContractRecord for RentalProposalRecord {
    const RECORD: &'static str = "tower rental proposal";

    fn id(&self) -> &UniqueIdentifier {
        &self.id
    }

    fn participants(&self) -> Vec<PartyRef> {
        RentalProposalRecord::participants(self)
    }
}

impl Transferable for RentalProposalRecord {
    const OWNER_FIELD: &'static str = "proposer";

    fn owner(&self) -> &PartyRef {
        &self.proposer
    }

    fn with_owner(&self, owner: PartyRef) -> Self {
        self.with_new_proposer(owner)
    }
}

pub(crate) fn ensure<F>(condition: bool, error: F) -> Result<(), VerificationError>
where
    F: FnOnce() -> VerificationError,
{
    if condition { Ok(()) } else { Err(error()) }
}

/// Signers must equal `required` as a set: no one missing, no one extra.
pub(crate) fn require_signers<I>(
    signers: &BTreeSet<PartyRef>,
    required: I,
) -> Result<(), VerificationError>
where
    I: IntoIterator<Item = PartyRef>,
{
    let required: BTreeSet<PartyRef> = required.into_iter().collect();
    ensure(*signers == required, || VerificationError::MissingOrExtraSigners {
        required,
        signed: signers.clone(),
    })
}

/// The single newly issued record of an issue transition
pub(crate) fn issued_output<T: ContractRecord>(tx: &Transaction) -> Result<&T, VerificationError> {
    let inputs = tx.inputs_of_type::<T>();
    ensure(inputs.is_empty(), || VerificationError::UnexpectedInputs {
        record: T::RECORD,
    })?;
    let outputs = tx.outputs_of_type::<T>();
    match outputs.as_slice() {
        [output] => Ok(*output),
        _ => Err(VerificationError::WrongOutputCount {
            record: T::RECORD,
            found: outputs.len(),
        }),
    }
}

/// The input and output versions of a one-to-one transition
pub(crate) fn single_transition<T: ContractRecord>(
    tx: &Transaction,
) -> Result<(&T, &T), VerificationError> {
    let inputs = tx.inputs_of_type::<T>();
    let outputs = tx.outputs_of_type::<T>();
    match (inputs.as_slice(), outputs.as_slice()) {
        ([input], [output]) => Ok((*input, *output)),
        _ => Err(VerificationError::WrongInputOutputCount {
            record: T::RECORD,
            inputs: inputs.len(),
            outputs: outputs.len(),
        }),
    }
}

/// Owner hand-over: only the owner field changes, it must actually change,
/// and the old owner, the new owner and every other participant sign.
pub(crate) fn verify_transfer<T: Transferable>(
    tx: &Transaction,
    signers: &BTreeSet<PartyRef>,
) -> Result<(), VerificationError> {
    let (input, output) = single_transition::<T>(tx)?;
    ensure(*input == output.with_owner(input.owner().clone()), || {
        VerificationError::IllegalFieldChange {
            field: T::OWNER_FIELD,
        }
    })?;
    ensure(input.owner() != output.owner(), || VerificationError::NoOpTransfer {
        field: T::OWNER_FIELD,
    })?;
    require_signers(
        signers,
        input.participants().into_iter().chain(output.participants()),
    )
}

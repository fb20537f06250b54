//! Rental Proposal Validator
//!
//! Rules for the life-cycle of a [`RentalProposalRecord`]:
//! - **Propose**: an operator proposes to rent from the agreement party
//! - **Agree**: the proposal is handed to a new proposer
//! - **Reject**: the proposal is settled in cash, partially or in full

use super::error::VerificationError;
use super::rules::{ensure, issued_output, require_signers, verify_transfer};
use super::settlement::{SettlementOutcome, SettlementRule};
use crate::types::{PartyRef, ProposalAction, RentalProposalRecord, Transaction};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Default)]
pub struct RentalProposalValidator {
    settlement: SettlementRule<RentalProposalRecord>,
}

impl RentalProposalValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a rental-proposal transition
    /// Returns the first violated rule, checked in a fixed order per action
    pub fn validate(
        &self,
        action: ProposalAction,
        tx: &Transaction,
        signers: &BTreeSet<PartyRef>,
    ) -> Result<(), VerificationError> {
        debug!(?action, tx = %tx.id, "Validating rental proposal transition");
        match action {
            ProposalAction::Propose => self.verify_propose(tx, signers),
            ProposalAction::Agree => verify_transfer::<RentalProposalRecord>(tx, signers),
            ProposalAction::Reject => self.verify_settlement(tx, signers).map(|_| ()),
        }
    }

    /// Settlement check that also reports whether the proposal was retired
    pub fn verify_settlement(
        &self,
        tx: &Transaction,
        signers: &BTreeSet<PartyRef>,
    ) -> Result<SettlementOutcome, VerificationError> {
        self.settlement.verify(tx, signers)
    }

    fn verify_propose(
        &self,
        tx: &Transaction,
        signers: &BTreeSet<PartyRef>,
    ) -> Result<(), VerificationError> {
        let proposal = issued_output::<RentalProposalRecord>(tx)?;
        ensure(proposal.rental_amount.is_positive(), || {
            VerificationError::NonPositiveAmount {
                record: "tower rental proposal",
            }
        })?;
        ensure(proposal.proposer != proposal.counterparty, || {
            VerificationError::IdenticalParties {
                first: "proposer",
                second: "agreement party",
            }
        })?;
        require_signers(signers, proposal.participants())
    }
}

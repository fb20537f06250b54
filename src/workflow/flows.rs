//! Workflow assembly
//!
//! Builds the candidate transactions for each step of a tower rental:
//! 1. A provider installs a tower
//! 2. The provider onboards operators onto it
//! 3. An operator proposes a rental to the provider
//! 4. The proposer hands the proposal to another operator
//! 5. The proposer settles the rent in cash, in one or several payments
//!
//! Every transaction is verified before it is returned. Signing, notarisation
//! and distribution to the counterparties are left to the ledger runtime.

use super::builder::TransactionBuilder;
use super::cash::generate_spend;
use super::error::WorkflowError;
use crate::money::Money;
use crate::state::Vault;
use crate::types::{
    Command, CommandData, PartyRef, ProposalAction, RentalProposalRecord, TowerAction,
    TowerRecord, Transaction, UniqueIdentifier,
};
use crate::validation::Verifier;
use std::cmp::Ordering;
use tracing::info;

#[derive(Default)]
pub struct RentalWorkflows {
    verifier: Verifier,
}

impl RentalWorkflows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install_tower(&self, tower: TowerRecord) -> Result<Transaction, WorkflowError> {
        let mut builder = TransactionBuilder::new();
        builder.add_command(Command::new(
            CommandData::Tower(TowerAction::Install),
            tower.participants(),
        ));
        builder.add_output(tower);
        Ok(builder.build_verified(&self.verifier)?)
    }

    pub fn onboard_operator(
        &self,
        vault: &Vault,
        tower_id: &UniqueIdentifier,
        initiator: &PartyRef,
        operator: PartyRef,
    ) -> Result<Transaction, WorkflowError> {
        let tower = vault
            .tower(tower_id)
            .ok_or_else(|| WorkflowError::RecordNotFound(tower_id.clone()))?;
        if *initiator != tower.provider {
            return Err(WorkflowError::NotProvider);
        }

        let mut builder = TransactionBuilder::new();
        builder.add_command(Command::new(
            CommandData::Tower(TowerAction::ProposeAgreement),
            tower.participants(),
        ));
        builder.add_input(tower.clone());
        builder.add_output(tower.with_new_operator(operator));
        Ok(builder.build_verified(&self.verifier)?)
    }

    /// Proposes to rent the tower from its provider
    pub fn propose_rental(
        &self,
        vault: &Vault,
        tower_id: &UniqueIdentifier,
        proposer: PartyRef,
        rental_amount: Money,
    ) -> Result<Transaction, WorkflowError> {
        let tower = vault
            .tower(tower_id)
            .ok_or_else(|| WorkflowError::RecordNotFound(tower_id.clone()))?;
        let proposal =
            RentalProposalRecord::new(rental_amount, proposer, tower.provider.clone(), tower.clone());

        let mut builder = TransactionBuilder::new();
        builder.add_command(Command::new(
            CommandData::Rental(ProposalAction::Propose),
            proposal.participants(),
        ));
        builder.add_output(proposal);
        Ok(builder.build_verified(&self.verifier)?)
    }

    pub fn transfer_proposal(
        &self,
        vault: &Vault,
        proposal_id: &UniqueIdentifier,
        initiator: &PartyRef,
        new_proposer: PartyRef,
    ) -> Result<Transaction, WorkflowError> {
        let proposal = vault
            .proposal(proposal_id)
            .ok_or_else(|| WorkflowError::RecordNotFound(proposal_id.clone()))?;
        if *initiator != proposal.proposer {
            return Err(WorkflowError::NotProposer);
        }

        let signers = proposal
            .participants()
            .into_iter()
            .chain(std::iter::once(new_proposer.clone()));
        let mut builder = TransactionBuilder::new();
        builder.add_command(Command::new(
            CommandData::Rental(ProposalAction::Agree),
            signers,
        ));
        builder.add_input(proposal.clone());
        builder.add_output(proposal.with_new_proposer(new_proposer));
        Ok(builder.build_verified(&self.verifier)?)
    }

    /// Pays `amount` of the outstanding rent to the agreement party
    ///
    /// The proposal is re-issued with the new running total unless the
    /// payment clears it.
    pub fn settle_proposal(
        &self,
        vault: &Vault,
        proposal_id: &UniqueIdentifier,
        initiator: &PartyRef,
        amount: Money,
    ) -> Result<Transaction, WorkflowError> {
        let proposal = vault
            .proposal(proposal_id)
            .ok_or_else(|| WorkflowError::RecordNotFound(proposal_id.clone()))?;
        if *initiator != proposal.proposer {
            return Err(WorkflowError::NotProposer);
        }

        let outstanding = proposal.outstanding()?;
        if amount.checked_cmp(&outstanding)? == Ordering::Greater {
            return Err(WorkflowError::SettlementTooLarge {
                amount,
                outstanding,
            });
        }

        let mut builder = TransactionBuilder::new();
        generate_spend(
            vault,
            &mut builder,
            &amount,
            &proposal.proposer,
            &proposal.counterparty,
        )?;
        builder.add_command(Command::new(
            CommandData::Rental(ProposalAction::Reject),
            proposal.participants(),
        ));
        builder.add_input(proposal.clone());

        let remaining = outstanding.checked_sub(&amount)?;
        if !remaining.is_zero() {
            builder.add_output(proposal.pay(&amount)?);
        }

        let tx = builder.build_verified(&self.verifier)?;
        info!(proposal = %proposal_id, %amount, %remaining, "Settlement assembled");
        Ok(tx)
    }
}

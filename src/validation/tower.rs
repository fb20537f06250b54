//! Tower Agreement Validator
//!
//! Rules for the life-cycle of a [`TowerRecord`]:
//! - **Install**: a provider issues a new tower
//! - **ProposeAgreement**: one more operator is onboarded onto the tower
//! - **Agree**: the tower is handed to a new provider
//! - **Reject**: rent owed on the tower is settled in cash

use super::error::VerificationError;
use super::rules::{ensure, issued_output, require_signers, single_transition, verify_transfer};
use super::settlement::SettlementRule;
use crate::types::{PartyRef, TowerAction, TowerRecord, Transaction};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Default)]
pub struct TowerAgreementValidator {
    settlement: SettlementRule<TowerRecord>,
}

impl TowerAgreementValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a tower transition
    /// Returns the first violated rule, checked in a fixed order per action
    pub fn validate(
        &self,
        action: TowerAction,
        tx: &Transaction,
        signers: &BTreeSet<PartyRef>,
    ) -> Result<(), VerificationError> {
        debug!(?action, tx = %tx.id, "Validating tower transition");
        match action {
            TowerAction::Install => self.verify_install(tx, signers),
            TowerAction::ProposeAgreement => self.verify_onboarding(tx, signers),
            TowerAction::Agree => verify_transfer::<TowerRecord>(tx, signers),
            TowerAction::Reject => self.settlement.verify(tx, signers).map(|_| ()),
        }
    }

    fn verify_install(
        &self,
        tx: &Transaction,
        signers: &BTreeSet<PartyRef>,
    ) -> Result<(), VerificationError> {
        let tower = issued_output::<TowerRecord>(tx)?;
        ensure(tower.rental_rate.is_positive(), || {
            VerificationError::NonPositiveAmount { record: "tower" }
        })?;
        ensure(!tower.operators.contains(&tower.provider), || {
            VerificationError::IdenticalParties {
                first: "provider",
                second: "operator",
            }
        })?;
        require_signers(signers, tower.participants())
    }

    /// Onboarding appends exactly one operator and books exactly one slot.
    fn verify_onboarding(
        &self,
        tx: &Transaction,
        signers: &BTreeSet<PartyRef>,
    ) -> Result<(), VerificationError> {
        let (input, output) = single_transition::<TowerRecord>(tx)?;
        let onboarded = output
            .operators
            .last()
            .ok_or(VerificationError::IllegalOnboarding)?;
        ensure(*output == input.with_new_operator(onboarded.clone()), || {
            VerificationError::IllegalOnboarding
        })?;
        require_signers(
            signers,
            input.participants().into_iter().chain(output.participants()),
        )
    }
}

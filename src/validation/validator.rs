use super::error::VerificationError;
use super::proposal::RentalProposalValidator;
use super::tower::TowerAgreementValidator;
use crate::types::{Command, CommandData, ContractKind, Transaction};
use tracing::{debug, info, warn};

/// Transaction-level verifier
///
/// Runs every contract the transaction touches. Cash records and commands
/// belong to the external asset subsystem and are not checked here.
#[derive(Default)]
pub struct Verifier {
    tower: TowerAgreementValidator,
    rental: RentalProposalValidator,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify a candidate transaction
    /// Returns Ok(()) if every contract accepts it, Err(VerificationError) with the first violated rule otherwise
    pub fn verify(&self, tx: &Transaction) -> Result<(), VerificationError> {
        debug!("Verifying transaction {}", tx.id);

        let result = self.verify_contracts(tx);
        match &result {
            Ok(()) => info!("Transaction {} verified", tx.id),
            Err(err) => warn!(code = err.code(), "Transaction {} rejected: {}", tx.id, err),
        }
        result
    }

    fn verify_contracts(&self, tx: &Transaction) -> Result<(), VerificationError> {
        // 1. Tower contract
        if let Some(command) = Self::contract_command(tx, ContractKind::Tower)? {
            if let CommandData::Tower(action) = command.value {
                self.tower.validate(action, tx, &command.signers)?;
            }
        }

        // 2. Rental contract
        if let Some(command) = Self::contract_command(tx, ContractKind::Rental)? {
            if let CommandData::Rental(action) = command.value {
                self.rental.validate(action, tx, &command.signers)?;
            }
        }

        Ok(())
    }

    /// The single command addressed to `contract`, if the contract is involved at all
    fn contract_command(
        tx: &Transaction,
        contract: ContractKind,
    ) -> Result<Option<&Command>, VerificationError> {
        let commands = tx.commands_for(contract);
        match commands.as_slice() {
            [] if !tx.references(contract) => Ok(None),
            [] => Err(VerificationError::MissingCommand { contract }),
            [command] => Ok(Some(*command)),
            _ => Err(VerificationError::MultipleCommands {
                contract,
                found: commands.len(),
            }),
        }
    }
}

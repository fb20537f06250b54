//! Transaction Builder
//!
//! Collects the inputs, outputs and commands of a candidate transaction and
//! seals it under a fresh identifier once the contracts accept it.

use crate::types::{Command, LedgerRecord, Transaction};
use crate::validation::{VerificationError, Verifier};
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct TransactionBuilder {
    inputs: Vec<LedgerRecord>,
    outputs: Vec<LedgerRecord>,
    commands: Vec<Command>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, record: impl Into<LedgerRecord>) -> &mut Self {
        self.inputs.push(record.into());
        self
    }

    pub fn add_output(&mut self, record: impl Into<LedgerRecord>) -> &mut Self {
        self.outputs.push(record.into());
        self
    }

    pub fn add_command(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    /// Seal the collected items into a transaction without checking it
    pub fn build(self) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            inputs: self.inputs,
            outputs: self.outputs,
            commands: self.commands,
        }
    }

    /// Seal the collected items and run every contract over the result
    pub fn build_verified(self, verifier: &Verifier) -> Result<Transaction, VerificationError> {
        let tx = self.build();
        verifier.verify(&tx)?;
        Ok(tx)
    }
}

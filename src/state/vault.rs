use crate::money::{Currency, Money, MoneyError};
use crate::types::{
    CashRecord, LedgerRecord, PartyRef, RecordKind, RentalProposalRecord, TowerRecord,
    Transaction, UniqueIdentifier,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("Input {index} of transaction {tx_id} is not an unconsumed record")]
    UnknownInput { tx_id: Uuid, index: usize },
}

/// Position of a record: the transaction that created it and its output index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateRef {
    pub tx_id: Uuid,
    pub index: usize,
}

/// In-memory set of unconsumed records
#[derive(Debug, Default, Clone)]
pub struct Vault {
    unconsumed: BTreeMap<StateRef, LedgerRecord>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a committed transaction: its inputs are consumed, its outputs become unconsumed
    ///
    /// Every input must be unconsumed in this vault. Otherwise the transaction
    /// conflicts with one already recorded and the vault is left untouched.
    /// Returns how many inputs were consumed.
    pub fn record(&mut self, tx: &Transaction) -> Result<usize, VaultError> {
        let mut spent: Vec<StateRef> = Vec::with_capacity(tx.inputs.len());
        for (index, input) in tx.inputs.iter().enumerate() {
            let position = self
                .unconsumed
                .iter()
                .find(|(position, record)| *record == input && !spent.contains(*position))
                .map(|(position, _)| *position);
            match position {
                Some(position) => spent.push(position),
                None => {
                    warn!("Transaction {} spends input {} that is not unconsumed", tx.id, index);
                    return Err(VaultError::UnknownInput { tx_id: tx.id, index });
                }
            }
        }

        for position in &spent {
            self.unconsumed.remove(position);
        }
        for (index, output) in tx.outputs.iter().enumerate() {
            let position = StateRef { tx_id: tx.id, index };
            self.unconsumed.insert(position, output.clone());
        }

        info!(
            "Recorded transaction {}: {} consumed, {} produced",
            tx.id,
            spent.len(),
            tx.outputs.len()
        );
        Ok(spent.len())
    }

    pub fn len(&self) -> usize {
        self.unconsumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unconsumed.is_empty()
    }

    pub fn get(&self, position: &StateRef) -> Option<&LedgerRecord> {
        self.unconsumed.get(position)
    }

    fn records_of<'a, T: RecordKind + 'a>(
        &'a self,
    ) -> impl Iterator<Item = (&'a StateRef, &'a T)> {
        self.unconsumed
            .iter()
            .filter_map(|(position, record)| T::from_record(record).map(|typed| (position, typed)))
    }

    /// Latest unconsumed version of the tower with the given identifier
    pub fn tower(&self, id: &UniqueIdentifier) -> Option<&TowerRecord> {
        self.records_of::<TowerRecord>()
            .map(|(_, tower)| tower)
            .find(|tower| tower.id == *id)
    }

    /// Latest unconsumed version of the proposal with the given identifier
    pub fn proposal(&self, id: &UniqueIdentifier) -> Option<&RentalProposalRecord> {
        self.records_of::<RentalProposalRecord>()
            .map(|(_, proposal)| proposal)
            .find(|proposal| proposal.id == *id)
    }

    /// Cash owned by `owner` in `currency`, in vault order
    pub fn unconsumed_cash(
        &self,
        owner: &PartyRef,
        currency: &Currency,
    ) -> Vec<(StateRef, &CashRecord)> {
        self.records_of::<CashRecord>()
            .filter(|(_, cash)| cash.owner == *owner && cash.amount.product.currency() == currency)
            .map(|(position, cash)| (*position, cash))
            .collect()
    }

    pub fn cash_balance(&self, owner: &PartyRef, currency: &Currency) -> Result<Money, MoneyError> {
        let amounts: Vec<Money> = self
            .unconsumed_cash(owner, currency)
            .into_iter()
            .map(|(_, cash)| cash.amount.without_issuer())
            .collect();
        Ok(Money::try_sum(&amounts)?.unwrap_or_else(|| Money::zero(currency.clone())))
    }
}

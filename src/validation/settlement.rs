//! Settlement accounting shared by every record that can be paid off in cash.
//!
//! A settlement consumes exactly one version of a record and pays cash to the
//! record's payee. Cash paid to anyone else is change and is ignored. When the
//! cash covers the whole outstanding amount the record is retired; otherwise
//! it is re-issued with only `paid` increased.

use super::error::VerificationError;
use super::grouping::single_group;
use super::rules::{ContractRecord, ensure, require_signers};
use crate::money::Money;
use crate::types::{CashRecord, PartyRef, RentalProposalRecord, TowerRecord, Transaction};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::marker::PhantomData;
use tracing::debug;

/// Field accessors the settlement rule needs from a record
pub trait Settleable: ContractRecord {
    /// Role name of the payee, used in rule messages
    const PAYEE_ROLE: &'static str;

    /// Total amount owed over the record's life
    fn amount(&self) -> &Money;

    fn paid(&self) -> &Money;

    /// Party that must receive the settling cash
    fn payee(&self) -> &PartyRef;

    fn with_paid(&self, paid: Money) -> Self;
}

impl Settleable for RentalProposalRecord {
    const PAYEE_ROLE: &'static str = "agreement party";

    fn amount(&self) -> &Money {
        &self.rental_amount
    }

    fn paid(&self) -> &Money {
        &self.paid
    }

    fn payee(&self) -> &PartyRef {
        &self.counterparty
    }

    fn with_paid(&self, paid: Money) -> Self {
        RentalProposalRecord::with_paid(self, paid)
    }
}

impl Settleable for TowerRecord {
    const PAYEE_ROLE: &'static str = "provider";

    fn amount(&self) -> &Money {
        &self.rental_rate
    }

    fn paid(&self) -> &Money {
        &self.paid
    }

    fn payee(&self) -> &PartyRef {
        &self.provider
    }

    fn with_paid(&self, paid: Money) -> Self {
        TowerRecord::with_paid(self, paid)
    }
}

/// What a valid settlement did to the record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Outstanding amount fully paid; the record is retired
    Full { settled: Money },
    /// Record re-issued with the new running total
    Partial { settled: Money, paid: Money },
}

/// Settlement rule for record type `T`
pub struct SettlementRule<T> {
    _record: PhantomData<T>,
}

impl<T> Default for SettlementRule<T> {
    fn default() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T: Settleable> SettlementRule<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a settlement transaction, failing on the first violated rule
    pub fn verify(
        &self,
        tx: &Transaction,
        signers: &BTreeSet<PartyRef>,
    ) -> Result<SettlementOutcome, VerificationError> {
        let group = single_group::<T, _, _>(tx, T::RECORD, |record| record.id().clone())?;
        let input = match group.inputs.as_slice() {
            [input] => *input,
            inputs => {
                return Err(VerificationError::MissingInputRecord {
                    record: T::RECORD,
                    found: inputs.len(),
                });
            }
        };

        let cash = tx.outputs_of_type::<CashRecord>();
        ensure(!cash.is_empty(), || VerificationError::NoCashOutputs)?;

        let acceptable: Vec<Money> = cash
            .iter()
            .filter(|state| state.owner == *input.payee())
            .map(|state| state.amount.without_issuer())
            .collect();
        let settled = Money::try_sum(&acceptable)?.ok_or(
            VerificationError::CashNotPaidToCounterparty {
                payee: T::PAYEE_ROLE,
            },
        )?;

        let outstanding = input.amount().checked_sub(input.paid())?;
        let ordering = outstanding.checked_cmp(&settled)?;
        ensure(ordering != Ordering::Less, || {
            VerificationError::SettlementExceedsOutstanding {
                settled: settled.clone(),
                outstanding: outstanding.clone(),
            }
        })?;

        let outcome = if ordering == Ordering::Equal {
            ensure(group.outputs.is_empty(), || {
                VerificationError::UnexpectedOutputOnFullSettlement { record: T::RECORD }
            })?;
            SettlementOutcome::Full {
                settled: settled.clone(),
            }
        } else {
            let output = match group.outputs.as_slice() {
                [output] => *output,
                outputs => {
                    return Err(VerificationError::WrongOutputCountOnPartialSettlement {
                        record: T::RECORD,
                        found: outputs.len(),
                    });
                }
            };
            let paid = input.paid().checked_add(&settled)?;
            ensure(*output == input.with_paid(paid.clone()), || {
                VerificationError::IllegalFieldChangeOnSettlement
            })?;
            SettlementOutcome::Partial {
                settled: settled.clone(),
                paid,
            }
        };

        require_signers(signers, input.participants())?;
        debug!(record = T::RECORD, id = %input.id(), %settled, %outstanding, "settlement verified");
        Ok(outcome)
    }
}

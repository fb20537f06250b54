//! Cash spend selection.

use super::builder::TransactionBuilder;
use super::error::WorkflowError;
use crate::money::{Issued, Money};
use crate::state::Vault;
use crate::types::{CashAction, CashRecord, Command, CommandData, PartyRef};
use std::cmp::Ordering;
use tracing::debug;

/// Adds a payment of `amount` from `payer` to `payee` to `builder`
///
/// Coins are taken in vault order until they cover `amount`. Each coin keeps
/// its issuer: the part that pays goes to `payee`, any remainder of the last
/// coin goes back to `payer` as change.
pub fn generate_spend(
    vault: &Vault,
    builder: &mut TransactionBuilder,
    amount: &Money,
    payer: &PartyRef,
    payee: &PartyRef,
) -> Result<(), WorkflowError> {
    let balance = vault.cash_balance(payer, amount.currency())?;
    if balance.checked_cmp(amount)? == Ordering::Less {
        return Err(WorkflowError::InsufficientBalance {
            party: payer.clone(),
            balance,
            needed: amount.clone(),
        });
    }

    let mut remaining = amount.clone();
    for (position, coin) in vault.unconsumed_cash(payer, amount.currency()) {
        if remaining.is_zero() {
            break;
        }
        let value = coin.amount.without_issuer();
        let paid = if value.checked_cmp(&remaining)? == Ordering::Greater {
            remaining.clone()
        } else {
            value.clone()
        };
        let change = value.checked_sub(&paid)?;
        remaining = remaining.checked_sub(&paid)?;
        debug!(?position, %paid, %change, "Spending coin");

        builder.add_input(coin.clone());
        builder.add_output(CashRecord {
            amount: Issued {
                issuer: coin.amount.issuer.clone(),
                product: paid,
            },
            owner: payee.clone(),
        });
        if !change.is_zero() {
            builder.add_output(CashRecord {
                amount: Issued {
                    issuer: coin.amount.issuer.clone(),
                    product: change,
                },
                owner: payer.clone(),
            });
        }
    }

    builder.add_command(Command::new(
        CommandData::Cash(CashAction::Move),
        [payer.clone()],
    ));
    Ok(())
}

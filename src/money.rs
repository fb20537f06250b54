//! Money Module
//!
//! Exact monetary amounts tagged with a currency code.
//! Quantities are held in the currency's minor unit (cents, pence) so that
//! all arithmetic is integer arithmetic. Every operation between two amounts
//! checks the currency first and fails with `MoneyError::CurrencyMismatch`
//! before looking at the quantities.

use crate::types::PartyRef;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors raised by money arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Token mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },
    #[error("Amount arithmetic overflowed")]
    Overflow,
    #[error("Amount cannot be negative")]
    Underflow,
}

/// ISO-4217 style currency code, always upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_ascii_uppercase())
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Number of minor-unit digits used when rendering an amount
    pub fn fraction_digits(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" => 0,
            "BHD" | "KWD" | "OMR" => 3,
            _ => 2,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An exact amount of a single currency
///
/// Amounts in different currencies have no ordering, so there is no
/// `PartialOrd`; compare with [`Money::checked_cmp`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units of `currency`
    quantity: u64,
    currency: Currency,
}

impl Money {
    /// Creates an amount from a quantity of minor units
    pub fn new(quantity: u64, currency: Currency) -> Self {
        Self { quantity, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Creates an amount from whole major units (e.g. dollars, pounds)
    pub fn from_major(units: u64, currency: Currency) -> Result<Self, MoneyError> {
        let scale = 10u64.pow(currency.fraction_digits());
        let quantity = units.checked_mul(scale).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(quantity, currency))
    }

    pub fn dollars(units: u32) -> Self {
        Self::new(u64::from(units) * 100, Currency::usd())
    }

    pub fn pounds(units: u32) -> Self {
        Self::new(u64::from(units) * 100, Currency::gbp())
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn is_positive(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_zero(&self) -> bool {
        self.quantity == 0
    }

    fn require_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        let quantity = self
            .quantity
            .checked_add(other.quantity)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money::new(quantity, self.currency.clone()))
    }

    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.require_same_currency(other)?;
        let quantity = self
            .quantity
            .checked_sub(other.quantity)
            .ok_or(MoneyError::Underflow)?;
        Ok(Money::new(quantity, self.currency.clone()))
    }

    /// Compares two amounts of the same currency
    pub fn checked_cmp(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.require_same_currency(other)?;
        Ok(self.quantity.cmp(&other.quantity))
    }

    /// Sums amounts that must all share one currency
    ///
    /// Returns `Ok(None)` for an empty sequence, since an empty sum has no currency.
    pub fn try_sum<'a, I>(amounts: I) -> Result<Option<Money>, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        let mut total: Option<Money> = None;
        for amount in amounts {
            total = Some(match total {
                None => amount.clone(),
                Some(acc) => acc.checked_add(amount)?,
            });
        }
        Ok(total)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.currency.fraction_digits();
        if digits == 0 {
            return write!(f, "{} {}", self.quantity, self.currency);
        }
        let scale = 10u64.pow(digits);
        write!(
            f,
            "{}.{:0width$} {}",
            self.quantity / scale,
            self.quantity % scale,
            self.currency,
            width = digits as usize
        )
    }
}

/// The party that issued an asset, plus the issuer's internal reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issuer {
    pub party: PartyRef,
    #[serde(default)]
    pub reference: Vec<u8>,
}

/// A product tagged with its issuer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issued<T> {
    pub issuer: Issuer,
    pub product: T,
}

impl Issued<Money> {
    /// Face value of the issued amount, ignoring who issued it
    pub fn without_issuer(&self) -> Money {
        self.product.clone()
    }
}

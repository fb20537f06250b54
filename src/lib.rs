//! This crate implements the contract rules of a tower rental ledger application.
//! Tower infrastructure providers install towers and onboard mobile network operators;
//! operators propose rentals and settle them in cash. The crate decides whether a
//! proposed transition is legal and assembles candidate transactions for each step.

pub mod types; // Records, commands and transactions shared by every module.
pub mod money; // Exact, currency-tagged amounts.
pub mod validation; // Contract rules deciding whether a transition is legal.
pub mod state; // In-memory vault of unconsumed records.
pub mod workflow; // Assembly of candidate transactions for each rental step.
pub mod config; // Defines and loads the verifier configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use money::{Currency, Money, MoneyError};
pub use config::Config;
pub use validation::{VerificationError, Verifier};

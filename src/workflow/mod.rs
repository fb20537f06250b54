//! Workflow Module
//!
//! Flow-side assembly of candidate transactions:
//! - TransactionBuilder: collects records and commands, then verifies
//! - generate_spend: selects the payer's cash and produces payment and change
//! - RentalWorkflows: one entry point per step of a tower rental

mod builder;
mod cash;
mod error;
mod flows;

pub use builder::TransactionBuilder;
pub use cash::generate_spend;
pub use error::WorkflowError;
pub use flows::RentalWorkflows;

#[cfg(test)]
mod tests;

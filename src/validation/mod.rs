//! Contract Validation Module
//!
//! This module decides whether a proposed state transition is legal.
//! Each validator is a pure function of the transaction and its signers:
//! - TowerAgreementValidator: install, onboard, transfer and settle towers
//! - RentalProposalValidator: propose, transfer and settle rental proposals
//! - SettlementRule: partial-payment accounting shared by both
//!
//! Violations are reported as the first failing rule in a fixed order.

mod error;
mod grouping;
mod proposal;
mod report;
mod rules;
mod settlement;
mod tower;
mod validator;


pub use error::VerificationError;
pub use grouping::{RecordGroup, group_records, single_group};
pub use proposal::RentalProposalValidator;
pub use report::VerificationReport;
pub use rules::{ContractRecord, Transferable};
pub use settlement::{Settleable, SettlementOutcome, SettlementRule};
pub use tower::TowerAgreementValidator;
pub use validator::Verifier;

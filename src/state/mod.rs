//! State Management Module
//!
//! This module keeps the records a node currently holds, so that workflows
//! can look up the latest version of a tower or proposal and select cash
//! to spend. Nothing is persisted.

mod vault;
pub use vault::{StateRef, Vault, VaultError};

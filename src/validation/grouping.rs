//! Partitioning of a transaction's records by their stable identifier.

use super::error::VerificationError;
use crate::types::{RecordKind, Transaction};
use std::collections::BTreeMap;

/// Input and output versions of one record within a transaction
#[derive(Debug)]
pub struct RecordGroup<'a, T> {
    pub inputs: Vec<&'a T>,
    pub outputs: Vec<&'a T>,
}

impl<T> Default for RecordGroup<'_, T> {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

/// Groups every record of type `T` in `tx` by `key`
///
/// Groups come back ordered by key so iteration is deterministic.
pub fn group_records<'a, T, K, F>(tx: &'a Transaction, key: F) -> BTreeMap<K, RecordGroup<'a, T>>
where
    T: RecordKind,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, RecordGroup<'a, T>> = BTreeMap::new();
    for input in tx.inputs_of_type::<T>() {
        groups.entry(key(input)).or_default().inputs.push(input);
    }
    for output in tx.outputs_of_type::<T>() {
        groups.entry(key(output)).or_default().outputs.push(output);
    }
    groups
}

/// Takes the only group of `T` out of `tx`
///
/// Fails with `MultipleOrZeroGroups` unless exactly one group exists.
pub fn single_group<'a, T, K, F>(
    tx: &'a Transaction,
    record: &'static str,
    key: F,
) -> Result<RecordGroup<'a, T>, VerificationError>
where
    T: RecordKind,
    K: Ord,
    F: Fn(&T) -> K,
{
    let groups = group_records(tx, key);
    let found = groups.len();
    let mut groups = groups.into_values();
    match (groups.next(), groups.next()) {
        (Some(group), None) => Ok(group),
        _ => Err(VerificationError::MultipleOrZeroGroups { record, found }),
    }
}

//! Ledger record and transaction types shared by the validators, the vault,
//! and the workflow helpers.

use crate::money::{Issued, Money, MoneyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Opaque identity of a ledger participant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyRef(String);

impl PartyRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for PartyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier linking every version of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniqueIdentifier {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl UniqueIdentifier {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: None,
        }
    }
}

impl Default for UniqueIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.external_id {
            Some(external) => write!(f, "{}_{}", external, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Geographic position of a tower, kept as the strings the provider supplied
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
}

/// A physical tower facility offered for rental
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerRecord {
    pub id: UniqueIdentifier,
    pub location: Location,
    pub height: String,
    pub specification: String,
    pub total_slots: u32,
    pub booked_slots: u32,
    pub rental_rate: Money,
    /// Rent settled against `rental_rate` so far
    pub paid: Money,
    /// Facility owner
    pub provider: PartyRef,
    /// Onboarded tenants, in onboarding order
    pub operators: Vec<PartyRef>,
}

impl TowerRecord {
    pub fn new(
        location: Location,
        height: impl Into<String>,
        specification: impl Into<String>,
        total_slots: u32,
        rental_rate: Money,
        provider: PartyRef,
    ) -> Self {
        let paid = Money::zero(rental_rate.currency().clone());
        Self {
            id: UniqueIdentifier::new(),
            location,
            height: height.into(),
            specification: specification.into(),
            total_slots,
            booked_slots: 0,
            rental_rate,
            paid,
            provider,
            operators: Vec::new(),
        }
    }

    /// Only the provider signs for the tower; operators act through rental proposals.
    pub fn participants(&self) -> Vec<PartyRef> {
        vec![self.provider.clone()]
    }

    /// Copy with `operator` appended and one more slot booked
    pub fn with_new_operator(&self, operator: PartyRef) -> Self {
        let mut next = self.clone();
        next.operators.push(operator);
        next.booked_slots += 1;
        next
    }

    pub fn with_provider(&self, provider: PartyRef) -> Self {
        Self {
            provider,
            ..self.clone()
        }
    }

    pub fn with_paid(&self, paid: Money) -> Self {
        Self {
            paid,
            ..self.clone()
        }
    }

    /// Adds `amount` to `paid` without any rule validation
    pub fn pay(&self, amount: &Money) -> Result<Self, MoneyError> {
        Ok(self.with_paid(self.paid.checked_add(amount)?))
    }
}

/// A rental agreement between a mobile network operator and the tower's
/// infrastructure provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalProposalRecord {
    pub id: UniqueIdentifier,
    pub rental_amount: Money,
    /// Operator proposing to rent
    pub proposer: PartyRef,
    /// The agreement party, i.e. the infrastructure provider
    pub counterparty: PartyRef,
    pub paid: Money,
    /// Snapshot of the tower the proposal refers to
    pub tower: TowerRecord,
}

impl RentalProposalRecord {
    pub fn new(
        rental_amount: Money,
        proposer: PartyRef,
        counterparty: PartyRef,
        tower: TowerRecord,
    ) -> Self {
        let paid = Money::zero(rental_amount.currency().clone());
        Self {
            id: UniqueIdentifier::new(),
            rental_amount,
            proposer,
            counterparty,
            paid,
            tower,
        }
    }

    pub fn participants(&self) -> Vec<PartyRef> {
        vec![self.proposer.clone(), self.counterparty.clone()]
    }

    pub fn with_new_proposer(&self, proposer: PartyRef) -> Self {
        Self {
            proposer,
            ..self.clone()
        }
    }

    pub fn with_paid(&self, paid: Money) -> Self {
        Self {
            paid,
            ..self.clone()
        }
    }

    /// Adds `amount` to `paid` without any rule validation
    pub fn pay(&self, amount: &Money) -> Result<Self, MoneyError> {
        Ok(self.with_paid(self.paid.checked_add(amount)?))
    }

    pub fn outstanding(&self) -> Result<Money, MoneyError> {
        self.rental_amount.checked_sub(&self.paid)
    }
}

/// Fungible cash owned by a party, from the external asset subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashRecord {
    pub amount: Issued<Money>,
    pub owner: PartyRef,
}

impl CashRecord {
    pub fn with_new_owner(&self, owner: PartyRef) -> Self {
        Self {
            owner,
            ..self.clone()
        }
    }
}

/// Contracts that govern records on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContractKind {
    Tower,
    Rental,
    Cash,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractKind::Tower => "TowerContract",
            ContractKind::Rental => "TowerRentalContract",
            ContractKind::Cash => "Cash",
        };
        f.write_str(name)
    }
}

/// Any record that can appear as a transaction input or output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerRecord {
    Tower(TowerRecord),
    RentalProposal(RentalProposalRecord),
    Cash(CashRecord),
}

impl LedgerRecord {
    pub fn contract(&self) -> ContractKind {
        match self {
            LedgerRecord::Tower(_) => ContractKind::Tower,
            LedgerRecord::RentalProposal(_) => ContractKind::Rental,
            LedgerRecord::Cash(_) => ContractKind::Cash,
        }
    }
}

impl From<TowerRecord> for LedgerRecord {
    fn from(record: TowerRecord) -> Self {
        LedgerRecord::Tower(record)
    }
}

impl From<RentalProposalRecord> for LedgerRecord {
    fn from(record: RentalProposalRecord) -> Self {
        LedgerRecord::RentalProposal(record)
    }
}

impl From<CashRecord> for LedgerRecord {
    fn from(record: CashRecord) -> Self {
        LedgerRecord::Cash(record)
    }
}

/// Typed view into a [`LedgerRecord`]
pub trait RecordKind: Sized {
    fn from_record(record: &LedgerRecord) -> Option<&Self>;
}

impl RecordKind for TowerRecord {
    fn from_record(record: &LedgerRecord) -> Option<&Self> {
        match record {
            LedgerRecord::Tower(tower) => Some(tower),
            _ => None,
        }
    }
}

impl RecordKind for RentalProposalRecord {
    fn from_record(record: &LedgerRecord) -> Option<&Self> {
        match record {
            LedgerRecord::RentalProposal(proposal) => Some(proposal),
            _ => None,
        }
    }
}

impl RecordKind for CashRecord {
    fn from_record(record: &LedgerRecord) -> Option<&Self> {
        match record {
            LedgerRecord::Cash(cash) => Some(cash),
            _ => None,
        }
    }
}

/// Transitions of a [`TowerRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerAction {
    /// Issue a new tower
    Install,
    /// Onboard one more operator onto an existing tower
    ProposeAgreement,
    /// Transfer the tower to a new provider
    Agree,
    /// Settle rent owed on the tower
    Reject,
}

/// Transitions of a [`RentalProposalRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalAction {
    Propose,
    /// Transfer the proposal to a new proposer
    Agree,
    /// Settle the proposal, partially or in full
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashAction {
    Issue,
    Move,
    Exit,
}

/// Declared intent of a transition, tagged by the contract it addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandData {
    Tower(TowerAction),
    Rental(ProposalAction),
    Cash(CashAction),
}

impl CommandData {
    pub fn contract(&self) -> ContractKind {
        match self {
            CommandData::Tower(_) => ContractKind::Tower,
            CommandData::Rental(_) => ContractKind::Rental,
            CommandData::Cash(_) => ContractKind::Cash,
        }
    }
}

/// A command together with the parties that signed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub value: CommandData,
    pub signers: BTreeSet<PartyRef>,
}

impl Command {
    pub fn new<I>(value: CommandData, signers: I) -> Self
    where
        I: IntoIterator<Item = PartyRef>,
    {
        Self {
            value,
            signers: signers.into_iter().collect(),
        }
    }
}

/// Candidate transaction handed over by the ledger runtime for verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(default)]
    pub inputs: Vec<LedgerRecord>,
    #[serde(default)]
    pub outputs: Vec<LedgerRecord>,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Transaction {
    pub fn inputs_of_type<T: RecordKind>(&self) -> Vec<&T> {
        self.inputs.iter().filter_map(T::from_record).collect()
    }

    pub fn outputs_of_type<T: RecordKind>(&self) -> Vec<&T> {
        self.outputs.iter().filter_map(T::from_record).collect()
    }

    pub fn commands_for(&self, contract: ContractKind) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|command| command.value.contract() == contract)
            .collect()
    }

    /// Whether any input or output record belongs to `contract`
    pub fn references(&self, contract: ContractKind) -> bool {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .any(|record| record.contract() == contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower(provider: &str) -> TowerRecord {
        TowerRecord::new(
            Location {
                latitude: "51.5072".into(),
                longitude: "-0.1276".into(),
            },
            "45m",
            "lattice",
            10,
            Money::pounds(10),
            PartyRef::new(provider),
        )
    }

    #[test]
    fn test_new_tower_defaults() {
        let tower = tower("Alice");
        assert_eq!(tower.booked_slots, 0);
        assert!(tower.operators.is_empty());
        assert_eq!(tower.paid, Money::pounds(0));
        assert_eq!(tower.participants(), vec![PartyRef::new("Alice")]);
    }

    #[test]
    fn test_with_new_operator_books_one_slot() {
        let tower = tower("Alice");
        let onboarded = tower.with_new_operator(PartyRef::new("Bob"));
        assert_eq!(onboarded.booked_slots, 1);
        assert_eq!(onboarded.operators, vec![PartyRef::new("Bob")]);
        assert_eq!(onboarded.id, tower.id);
        // Operators never become participants of the tower itself.
        assert_eq!(onboarded.participants(), vec![PartyRef::new("Alice")]);
    }

    #[test]
    fn test_proposal_helpers_keep_identity() {
        let proposal = RentalProposalRecord::new(
            Money::pounds(10),
            PartyRef::new("Alice"),
            PartyRef::new("Bob"),
            tower("Bob"),
        );
        assert_eq!(proposal.paid, Money::pounds(0));
        assert_eq!(
            proposal.participants(),
            vec![PartyRef::new("Alice"), PartyRef::new("Bob")]
        );

        let paid = proposal.pay(&Money::pounds(4)).unwrap();
        assert_eq!(paid.paid, Money::pounds(4));
        assert_eq!(paid.outstanding().unwrap(), Money::pounds(6));
        assert_eq!(paid.id, proposal.id);

        let moved = proposal.with_new_proposer(PartyRef::new("Charlie"));
        assert_eq!(moved.proposer, PartyRef::new("Charlie"));
        assert_eq!(moved.with_new_proposer(PartyRef::new("Alice")), proposal);
    }

    #[test]
    fn test_typed_record_filters() {
        let proposal = RentalProposalRecord::new(
            Money::pounds(10),
            PartyRef::new("Alice"),
            PartyRef::new("Bob"),
            tower("Bob"),
        );
        let tx = Transaction {
            id: Uuid::new_v4(),
            inputs: vec![proposal.clone().into()],
            outputs: vec![tower("Bob").into(), proposal.into()],
            commands: vec![Command::new(
                CommandData::Rental(ProposalAction::Reject),
                [PartyRef::new("Alice")],
            )],
        };
        assert_eq!(tx.inputs_of_type::<RentalProposalRecord>().len(), 1);
        assert_eq!(tx.outputs_of_type::<TowerRecord>().len(), 1);
        assert!(tx.outputs_of_type::<CashRecord>().is_empty());
        assert!(tx.references(ContractKind::Tower));
        assert!(!tx.references(ContractKind::Cash));
        assert_eq!(tx.commands_for(ContractKind::Rental).len(), 1);
    }

    #[test]
    fn test_transaction_json_shape() {
        let tx = Transaction {
            id: Uuid::nil(),
            inputs: vec![],
            outputs: vec![],
            commands: vec![Command::new(
                CommandData::Tower(TowerAction::Install),
                [PartyRef::new("Alice")],
            )],
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["commands"][0]["value"]["Tower"], "Install");
        assert_eq!(json["commands"][0]["signers"][0], "Alice");
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }
}

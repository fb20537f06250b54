//! Tests for the rental workflows
//!
//! Drives a tower rental through its whole life against an in-memory vault.

#[cfg(test)]
mod tests {
    use crate::{
        money::{Currency, Issued, Issuer, Money},
        state::{Vault, VaultError},
        types::{
            CashAction, CashRecord, Command, CommandData, LedgerRecord, Location, PartyRef,
            RentalProposalRecord, TowerRecord, Transaction, UniqueIdentifier,
        },
        workflow::{RentalWorkflows, TransactionBuilder, WorkflowError, generate_spend},
    };

    fn provider() -> PartyRef {
        PartyRef::new("O=TowerCo,L=London,C=GB")
    }

    fn operator() -> PartyRef {
        PartyRef::new("O=MobileOne,L=Leeds,C=GB")
    }

    fn other_operator() -> PartyRef {
        PartyRef::new("O=MobileTwo,L=York,C=GB")
    }

    fn create_tower() -> TowerRecord {
        TowerRecord::new(
            Location {
                latitude: "53.8008".into(),
                longitude: "-1.5491".into(),
            },
            "40m",
            "three-sector",
            3,
            Money::pounds(100),
            provider(),
        )
    }

    /// Helper function to self-issue cash to `owner`, like a bank would
    fn issue_cash(vault: &mut Vault, owner: &PartyRef, coins: &[u32]) {
        let mut builder = TransactionBuilder::new();
        for units in coins {
            builder.add_output(CashRecord {
                amount: Issued {
                    issuer: Issuer {
                        party: PartyRef::new("O=Bank,L=London,C=GB"),
                        reference: vec![0],
                    },
                    product: Money::pounds(*units),
                },
                owner: owner.clone(),
            });
        }
        builder.add_command(Command::new(
            CommandData::Cash(CashAction::Issue),
            [PartyRef::new("O=Bank,L=London,C=GB")],
        ));
        vault.record(&builder.build()).unwrap();
    }

    fn only_proposal(tx: &Transaction) -> RentalProposalRecord {
        tx.outputs_of_type::<RentalProposalRecord>()[0].clone()
    }

    /// Installs a tower and records a proposal from `operator()`
    fn setup(vault: &mut Vault, flows: &RentalWorkflows) -> (UniqueIdentifier, UniqueIdentifier) {
        let tower = create_tower();
        let tower_id = tower.id.clone();
        vault
            .record(&flows.install_tower(tower).unwrap())
            .unwrap();

        let tx = flows
            .propose_rental(vault, &tower_id, operator(), Money::pounds(100))
            .unwrap();
        let proposal_id = only_proposal(&tx).id;
        vault.record(&tx).unwrap();
        (tower_id, proposal_id)
    }

    #[test]
    fn test_full_rental_lifecycle() {
        let flows = RentalWorkflows::new();
        let mut vault = Vault::new();
        let (tower_id, proposal_id) = setup(&mut vault, &flows);

        let proposal = vault.proposal(&proposal_id).unwrap();
        assert_eq!(proposal.counterparty, provider());
        assert_eq!(proposal.tower.id, tower_id);

        // Hand the proposal over, then settle in two payments.
        let tx = flows
            .transfer_proposal(&vault, &proposal_id, &operator(), other_operator())
            .unwrap();
        vault.record(&tx).unwrap();
        assert_eq!(vault.proposal(&proposal_id).unwrap().proposer, other_operator());

        issue_cash(&mut vault, &other_operator(), &[30, 50, 40]);

        let tx = flows
            .settle_proposal(&vault, &proposal_id, &other_operator(), Money::pounds(60))
            .unwrap();
        vault.record(&tx).unwrap();
        assert_eq!(vault.proposal(&proposal_id).unwrap().paid, Money::pounds(60));
        assert_eq!(
            vault.cash_balance(&provider(), &Currency::gbp()).unwrap(),
            Money::pounds(60)
        );
        assert_eq!(
            vault.cash_balance(&other_operator(), &Currency::gbp()).unwrap(),
            Money::pounds(60)
        );

        let tx = flows
            .settle_proposal(&vault, &proposal_id, &other_operator(), Money::pounds(40))
            .unwrap();
        assert!(tx.outputs_of_type::<RentalProposalRecord>().is_empty());
        vault.record(&tx).unwrap();
        assert_eq!(vault.proposal(&proposal_id), None);
        assert_eq!(
            vault.cash_balance(&provider(), &Currency::gbp()).unwrap(),
            Money::pounds(100)
        );
    }

    #[test]
    fn test_onboarding_books_slots() {
        let flows = RentalWorkflows::new();
        let mut vault = Vault::new();
        let tower = create_tower();
        let tower_id = tower.id.clone();
        vault
            .record(&flows.install_tower(tower).unwrap())
            .unwrap();

        for tenant in [operator(), other_operator()] {
            let tx = flows
                .onboard_operator(&vault, &tower_id, &provider(), tenant)
                .unwrap();
            vault.record(&tx).unwrap();
        }
        let tower = vault.tower(&tower_id).unwrap();
        assert_eq!(tower.booked_slots, 2);
        assert_eq!(tower.operators, vec![operator(), other_operator()]);

        assert_eq!(
            flows.onboard_operator(&vault, &tower_id, &operator(), other_operator()),
            Err(WorkflowError::NotProvider)
        );
    }

    #[test]
    fn test_only_proposer_may_transfer_or_settle() {
        let flows = RentalWorkflows::new();
        let mut vault = Vault::new();
        let (_, proposal_id) = setup(&mut vault, &flows);

        assert_eq!(
            flows.transfer_proposal(&vault, &proposal_id, &provider(), other_operator()),
            Err(WorkflowError::NotProposer)
        );
        assert_eq!(
            flows.settle_proposal(&vault, &proposal_id, &provider(), Money::pounds(10)),
            Err(WorkflowError::NotProposer)
        );
    }

    #[test]
    fn test_conflicting_transfers_apply_once() {
        let flows = RentalWorkflows::new();
        let mut vault = Vault::new();
        let (_, proposal_id) = setup(&mut vault, &flows);

        let to_other = flows
            .transfer_proposal(&vault, &proposal_id, &operator(), other_operator())
            .unwrap();
        let to_third = flows
            .transfer_proposal(
                &vault,
                &proposal_id,
                &operator(),
                PartyRef::new("O=MobileThree,L=Hull,C=GB"),
            )
            .unwrap();

        assert_eq!(vault.record(&to_other), Ok(1));
        assert!(matches!(
            vault.record(&to_third),
            Err(VaultError::UnknownInput { index: 0, .. })
        ));
        assert_eq!(vault.proposal(&proposal_id).unwrap().proposer, other_operator());
        assert_eq!(vault.len(), 2);
    }

    #[test]
    fn test_settlement_preconditions() {
        let flows = RentalWorkflows::new();
        let mut vault = Vault::new();
        let (_, proposal_id) = setup(&mut vault, &flows);
        issue_cash(&mut vault, &operator(), &[20]);

        assert!(matches!(
            flows.settle_proposal(&vault, &proposal_id, &operator(), Money::pounds(50)),
            Err(WorkflowError::InsufficientBalance { .. })
        ));
        assert!(matches!(
            flows.settle_proposal(&vault, &proposal_id, &operator(), Money::pounds(150)),
            Err(WorkflowError::SettlementTooLarge { .. })
        ));
        assert!(matches!(
            flows.settle_proposal(&vault, &proposal_id, &operator(), Money::dollars(5)),
            Err(WorkflowError::Money(_))
        ));
        assert!(matches!(
            flows.settle_proposal(&vault, &UniqueIdentifier::new(), &operator(), Money::pounds(5)),
            Err(WorkflowError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_generate_spend_returns_change() {
        let mut vault = Vault::new();
        issue_cash(&mut vault, &operator(), &[30, 50]);

        let mut builder = TransactionBuilder::new();
        generate_spend(
            &vault,
            &mut builder,
            &Money::pounds(45),
            &operator(),
            &provider(),
        )
        .unwrap();
        let tx = builder.build();

        let paid: Vec<Money> = tx
            .outputs_of_type::<CashRecord>()
            .into_iter()
            .filter(|cash| cash.owner == provider())
            .map(|cash| cash.amount.without_issuer())
            .collect();
        assert_eq!(paid, vec![Money::pounds(30), Money::pounds(15)]);

        let change: Vec<&CashRecord> = tx
            .outputs_of_type::<CashRecord>()
            .into_iter()
            .filter(|cash| cash.owner == operator())
            .collect();
        assert_eq!(change.len(), 1);
        assert_eq!(change[0].amount.without_issuer(), Money::pounds(35));
        assert_eq!(tx.inputs.len(), 2);
        assert!(tx.inputs.iter().all(|input| matches!(input, LedgerRecord::Cash(_))));
    }
}

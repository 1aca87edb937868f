//! Balance effects.
//!
//! Every transaction maps to a fixed set of signed per-account deltas. The
//! ledger applies those deltas when a transaction is stored and applies
//! their negation when it is removed, so mutations stay reversible and the
//! account invariant holds without ever recomputing balances from scratch.

use uuid::Uuid;

use crate::{MoneyCents, Transaction, TransactionKind};

/// A signed balance delta against one account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    pub account_id: Uuid,
    pub delta: MoneyCents,
}

impl Effect {
    #[must_use]
    pub fn new(account_id: Uuid, delta: MoneyCents) -> Self {
        Self { account_id, delta }
    }
}

/// Deltas to apply when `tx` is added to the ledger.
///
/// Income credits the account, expense debits it, and a transfer debits the
/// source while crediting the destination by the same amount.
#[must_use]
pub fn apply(tx: &Transaction) -> Vec<Effect> {
    match tx.kind {
        TransactionKind::Income => vec![Effect::new(tx.account_id, tx.amount)],
        TransactionKind::Expense => vec![Effect::new(tx.account_id, -tx.amount)],
        TransactionKind::Transfer => {
            let mut effects = vec![Effect::new(tx.account_id, -tx.amount)];
            if let Some(to) = tx.transfer_to_account_id {
                effects.push(Effect::new(to, tx.amount));
            }
            effects
        }
    }
}

/// Deltas to apply when `tx` is removed: the exact negation of [`apply`].
#[must_use]
pub fn reverse(tx: &Transaction) -> Vec<Effect> {
    apply(tx)
        .into_iter()
        .map(|e| Effect::new(e.account_id, -e.delta))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn tx(kind: TransactionKind, to: Option<Uuid>) -> Transaction {
        Transaction::new(
            "alice".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            to,
            kind,
            MoneyCents::new(50_000_00),
            "Rent".to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn income_credits_the_account() {
        let tx = tx(TransactionKind::Income, None);
        assert_eq!(
            apply(&tx),
            vec![Effect::new(tx.account_id, MoneyCents::new(50_000_00))]
        );
    }

    #[test]
    fn expense_debits_the_account() {
        let tx = tx(TransactionKind::Expense, None);
        assert_eq!(
            apply(&tx),
            vec![Effect::new(tx.account_id, MoneyCents::new(-50_000_00))]
        );
    }

    #[test]
    fn transfer_moves_the_amount_between_accounts() {
        let to = Uuid::new_v4();
        let tx = tx(TransactionKind::Transfer, Some(to));
        assert_eq!(
            apply(&tx),
            vec![
                Effect::new(tx.account_id, MoneyCents::new(-50_000_00)),
                Effect::new(to, MoneyCents::new(50_000_00)),
            ]
        );
    }

    #[test]
    fn reverse_nets_to_zero_against_apply() {
        let to = Uuid::new_v4();
        for tx in [
            tx(TransactionKind::Income, None),
            tx(TransactionKind::Expense, None),
            tx(TransactionKind::Transfer, Some(to)),
        ] {
            let mut net: Vec<Effect> = apply(&tx);
            net.extend(reverse(&tx));
            let total: MoneyCents = net.iter().map(|e| e.delta).sum();
            assert_eq!(total, MoneyCents::ZERO);
            for fwd in apply(&tx) {
                assert!(reverse(&tx).contains(&Effect::new(fwd.account_id, -fwd.delta)));
            }
        }
    }
}

//! Transaction operations: the validate-then-apply path.
//!
//! Every write here runs inside one database transaction: the transaction
//! row and its balance effects commit together or not at all. Updates are
//! two-phase: reverse the stored effects, then apply the new ones.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, entity::prelude::*,
};
use uuid::Uuid;

use crate::{
    Account, Category, CreateTransactionCmd, EngineError, ResultEngine, Transaction,
    TransactionKind, UpdateTransactionCmd, accounts, categories, effects, transactions,
};

use super::{
    Engine,
    categories::require_category,
    ledger::{adjust_balance, require_account},
};

/// A transaction joined with the entities it references.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionDetail {
    pub transaction: Transaction,
    pub account: Account,
    pub category: Category,
    pub transfer_to_account: Option<Account>,
}

/// Filters for transaction listing. Unset fields match everything.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u64>,
}

/// Fetches a transaction addressed by id: missing gives not-found, a
/// foreign owner gives forbidden.
async fn require_transaction<C: ConnectionTrait>(
    conn: &C,
    transaction_id: Uuid,
    owner_id: &str,
) -> ResultEngine<Transaction> {
    let model = transactions::Entity::find_by_id(transaction_id.to_string())
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::not_found("transaction"))?;
    if model.owner_id != owner_id {
        return Err(EngineError::forbidden(
            "transaction belongs to another user",
        ));
    }
    Transaction::try_from(model)
}

/// Rejects accounts that can no longer receive new transactions.
fn ensure_writable(account: &accounts::Model) -> ResultEngine<()> {
    if account.archived {
        return Err(EngineError::validation(
            "account_id",
            "account is archived",
        ));
    }
    Ok(())
}

impl Engine {
    /// Creates a transaction and applies its balance effects atomically.
    ///
    /// All referenced entities are validated before anything is written, so
    /// a rejected transfer leaves both balances untouched.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<TransactionDetail> {
        let db_tx = self.database.begin().await?;

        let account = require_account(&db_tx, cmd.account_id, &cmd.owner_id).await?;
        ensure_writable(&account)?;
        require_category(&db_tx, cmd.category_id, &cmd.owner_id).await?;

        if let (TransactionKind::Transfer, Some(to_id)) = (cmd.kind, cmd.to_account_id) {
            let to = require_account(&db_tx, to_id, &cmd.owner_id).await?;
            ensure_writable(&to)?;
        }

        let tx = Transaction::new(
            cmd.owner_id.clone(),
            cmd.account_id,
            cmd.category_id,
            cmd.to_account_id,
            cmd.kind,
            cmd.amount,
            cmd.description,
            cmd.occurred_on.unwrap_or_else(|| Utc::now().date_naive()),
        )?;

        transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
        for effect in effects::apply(&tx) {
            adjust_balance(&db_tx, effect.account_id, effect.delta).await?;
        }

        db_tx.commit().await?;

        self.transaction_detail(tx.id, &cmd.owner_id).await
    }

    /// Rewrites a transaction: reverses the stored effects, then applies the
    /// effects of the updated form, all in one database transaction.
    ///
    /// Unset command fields keep the stored value. A kind change away from
    /// transfer drops the stored destination.
    pub async fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<TransactionDetail> {
        let db_tx = self.database.begin().await?;

        let old = require_transaction(&db_tx, cmd.transaction_id, &cmd.owner_id).await?;

        let kind = cmd.kind.unwrap_or(old.kind);
        let to_account_id = match kind {
            TransactionKind::Transfer => cmd.to_account_id.or(old.transfer_to_account_id),
            _ => None,
        };

        let mut new = Transaction::new(
            old.owner_id.clone(),
            cmd.account_id.unwrap_or(old.account_id),
            cmd.category_id.unwrap_or(old.category_id),
            to_account_id,
            kind,
            cmd.amount.unwrap_or(old.amount),
            cmd.description.unwrap_or_else(|| old.description.clone()),
            cmd.occurred_on.unwrap_or(old.occurred_on),
        )?;
        new.id = old.id;
        new.created_at = old.created_at;

        let account = require_account(&db_tx, new.account_id, &new.owner_id).await?;
        ensure_writable(&account)?;
        require_category(&db_tx, new.category_id, &new.owner_id).await?;
        if let Some(to_id) = new.transfer_to_account_id {
            let to = require_account(&db_tx, to_id, &new.owner_id).await?;
            ensure_writable(&to)?;
        }

        // Reversal first, so the stored effects never double-count.
        for effect in effects::reverse(&old) {
            adjust_balance(&db_tx, effect.account_id, effect.delta).await?;
        }
        for effect in effects::apply(&new) {
            adjust_balance(&db_tx, effect.account_id, effect.delta).await?;
        }

        transactions::ActiveModel::from(&new).update(&db_tx).await?;

        db_tx.commit().await?;

        self.transaction_detail(new.id, &cmd.owner_id).await
    }

    /// Deletes a transaction and reverses its balance effects.
    ///
    /// The reversal also lands on archived accounts, otherwise their frozen
    /// balances would go stale.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<()> {
        let db_tx = self.database.begin().await?;

        let tx = require_transaction(&db_tx, transaction_id, owner_id).await?;

        for effect in effects::reverse(&tx) {
            adjust_balance(&db_tx, effect.account_id, effect.delta).await?;
        }
        transactions::Entity::delete_by_id(transaction_id.to_string())
            .exec(&db_tx)
            .await?;

        db_tx.commit().await?;
        Ok(())
    }

    /// Returns one transaction with its referenced entities.
    pub async fn transaction_detail(
        &self,
        transaction_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<TransactionDetail> {
        let tx = require_transaction(&self.database, transaction_id, owner_id).await?;
        self.load_detail(tx).await
    }

    /// Lists the owner's transactions, newest first.
    pub async fn list_transactions(
        &self,
        owner_id: &str,
        filter: TransactionListFilter,
    ) -> ResultEngine<Vec<TransactionDetail>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transactions::Column::CreatedAt);

        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id.to_string()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::OccurredOn.lte(to));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.database).await?;
        let mut details = Vec::with_capacity(models.len());
        for model in models {
            let tx = Transaction::try_from(model)?;
            details.push(self.load_detail(tx).await?);
        }
        Ok(details)
    }

    async fn load_detail(&self, tx: Transaction) -> ResultEngine<TransactionDetail> {
        let account = accounts::Entity::find_by_id(tx.account_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("account"))?;
        let category = categories::Entity::find_by_id(tx.category_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("category"))?;
        let transfer_to_account = match tx.transfer_to_account_id {
            Some(to_id) => {
                let model = accounts::Entity::find_by_id(to_id.to_string())
                    .one(&self.database)
                    .await?
                    .ok_or_else(|| EngineError::not_found("account"))?;
                Some(Account::try_from(model)?)
            }
            None => None,
        };
        Ok(TransactionDetail {
            transaction: tx,
            account: Account::try_from(account)?,
            category: Category::try_from(category)?,
            transfer_to_account,
        })
    }
}

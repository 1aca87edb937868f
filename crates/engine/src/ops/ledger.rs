//! Account operations and the balance-mutation primitive.

use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, Statement, entity::prelude::*,
};
use uuid::Uuid;

use crate::{
    Account, AccountKind, EngineError, MoneyCents, ResultEngine, UpdateAccountCmd, accounts,
};

use super::Engine;

/// Fetches an account row for use as a payload reference.
///
/// An account that exists but belongs to another owner is reported as
/// missing, so callers cannot probe foreign ids.
pub(crate) async fn require_account<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    owner_id: &str,
) -> ResultEngine<accounts::Model> {
    let model = accounts::Entity::find_by_id(account_id.to_string())
        .one(conn)
        .await?
        .filter(|model| model.owner_id == owner_id)
        .ok_or_else(|| EngineError::not_found("account"))?;
    Ok(model)
}

/// Applies a signed delta to one account balance as a relative update.
///
/// `balance_minor = balance_minor + delta` is evaluated inside the database,
/// so concurrent writers cannot lose each other's increments.
pub(crate) async fn adjust_balance<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    delta: MoneyCents,
) -> ResultEngine<()> {
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        "UPDATE accounts SET balance_minor = balance_minor + ? WHERE id = ?",
        [delta.minor().into(), account_id.to_string().into()],
    );
    let result = conn.execute(stmt).await?;
    if result.rows_affected() != 1 {
        return Err(EngineError::not_found("account"));
    }
    Ok(())
}

impl Engine {
    /// Creates an account with a seed balance.
    pub async fn new_account(
        &self,
        owner_id: &str,
        name: &str,
        kind: AccountKind,
        seed_balance: MoneyCents,
        color: Option<String>,
        description: Option<String>,
    ) -> ResultEngine<Account> {
        let account = Account::new(
            owner_id.to_string(),
            name.to_string(),
            kind,
            seed_balance,
            color,
            description,
        )?;
        accounts::ActiveModel::from(&account)
            .insert(&self.database)
            .await?;
        Ok(account)
    }

    /// Returns one account addressed by id.
    pub async fn account(&self, account_id: Uuid, owner_id: &str) -> ResultEngine<Account> {
        let model = accounts::Entity::find_by_id(account_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("account"))?;
        if model.owner_id != owner_id {
            return Err(EngineError::forbidden("account belongs to another user"));
        }
        Account::try_from(model)
    }

    /// Lists the owner's accounts, archived ones excluded.
    pub async fn accounts(&self, owner_id: &str) -> ResultEngine<Vec<Account>> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .filter(accounts::Column::Archived.eq(false))
            .order_by_asc(accounts::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Account::try_from).collect()
    }

    /// Updates account metadata. The balance is not writable: it only moves
    /// through transaction effects.
    pub async fn update_account(
        &self,
        account_id: Uuid,
        owner_id: &str,
        cmd: UpdateAccountCmd,
    ) -> ResultEngine<Account> {
        self.account(account_id, owner_id).await?;

        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(EngineError::validation("name", "name must not be empty"));
            }
        }

        let model = accounts::ActiveModel {
            id: ActiveValue::Set(account_id.to_string()),
            name: match cmd.name {
                Some(name) => ActiveValue::Set(name.trim().to_string()),
                None => ActiveValue::NotSet,
            },
            kind: match cmd.kind {
                Some(kind) => ActiveValue::Set(kind.as_str().to_string()),
                None => ActiveValue::NotSet,
            },
            color: match cmd.color {
                Some(color) => ActiveValue::Set(color),
                None => ActiveValue::NotSet,
            },
            description: match cmd.description {
                Some(description) => ActiveValue::Set(Some(description)),
                None => ActiveValue::NotSet,
            },
            ..Default::default()
        };
        let updated = model.update(&self.database).await?;
        Account::try_from(updated)
    }

    /// Archives an account (soft delete). Its transaction history and its
    /// contribution to other balances stay intact; new transactions against
    /// it are rejected.
    pub async fn archive_account(&self, account_id: Uuid, owner_id: &str) -> ResultEngine<()> {
        self.account(account_id, owner_id).await?;
        let model = accounts::ActiveModel {
            id: ActiveValue::Set(account_id.to_string()),
            archived: ActiveValue::Set(true),
            ..Default::default()
        };
        model.update(&self.database).await?;
        Ok(())
    }
}

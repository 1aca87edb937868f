//! Account primitives (the ledger's balance-bearing rows).
//!
//! An account represents a place money lives: a bank account, physical cash,
//! an e-wallet, or an investment account. Its balance is denormalized state
//! that must always equal the seed balance plus the sum of signed effects of
//! every stored transaction touching it; only the ledger's delta-apply
//! primitive may mutate it.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Bank,
    Cash,
    Ewallet,
    Investment,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Cash => "cash",
            Self::Ewallet => "ewallet",
            Self::Investment => "investment",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "bank" => Ok(Self::Bank),
            "cash" => Ok(Self::Cash),
            "ewallet" => Ok(Self::Ewallet),
            "investment" => Ok(Self::Investment),
            other => Err(EngineError::validation(
                "type",
                format!("invalid account type: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub kind: AccountKind,
    pub balance: MoneyCents,
    pub color: String,
    pub description: Option<String>,
    pub archived: bool,
}

impl Account {
    pub fn new(
        owner_id: String,
        name: String,
        kind: AccountKind,
        seed_balance: MoneyCents,
        color: Option<String>,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        if name.trim().is_empty() {
            return Err(EngineError::validation("name", "name must not be empty"));
        }
        if seed_balance.is_negative() {
            return Err(EngineError::validation(
                "balance",
                "initial balance must not be negative",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.trim().to_string(),
            kind,
            balance: seed_balance,
            color: color.unwrap_or_else(|| "blue".to_string()),
            description,
            archived: false,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub kind: String,
    pub balance_minor: i64,
    pub color: String,
    pub description: Option<String>,
    pub archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            owner_id: ActiveValue::Set(account.owner_id.clone()),
            name: ActiveValue::Set(account.name.clone()),
            kind: ActiveValue::Set(account.kind.as_str().to_string()),
            balance_minor: ActiveValue::Set(account.balance.minor()),
            color: ActiveValue::Set(account.color.clone()),
            description: ActiveValue::Set(account.description.clone()),
            archived: ActiveValue::Set(account.archived),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::not_found("account".to_string()))?,
            owner_id: model.owner_id,
            name: model.name,
            kind: AccountKind::try_from(model.kind.as_str())?,
            balance: MoneyCents::new(model.balance_minor),
            color: model.color,
            description: model.description,
            archived: model.archived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_rejects_negative_seed_balance() {
        let err = Account::new(
            "alice".to_string(),
            "Wallet".to_string(),
            AccountKind::Cash,
            MoneyCents::new(-1),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation { field, .. } if field == "balance"));
    }

    #[test]
    fn new_account_defaults_color_and_trims_name() {
        let account = Account::new(
            "alice".to_string(),
            "  Main Bank ".to_string(),
            AccountKind::Bank,
            MoneyCents::ZERO,
            None,
            None,
        )
        .unwrap();
        assert_eq!(account.name, "Main Bank");
        assert_eq!(account.color, "blue");
        assert!(!account.archived);
    }
}

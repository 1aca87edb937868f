//! Transaction primitives.
//!
//! A transaction is an event that changes one account balance (income,
//! expense) or two (transfer). The stored `amount` is always a positive
//! magnitude; direction is derived from the kind when effects are computed,
//! never from the sign of the stored value.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::validation(
                "type",
                format!("invalid transaction type: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    /// Destination account; present iff `kind == Transfer`.
    pub transfer_to_account_id: Option<Uuid>,
    pub kind: TransactionKind,
    /// Positive magnitude, validated on construction.
    pub amount: MoneyCents,
    pub description: String,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: String,
        account_id: Uuid,
        category_id: Uuid,
        transfer_to_account_id: Option<Uuid>,
        kind: TransactionKind,
        amount: MoneyCents,
        description: String,
        occurred_on: NaiveDate,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::validation(
                "amount",
                "amount must be greater than zero",
            ));
        }
        if description.trim().is_empty() {
            return Err(EngineError::validation(
                "description",
                "description must not be empty",
            ));
        }
        match kind {
            TransactionKind::Transfer => {
                let to = transfer_to_account_id.ok_or_else(|| {
                    EngineError::validation(
                        "to_account_id",
                        "transfer requires a destination account",
                    )
                })?;
                if to == account_id {
                    return Err(EngineError::validation(
                        "to_account_id",
                        "destination must differ from the source account",
                    ));
                }
            }
            _ if transfer_to_account_id.is_some() => {
                return Err(EngineError::validation(
                    "to_account_id",
                    "destination account is only valid for transfers",
                ));
            }
            _ => {}
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            account_id,
            category_id,
            transfer_to_account_id,
            kind,
            amount,
            description: description.trim().to_string(),
            occurred_on,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub account_id: String,
    pub category_id: String,
    pub transfer_to_account_id: Option<String>,
    pub kind: String,
    pub amount_minor: i64,
    pub description: String,
    pub occurred_on: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            owner_id: ActiveValue::Set(tx.owner_id.clone()),
            account_id: ActiveValue::Set(tx.account_id.to_string()),
            category_id: ActiveValue::Set(tx.category_id.to_string()),
            transfer_to_account_id: ActiveValue::Set(
                tx.transfer_to_account_id.map(|id| id.to_string()),
            ),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.minor()),
            description: ActiveValue::Set(tx.description.clone()),
            occurred_on: ActiveValue::Set(tx.occurred_on),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            Uuid::parse_str(raw).map_err(|_| EngineError::not_found("transaction".to_string()))
        };
        Ok(Self {
            id: parse(&model.id)?,
            owner_id: model.owner_id,
            account_id: parse(&model.account_id)?,
            category_id: parse(&model.category_id)?,
            transfer_to_account_id: match model.transfer_to_account_id {
                Some(raw) => Some(parse(&raw)?),
                None => None,
            },
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            occurred_on: model.occurred_on,
            created_at: model.created_at,
        })
    }
}

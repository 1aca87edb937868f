//! Budgets and the derived spending report.
//!
//! A budget caps spending in one category over a date window. The cap and
//! window are stored; spent/remaining/percentage are derived at read time
//! from expense transactions, never persisted.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for BudgetPeriod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::validation(
                "period",
                format!("invalid budget period: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub owner_id: String,
    pub category_id: Uuid,
    pub name: String,
    /// Spending cap; zero is allowed and reports 0% used.
    pub amount: MoneyCents,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub active: bool,
}

impl Budget {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: String,
        category_id: Uuid,
        name: String,
        amount: MoneyCents,
        period: BudgetPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        if name.trim().is_empty() {
            return Err(EngineError::validation("name", "name must not be empty"));
        }
        if amount.is_negative() {
            return Err(EngineError::validation(
                "amount",
                "amount must not be negative",
            ));
        }
        if end_date <= start_date {
            return Err(EngineError::validation(
                "end_date",
                "end date must be after the start date",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            category_id,
            name: name.trim().to_string(),
            amount,
            period,
            start_date,
            end_date,
            description,
            active: true,
        })
    }
}

/// Derived spending figures for one budget window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetReport {
    pub spent: MoneyCents,
    pub remaining: MoneyCents,
    pub percentage_used: f64,
}

impl BudgetReport {
    /// `remaining` may go negative when the cap is exceeded. A zero cap
    /// reports 0% to avoid division by zero.
    #[must_use]
    pub fn compute(amount: MoneyCents, spent: MoneyCents) -> Self {
        let percentage_used = if amount == MoneyCents::ZERO {
            0.0
        } else {
            spent.minor() as f64 / amount.minor() as f64 * 100.0
        };
        Self {
            spent,
            remaining: amount - spent,
            percentage_used,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub category_id: String,
    pub name: String,
    pub amount_minor: i64,
    pub period: String,
    pub start_date: Date,
    pub end_date: Date,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            owner_id: ActiveValue::Set(budget.owner_id.clone()),
            category_id: ActiveValue::Set(budget.category_id.to_string()),
            name: ActiveValue::Set(budget.name.clone()),
            amount_minor: ActiveValue::Set(budget.amount.minor()),
            period: ActiveValue::Set(budget.period.as_str().to_string()),
            start_date: ActiveValue::Set(budget.start_date),
            end_date: ActiveValue::Set(budget.end_date),
            description: ActiveValue::Set(budget.description.clone()),
            active: ActiveValue::Set(budget.active),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::not_found("budget".to_string()))?,
            owner_id: model.owner_id,
            category_id: Uuid::parse_str(&model.category_id)
                .map_err(|_| EngineError::not_found("category".to_string()))?,
            name: model.name,
            amount: MoneyCents::new(model.amount_minor),
            period: BudgetPeriod::try_from(model.period.as_str())?,
            start_date: model.start_date,
            end_date: model.end_date,
            description: model.description,
            active: model.active,
        })
    }
}

//! Budget operations and spending aggregation.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, entity::prelude::*};
use uuid::Uuid;

use crate::{
    Budget, BudgetPeriod, BudgetReport, EngineError, MoneyCents, ResultEngine, TransactionKind,
    UpdateBudgetCmd, budgets,
};

use super::{Engine, categories::require_category};

impl Engine {
    /// Creates a budget for one category over a date window.
    #[allow(clippy::too_many_arguments)]
    pub async fn new_budget(
        &self,
        owner_id: &str,
        category_id: Uuid,
        name: &str,
        amount: MoneyCents,
        period: BudgetPeriod,
        start_date: NaiveDate,
        end_date: NaiveDate,
        description: Option<String>,
    ) -> ResultEngine<(Budget, BudgetReport)> {
        require_category(&self.database, category_id, owner_id).await?;
        let budget = Budget::new(
            owner_id.to_string(),
            category_id,
            name.to_string(),
            amount,
            period,
            start_date,
            end_date,
            description,
        )?;
        budgets::ActiveModel::from(&budget)
            .insert(&self.database)
            .await?;
        let report = self.report_for(&budget).await?;
        Ok((budget, report))
    }

    /// Returns one budget with its derived spending report.
    pub async fn budget(
        &self,
        budget_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<(Budget, BudgetReport)> {
        let budget = self.require_budget(budget_id, owner_id).await?;
        let report = self.report_for(&budget).await?;
        Ok((budget, report))
    }

    /// Lists the owner's active budgets with their reports.
    pub async fn budgets(&self, owner_id: &str) -> ResultEngine<Vec<(Budget, BudgetReport)>> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::OwnerId.eq(owner_id))
            .filter(budgets::Column::Active.eq(true))
            .order_by_asc(budgets::Column::StartDate)
            .all(&self.database)
            .await?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let budget = Budget::try_from(model)?;
            let report = self.report_for(&budget).await?;
            out.push((budget, report));
        }
        Ok(out)
    }

    /// Updates a budget's cap or window. The merged window must stay valid.
    pub async fn update_budget(
        &self,
        budget_id: Uuid,
        owner_id: &str,
        cmd: UpdateBudgetCmd,
    ) -> ResultEngine<(Budget, BudgetReport)> {
        let current = self.require_budget(budget_id, owner_id).await?;

        if let Some(name) = &cmd.name {
            if name.trim().is_empty() {
                return Err(EngineError::validation("name", "name must not be empty"));
            }
        }
        if let Some(amount) = cmd.amount {
            if amount.is_negative() {
                return Err(EngineError::validation(
                    "amount",
                    "amount must not be negative",
                ));
            }
        }
        let start_date = cmd.start_date.unwrap_or(current.start_date);
        let end_date = cmd.end_date.unwrap_or(current.end_date);
        if end_date <= start_date {
            return Err(EngineError::validation(
                "end_date",
                "end date must be after the start date",
            ));
        }

        let model = budgets::ActiveModel {
            id: ActiveValue::Set(budget_id.to_string()),
            name: match cmd.name {
                Some(name) => ActiveValue::Set(name.trim().to_string()),
                None => ActiveValue::NotSet,
            },
            amount_minor: match cmd.amount {
                Some(amount) => ActiveValue::Set(amount.minor()),
                None => ActiveValue::NotSet,
            },
            period: match cmd.period {
                Some(period) => ActiveValue::Set(period.as_str().to_string()),
                None => ActiveValue::NotSet,
            },
            start_date: ActiveValue::Set(start_date),
            end_date: ActiveValue::Set(end_date),
            description: match cmd.description {
                Some(description) => ActiveValue::Set(Some(description)),
                None => ActiveValue::NotSet,
            },
            ..Default::default()
        };
        let updated = Budget::try_from(model.update(&self.database).await?)?;
        let report = self.report_for(&updated).await?;
        Ok((updated, report))
    }

    /// Deactivates a budget (soft delete).
    pub async fn deactivate_budget(&self, budget_id: Uuid, owner_id: &str) -> ResultEngine<()> {
        self.require_budget(budget_id, owner_id).await?;
        let model = budgets::ActiveModel {
            id: ActiveValue::Set(budget_id.to_string()),
            active: ActiveValue::Set(false),
            ..Default::default()
        };
        model.update(&self.database).await?;
        Ok(())
    }

    async fn require_budget(&self, budget_id: Uuid, owner_id: &str) -> ResultEngine<Budget> {
        let model = budgets::Entity::find_by_id(budget_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("budget"))?;
        if model.owner_id != owner_id {
            return Err(EngineError::forbidden("budget belongs to another user"));
        }
        Budget::try_from(model)
    }

    /// Sums the owner's expense transactions in the budget's category over
    /// its window (both ends inclusive) and derives the report.
    async fn report_for(&self, budget: &Budget) -> ResultEngine<BudgetReport> {
        let stmt = Statement::from_sql_and_values(
            self.database.get_database_backend(),
            "SELECT COALESCE(SUM(amount_minor), 0) AS spent \
             FROM transactions \
             WHERE owner_id = ? AND category_id = ? AND kind = ? \
               AND occurred_on >= ? AND occurred_on <= ?",
            [
                budget.owner_id.clone().into(),
                budget.category_id.to_string().into(),
                TransactionKind::Expense.as_str().into(),
                budget.start_date.into(),
                budget.end_date.into(),
            ],
        );
        let row = self.database.query_one(stmt).await?;
        let spent: i64 = row.and_then(|r| r.try_get("", "spent").ok()).unwrap_or(0);
        Ok(BudgetReport::compute(budget.amount, MoneyCents::new(spent)))
    }
}

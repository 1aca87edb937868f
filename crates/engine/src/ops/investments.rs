//! Investment holding operations. Holdings never touch account balances,
//! so these are plain CRUD with ownership checks.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Investment, InvestmentKind, MoneyCents, ResultEngine, UpdateInvestmentCmd,
    investments,
};

use super::Engine;

impl Engine {
    /// Records a new holding. The current price defaults to the purchase
    /// price until the owner refreshes it.
    #[allow(clippy::too_many_arguments)]
    pub async fn new_investment(
        &self,
        owner_id: &str,
        name: &str,
        symbol: Option<String>,
        kind: InvestmentKind,
        quantity: f64,
        purchase_price: MoneyCents,
        current_price: Option<MoneyCents>,
        purchase_date: NaiveDate,
        notes: Option<String>,
    ) -> ResultEngine<Investment> {
        let investment = Investment::new(
            owner_id.to_string(),
            name.to_string(),
            symbol,
            kind,
            quantity,
            purchase_price,
            current_price,
            purchase_date,
            notes,
        )?;
        investments::ActiveModel::from(&investment)
            .insert(&self.database)
            .await?;
        Ok(investment)
    }

    pub async fn investment(
        &self,
        investment_id: Uuid,
        owner_id: &str,
    ) -> ResultEngine<Investment> {
        let model = investments::Entity::find_by_id(investment_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("investment"))?;
        if model.owner_id != owner_id {
            return Err(EngineError::forbidden("investment belongs to another user"));
        }
        Investment::try_from(model)
    }

    pub async fn investments(&self, owner_id: &str) -> ResultEngine<Vec<Investment>> {
        let models = investments::Entity::find()
            .filter(investments::Column::OwnerId.eq(owner_id))
            .order_by_asc(investments::Column::PurchaseDate)
            .all(&self.database)
            .await?;
        models.into_iter().map(Investment::try_from).collect()
    }

    /// Updates a holding; most often used to refresh the current price.
    pub async fn update_investment(
        &self,
        investment_id: Uuid,
        owner_id: &str,
        cmd: UpdateInvestmentCmd,
    ) -> ResultEngine<Investment> {
        let current = self.investment(investment_id, owner_id).await?;

        // Revalidate through the constructor so partial updates obey the
        // same rules as creation.
        let merged = Investment::new(
            current.owner_id.clone(),
            cmd.name.unwrap_or_else(|| current.name.clone()),
            cmd.symbol.or_else(|| current.symbol.clone()),
            cmd.kind.unwrap_or(current.kind),
            cmd.quantity.unwrap_or(current.quantity),
            cmd.purchase_price.unwrap_or(current.purchase_price),
            Some(cmd.current_price.unwrap_or(current.current_price)),
            cmd.purchase_date.unwrap_or(current.purchase_date),
            cmd.notes.or_else(|| current.notes.clone()),
        )?;

        let model = investments::ActiveModel {
            id: ActiveValue::Set(investment_id.to_string()),
            name: ActiveValue::Set(merged.name.clone()),
            symbol: ActiveValue::Set(merged.symbol.clone()),
            kind: ActiveValue::Set(merged.kind.as_str().to_string()),
            quantity: ActiveValue::Set(merged.quantity),
            purchase_price_minor: ActiveValue::Set(merged.purchase_price.minor()),
            current_price_minor: ActiveValue::Set(merged.current_price.minor()),
            purchase_date: ActiveValue::Set(merged.purchase_date),
            notes: ActiveValue::Set(merged.notes.clone()),
            ..Default::default()
        };
        Investment::try_from(model.update(&self.database).await?)
    }

    /// Removes a holding. Hard delete: holdings have no balance effects to
    /// reverse.
    pub async fn delete_investment(&self, investment_id: Uuid, owner_id: &str) -> ResultEngine<()> {
        self.investment(investment_id, owner_id).await?;
        investments::Entity::delete_by_id(investment_id.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }
}

//! Investment holdings.
//!
//! Holdings sit outside the ledger: they never produce balance effects.
//! Value and gain/loss figures are derived from the stored prices at read
//! time.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    Stock,
    Bond,
    Etf,
    Crypto,
    MutualFund,
}

impl InvestmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Bond => "bond",
            Self::Etf => "etf",
            Self::Crypto => "crypto",
            Self::MutualFund => "mutual_fund",
        }
    }
}

impl TryFrom<&str> for InvestmentKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "stock" => Ok(Self::Stock),
            "bond" => Ok(Self::Bond),
            "etf" => Ok(Self::Etf),
            "crypto" => Ok(Self::Crypto),
            "mutual_fund" => Ok(Self::MutualFund),
            other => Err(EngineError::validation(
                "type",
                format!("invalid investment type: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    /// Ticker or identifier, free-form.
    pub symbol: Option<String>,
    pub kind: InvestmentKind,
    pub quantity: f64,
    /// Price per unit at purchase.
    pub purchase_price: MoneyCents,
    /// Latest known price per unit.
    pub current_price: MoneyCents,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
}

impl Investment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: String,
        name: String,
        symbol: Option<String>,
        kind: InvestmentKind,
        quantity: f64,
        purchase_price: MoneyCents,
        current_price: Option<MoneyCents>,
        purchase_date: NaiveDate,
        notes: Option<String>,
    ) -> ResultEngine<Self> {
        if name.trim().is_empty() {
            return Err(EngineError::validation("name", "name must not be empty"));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(EngineError::validation(
                "quantity",
                "quantity must be greater than zero",
            ));
        }
        if purchase_price.is_negative() {
            return Err(EngineError::validation(
                "purchase_price",
                "purchase price must not be negative",
            ));
        }
        let current_price = current_price.unwrap_or(purchase_price);
        if current_price.is_negative() {
            return Err(EngineError::validation(
                "current_price",
                "current price must not be negative",
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.trim().to_string(),
            symbol,
            kind,
            quantity,
            purchase_price,
            current_price,
            purchase_date,
            notes,
        })
    }

    /// Market value of the holding at the current price.
    #[must_use]
    pub fn total_value(&self) -> MoneyCents {
        MoneyCents::new((self.current_price.minor() as f64 * self.quantity).round() as i64)
    }

    /// Total cost at purchase.
    #[must_use]
    pub fn cost_basis(&self) -> MoneyCents {
        MoneyCents::new((self.purchase_price.minor() as f64 * self.quantity).round() as i64)
    }

    #[must_use]
    pub fn gain_loss(&self) -> MoneyCents {
        self.total_value() - self.cost_basis()
    }

    /// Gain/loss relative to cost; 0 when the cost basis is zero.
    #[must_use]
    pub fn gain_loss_percentage(&self) -> f64 {
        let basis = self.cost_basis();
        if basis == MoneyCents::ZERO {
            0.0
        } else {
            self.gain_loss().minor() as f64 / basis.minor() as f64 * 100.0
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub symbol: Option<String>,
    pub kind: String,
    pub quantity: f64,
    pub purchase_price_minor: i64,
    pub current_price_minor: i64,
    pub purchase_date: Date,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Investment> for ActiveModel {
    fn from(investment: &Investment) -> Self {
        Self {
            id: ActiveValue::Set(investment.id.to_string()),
            owner_id: ActiveValue::Set(investment.owner_id.clone()),
            name: ActiveValue::Set(investment.name.clone()),
            symbol: ActiveValue::Set(investment.symbol.clone()),
            kind: ActiveValue::Set(investment.kind.as_str().to_string()),
            quantity: ActiveValue::Set(investment.quantity),
            purchase_price_minor: ActiveValue::Set(investment.purchase_price.minor()),
            current_price_minor: ActiveValue::Set(investment.current_price.minor()),
            purchase_date: ActiveValue::Set(investment.purchase_date),
            notes: ActiveValue::Set(investment.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Investment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::not_found("investment".to_string()))?,
            owner_id: model.owner_id,
            name: model.name,
            symbol: model.symbol,
            kind: InvestmentKind::try_from(model.kind.as_str())?,
            quantity: model.quantity,
            purchase_price: MoneyCents::new(model.purchase_price_minor),
            current_price: MoneyCents::new(model.current_price_minor),
            purchase_date: model.purchase_date,
            notes: model.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(quantity: f64, purchase: i64, current: i64) -> Investment {
        Investment::new(
            "alice".to_string(),
            "VTI".to_string(),
            Some("VTI".to_string()),
            InvestmentKind::Etf,
            quantity,
            MoneyCents::new(purchase),
            Some(MoneyCents::new(current)),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn derives_value_and_gain() {
        let holding = holding(10.0, 200_00, 250_00);
        assert_eq!(holding.total_value(), MoneyCents::new(2500_00));
        assert_eq!(holding.gain_loss(), MoneyCents::new(500_00));
        assert!((holding.gain_loss_percentage() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_cost_basis_reports_zero_percentage() {
        let holding = holding(3.0, 0, 100_00);
        assert_eq!(holding.gain_loss_percentage(), 0.0);
    }

    #[test]
    fn quantity_must_be_positive() {
        let err = Investment::new(
            "alice".to_string(),
            "VTI".to_string(),
            None,
            InvestmentKind::Etf,
            0.0,
            MoneyCents::new(200_00),
            None,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation { field, .. } if field == "quantity"));
    }
}

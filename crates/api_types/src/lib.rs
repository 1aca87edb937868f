//! Wire types shared by the server and its clients.
//!
//! Every response is wrapped in the [`ApiResponse`] envelope. Monetary
//! values travel as integer minor units (`*_minor`), never as floats.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Uniform JSON envelope: `{"success": bool, "message"?, "data"?, "errors"?}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Field name to messages, present on validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }

    pub fn validation_error(
        message: impl Into<String>,
        errors: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: Some(errors),
        }
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountKind {
        Bank,
        Cash,
        Ewallet,
        Investment,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: AccountKind,
        /// Seed balance in minor units; defaults to zero.
        pub balance_minor: Option<i64>,
        pub color: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<AccountKind>,
        pub color: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: AccountKind,
        pub balance_minor: i64,
        pub color: String,
        pub description: Option<String>,
        pub archived: bool,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryList {
        #[serde(rename = "type")]
        pub kind: Option<CategoryKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
        pub name: String,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub description: Option<String>,
        /// True for the shared defaults every user sees.
        pub is_default: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
        Transfer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: Uuid,
        pub category_id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        /// Must be > 0; the kind defines the direction.
        pub amount_minor: i64,
        pub description: String,
        /// Defaults to today when absent.
        pub occurred_on: Option<NaiveDate>,
        /// Destination account, transfers only.
        pub to_account_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub occurred_on: Option<NaiveDate>,
        pub to_account_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub account_name: String,
        pub category_id: Uuid,
        pub category_name: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: String,
        pub occurred_on: NaiveDate,
        pub created_at: DateTime<Utc>,
        pub to_account_id: Option<Uuid>,
        pub to_account_name: Option<String>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetPeriod {
        Daily,
        Weekly,
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category_id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub period: BudgetPeriod,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub name: Option<String>,
        pub amount_minor: Option<i64>,
        pub period: Option<BudgetPeriod>,
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category_id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub period: BudgetPeriod,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub description: Option<String>,
        pub spent_minor: i64,
        /// May be negative when the cap is exceeded.
        pub remaining_minor: i64,
        pub percentage_used: f64,
    }
}

pub mod investment {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvestmentKind {
        Stock,
        Bond,
        Etf,
        Crypto,
        MutualFund,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentNew {
        pub name: String,
        pub symbol: Option<String>,
        #[serde(rename = "type")]
        pub kind: InvestmentKind,
        pub quantity: f64,
        pub purchase_price_minor: i64,
        /// Defaults to the purchase price.
        pub current_price_minor: Option<i64>,
        pub purchase_date: NaiveDate,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentUpdate {
        pub name: Option<String>,
        pub symbol: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<InvestmentKind>,
        pub quantity: Option<f64>,
        pub purchase_price_minor: Option<i64>,
        pub current_price_minor: Option<i64>,
        pub purchase_date: Option<NaiveDate>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentView {
        pub id: Uuid,
        pub name: String,
        pub symbol: Option<String>,
        #[serde(rename = "type")]
        pub kind: InvestmentKind,
        pub quantity: f64,
        pub purchase_price_minor: i64,
        pub current_price_minor: i64,
        pub purchase_date: NaiveDate,
        pub notes: Option<String>,
        pub total_value_minor: i64,
        pub gain_loss_minor: i64,
        pub gain_loss_percentage: f64,
    }
}

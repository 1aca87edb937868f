//! Ledger engine: accounts, transactions, budgets, categories, investments.
//!
//! The engine owns the single invariant the rest of the system leans on:
//! an account balance always equals its seed balance plus the signed
//! effects of every stored transaction touching it. All balance mutations
//! go through one delta-apply primitive inside a database transaction.

pub use accounts::{Account, AccountKind};
pub use budgets::{Budget, BudgetPeriod, BudgetReport};
pub use categories::{Category, CategoryKind};
pub use commands::{
    CreateTransactionCmd, UpdateAccountCmd, UpdateBudgetCmd, UpdateCategoryCmd,
    UpdateInvestmentCmd, UpdateTransactionCmd,
};
pub use effects::{Effect, apply, reverse};
pub use error::EngineError;
pub use investments::{Investment, InvestmentKind};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, TransactionDetail, TransactionListFilter};
pub use transactions::{Transaction, TransactionKind};

pub mod accounts;
pub mod budgets;
pub mod categories;
mod commands;
pub mod effects;
mod error;
pub mod investments;
mod money;
mod ops;
pub mod transactions;
pub mod users;

pub type ResultEngine<T> = Result<T, EngineError>;

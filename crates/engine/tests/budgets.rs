use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    AccountKind, BudgetPeriod, CategoryKind, CreateTransactionCmd, Engine, EngineError,
    MoneyCents, TransactionKind, UpdateBudgetCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    for username in ["alice", "bob"] {
        seed_user(&db, username).await;
    }
    Engine::builder().database(db).build().await.unwrap()
}

async fn seed_user(db: &DatabaseConnection, username: &str) {
    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec![username.into(), "password".into()],
    ))
    .await
    .unwrap();
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    account_id: Uuid,
    food_id: Uuid,
    other_id: Uuid,
}

async fn fixture(engine: &Engine, owner: &str) -> Fixture {
    let account_id = engine
        .new_account(
            owner,
            "Main",
            AccountKind::Bank,
            MoneyCents::new(1_000_000),
            None,
            None,
        )
        .await
        .unwrap()
        .id;
    let food_id = engine
        .new_category(owner, "Food", CategoryKind::Expense, None, None, None)
        .await
        .unwrap()
        .id;
    let other_id = engine
        .new_category(owner, "Other", CategoryKind::Expense, None, None, None)
        .await
        .unwrap()
        .id;
    Fixture {
        account_id,
        food_id,
        other_id,
    }
}

async fn spend(engine: &Engine, owner: &str, fx: &Fixture, category_id: Uuid, amount: i64, day: u32) {
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                owner,
                fx.account_id,
                category_id,
                TransactionKind::Expense,
                MoneyCents::new(amount),
                "spend",
            )
            .occurred_on(date(2026, 8, day)),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn spent_sums_only_matching_expenses_in_the_window() {
    let engine = engine_with_db().await;
    let fx = fixture(&engine, "alice").await;

    // In category and window.
    spend(&engine, "alice", &fx, fx.food_id, 30_000, 5).await;
    spend(&engine, "alice", &fx, fx.food_id, 20_000, 31).await;
    // Other category, same window.
    spend(&engine, "alice", &fx, fx.other_id, 99_000, 10).await;
    // Income in the budget category must not count.
    let salary_id = engine
        .new_category("alice", "Food refunds", CategoryKind::Income, None, None, None)
        .await
        .unwrap()
        .id;
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                fx.account_id,
                salary_id,
                TransactionKind::Income,
                MoneyCents::new(400_000),
                "salary",
            )
            .occurred_on(date(2026, 8, 12)),
        )
        .await
        .unwrap();

    let (_, report) = engine
        .new_budget(
            "alice",
            fx.food_id,
            "August food",
            MoneyCents::new(100_000),
            BudgetPeriod::Monthly,
            date(2026, 8, 1),
            date(2026, 8, 31),
            None,
        )
        .await
        .unwrap();

    // Both window ends are inclusive.
    assert_eq!(report.spent, MoneyCents::new(50_000));
    assert_eq!(report.remaining, MoneyCents::new(50_000));
    assert!((report.percentage_used - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn spending_outside_the_window_is_excluded() {
    let engine = engine_with_db().await;
    let fx = fixture(&engine, "alice").await;

    spend(&engine, "alice", &fx, fx.food_id, 10_000, 14).await;
    // One day past the window end.
    engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                fx.account_id,
                fx.food_id,
                TransactionKind::Expense,
                MoneyCents::new(70_000),
                "late",
            )
            .occurred_on(date(2026, 8, 16)),
        )
        .await
        .unwrap();

    let (_, report) = engine
        .new_budget(
            "alice",
            fx.food_id,
            "First half",
            MoneyCents::new(50_000),
            BudgetPeriod::Weekly,
            date(2026, 8, 1),
            date(2026, 8, 15),
            None,
        )
        .await
        .unwrap();
    assert_eq!(report.spent, MoneyCents::new(10_000));
}

#[tokio::test]
async fn another_users_spending_never_leaks_into_the_report() {
    let engine = engine_with_db().await;
    let alice = fixture(&engine, "alice").await;
    let bob = fixture(&engine, "bob").await;

    spend(&engine, "alice", &alice, alice.food_id, 10_000, 5).await;
    spend(&engine, "bob", &bob, bob.food_id, 90_000, 5).await;

    let (_, report) = engine
        .new_budget(
            "alice",
            alice.food_id,
            "Food",
            MoneyCents::new(100_000),
            BudgetPeriod::Monthly,
            date(2026, 8, 1),
            date(2026, 8, 31),
            None,
        )
        .await
        .unwrap();
    assert_eq!(report.spent, MoneyCents::new(10_000));
}

#[tokio::test]
async fn overspent_budget_reports_negative_remaining() {
    let engine = engine_with_db().await;
    let fx = fixture(&engine, "alice").await;
    spend(&engine, "alice", &fx, fx.food_id, 150_000, 10).await;

    let (_, report) = engine
        .new_budget(
            "alice",
            fx.food_id,
            "Tight",
            MoneyCents::new(100_000),
            BudgetPeriod::Monthly,
            date(2026, 8, 1),
            date(2026, 8, 31),
            None,
        )
        .await
        .unwrap();
    assert_eq!(report.remaining, MoneyCents::new(-50_000));
    assert!((report.percentage_used - 150.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn zero_cap_budget_reports_zero_percentage() {
    let engine = engine_with_db().await;
    let fx = fixture(&engine, "alice").await;
    spend(&engine, "alice", &fx, fx.food_id, 10_000, 10).await;

    let (_, report) = engine
        .new_budget(
            "alice",
            fx.food_id,
            "Frozen",
            MoneyCents::ZERO,
            BudgetPeriod::Monthly,
            date(2026, 8, 1),
            date(2026, 8, 31),
            None,
        )
        .await
        .unwrap();
    assert_eq!(report.percentage_used, 0.0);
}

#[tokio::test]
async fn reports_follow_transaction_mutations() {
    let engine = engine_with_db().await;
    let fx = fixture(&engine, "alice").await;

    let (budget, _) = engine
        .new_budget(
            "alice",
            fx.food_id,
            "Food",
            MoneyCents::new(100_000),
            BudgetPeriod::Monthly,
            date(2026, 8, 1),
            date(2026, 8, 31),
            None,
        )
        .await
        .unwrap();

    let detail = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                fx.account_id,
                fx.food_id,
                TransactionKind::Expense,
                MoneyCents::new(40_000),
                "spend",
            )
            .occurred_on(date(2026, 8, 10)),
        )
        .await
        .unwrap();
    let (_, report) = engine.budget(budget.id, "alice").await.unwrap();
    assert_eq!(report.spent, MoneyCents::new(40_000));

    engine
        .delete_transaction(detail.transaction.id, "alice")
        .await
        .unwrap();
    let (_, report) = engine.budget(budget.id, "alice").await.unwrap();
    assert_eq!(report.spent, MoneyCents::ZERO);
}

#[tokio::test]
async fn foreign_budgets_are_forbidden_and_windows_stay_valid() {
    let engine = engine_with_db().await;
    let fx = fixture(&engine, "alice").await;

    let (budget, _) = engine
        .new_budget(
            "alice",
            fx.food_id,
            "Food",
            MoneyCents::new(100_000),
            BudgetPeriod::Monthly,
            date(2026, 8, 1),
            date(2026, 8, 31),
            None,
        )
        .await
        .unwrap();

    let err = engine.budget(budget.id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Update collapsing the window is rejected.
    let err = engine
        .update_budget(
            budget.id,
            "alice",
            UpdateBudgetCmd::new().end_date(date(2026, 7, 1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation { field, .. } if field == "end_date"));

    engine.deactivate_budget(budget.id, "alice").await.unwrap();
    let remaining = engine.budgets("alice").await.unwrap();
    assert!(remaining.is_empty());
}

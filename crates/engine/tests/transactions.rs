use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    AccountKind, CategoryKind, CreateTransactionCmd, Engine, EngineError, MoneyCents,
    TransactionKind, UpdateTransactionCmd,
};
use migration::MigratorTrait;

async fn connect(url: &str) -> DatabaseConnection {
    // A single pooled connection serializes writers, so concurrent engine
    // calls cannot interleave their read-modify-write cycles.
    let mut options = ConnectOptions::new(url);
    options.max_connections(1).min_connections(1);
    Database::connect(options).await.unwrap()
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

async fn engine_with_db() -> Engine {
    let db = connect("sqlite::memory:").await;
    migration::Migrator::up(&db, None).await.unwrap();
    seed_user(&db, "alice").await;
    seed_user(&db, "bob").await;
    Engine::builder().database(db).build().await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_account(engine: &Engine, owner: &str, name: &str, balance: i64) -> Uuid {
    engine
        .new_account(
            owner,
            name,
            AccountKind::Bank,
            MoneyCents::new(balance),
            None,
            None,
        )
        .await
        .unwrap()
        .id
}

async fn seed_category(engine: &Engine, owner: &str, name: &str, kind: CategoryKind) -> Uuid {
    engine
        .new_category(owner, name, kind, None, None, None)
        .await
        .unwrap()
        .id
}

async fn balance_of(engine: &Engine, account_id: Uuid, owner: &str) -> i64 {
    engine
        .account(account_id, owner)
        .await
        .unwrap()
        .balance
        .minor()
}

#[tokio::test]
async fn expense_create_update_delete_round_trips_the_balance() {
    let engine = engine_with_db().await;
    let account_id = seed_account(&engine, "alice", "Main", 1_000_000).await;
    let category_id = seed_category(&engine, "alice", "Food", CategoryKind::Expense).await;

    let detail = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                account_id,
                category_id,
                TransactionKind::Expense,
                MoneyCents::new(50_000),
                "Groceries",
            )
            .occurred_on(date(2026, 8, 10)),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id, "alice").await, 950_000);

    engine
        .update_transaction(
            UpdateTransactionCmd::new(detail.transaction.id, "alice")
                .amount(MoneyCents::new(70_000)),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id, "alice").await, 930_000);

    engine
        .delete_transaction(detail.transaction.id, "alice")
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id, "alice").await, 1_000_000);
}

#[tokio::test]
async fn income_credits_and_reversal_restores() {
    let engine = engine_with_db().await;
    let account_id = seed_account(&engine, "alice", "Main", 100_000).await;
    let category_id = seed_category(&engine, "alice", "Salary", CategoryKind::Income).await;

    let detail = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account_id,
            category_id,
            TransactionKind::Income,
            MoneyCents::new(250_000),
            "August salary",
        ))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id, "alice").await, 350_000);

    engine
        .delete_transaction(detail.transaction.id, "alice")
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id, "alice").await, 100_000);
}

#[tokio::test]
async fn transfer_moves_money_and_delete_restores_both_sides() {
    let engine = engine_with_db().await;
    let from_id = seed_account(&engine, "alice", "Checking", 500_000).await;
    let to_id = seed_account(&engine, "alice", "Savings", 100_000).await;
    let category_id = seed_category(&engine, "alice", "Transfers", CategoryKind::Expense).await;

    let detail = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                from_id,
                category_id,
                TransactionKind::Transfer,
                MoneyCents::new(200_000),
                "Savings top-up",
            )
            .to_account_id(to_id),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, from_id, "alice").await, 300_000);
    assert_eq!(balance_of(&engine, to_id, "alice").await, 300_000);
    assert_eq!(
        detail.transfer_to_account.as_ref().map(|a| a.id),
        Some(to_id)
    );

    engine
        .delete_transaction(detail.transaction.id, "alice")
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, from_id, "alice").await, 500_000);
    assert_eq!(balance_of(&engine, to_id, "alice").await, 100_000);
}

#[tokio::test]
async fn rejected_transfer_leaves_both_balances_untouched() {
    let engine = engine_with_db().await;
    let from_id = seed_account(&engine, "alice", "Checking", 500_000).await;
    let foreign_id = seed_account(&engine, "bob", "Bob's", 100_000).await;
    let category_id = seed_category(&engine, "alice", "Transfers", CategoryKind::Expense).await;

    // Destination does not exist.
    let err = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                from_id,
                category_id,
                TransactionKind::Transfer,
                MoneyCents::new(200_000),
                "To nowhere",
            )
            .to_account_id(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // Destination belongs to another user: reported as missing, not leaked.
    let err = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                from_id,
                category_id,
                TransactionKind::Transfer,
                MoneyCents::new(200_000),
                "To bob",
            )
            .to_account_id(foreign_id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    assert_eq!(balance_of(&engine, from_id, "alice").await, 500_000);
    assert_eq!(balance_of(&engine, foreign_id, "bob").await, 100_000);
}

#[tokio::test]
async fn update_away_from_transfer_restores_the_destination() {
    let engine = engine_with_db().await;
    let from_id = seed_account(&engine, "alice", "Checking", 500_000).await;
    let to_id = seed_account(&engine, "alice", "Savings", 0).await;
    let category_id = seed_category(&engine, "alice", "Misc", CategoryKind::Expense).await;

    let detail = engine
        .create_transaction(
            CreateTransactionCmd::new(
                "alice",
                from_id,
                category_id,
                TransactionKind::Transfer,
                MoneyCents::new(150_000),
                "Stash",
            )
            .to_account_id(to_id),
        )
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, to_id, "alice").await, 150_000);

    let updated = engine
        .update_transaction(
            UpdateTransactionCmd::new(detail.transaction.id, "alice")
                .kind(TransactionKind::Expense),
        )
        .await
        .unwrap();

    // Destination dropped and its credit reversed; source debit unchanged.
    assert_eq!(updated.transaction.transfer_to_account_id, None);
    assert_eq!(balance_of(&engine, from_id, "alice").await, 350_000);
    assert_eq!(balance_of(&engine, to_id, "alice").await, 0);
}

#[tokio::test]
async fn update_retargeting_moves_the_effect_between_accounts() {
    let engine = engine_with_db().await;
    let first_id = seed_account(&engine, "alice", "First", 100_000).await;
    let second_id = seed_account(&engine, "alice", "Second", 100_000).await;
    let category_id = seed_category(&engine, "alice", "Bills", CategoryKind::Expense).await;

    let detail = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            first_id,
            category_id,
            TransactionKind::Expense,
            MoneyCents::new(40_000),
            "Electricity",
        ))
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, first_id, "alice").await, 60_000);

    engine
        .update_transaction(
            UpdateTransactionCmd::new(detail.transaction.id, "alice").account_id(second_id),
        )
        .await
        .unwrap();

    assert_eq!(balance_of(&engine, first_id, "alice").await, 100_000);
    assert_eq!(balance_of(&engine, second_id, "alice").await, 60_000);
}

#[tokio::test]
async fn concurrent_expenses_never_lose_an_update() {
    let engine = Arc::new(engine_with_db().await);
    let account_id = seed_account(&engine, "alice", "Main", 1_000_000).await;
    let category_id = seed_category(&engine, "alice", "Food", CategoryKind::Expense).await;

    let mut handles = Vec::new();
    for amount in [10_000_i64, 20_000] {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .create_transaction(CreateTransactionCmd::new(
                    "alice",
                    account_id,
                    category_id,
                    TransactionKind::Expense,
                    MoneyCents::new(amount),
                    "Concurrent spend",
                ))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(balance_of(&engine, account_id, "alice").await, 970_000);
}

#[tokio::test]
async fn archived_accounts_reject_new_transactions_but_accept_reversals() {
    let engine = engine_with_db().await;
    let account_id = seed_account(&engine, "alice", "Old wallet", 100_000).await;
    let category_id = seed_category(&engine, "alice", "Misc", CategoryKind::Expense).await;

    let detail = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account_id,
            category_id,
            TransactionKind::Expense,
            MoneyCents::new(30_000),
            "Before archiving",
        ))
        .await
        .unwrap();

    engine.archive_account(account_id, "alice").await.unwrap();

    let err = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account_id,
            category_id,
            TransactionKind::Expense,
            MoneyCents::new(1_000),
            "After archiving",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation { .. }));

    // History cleanup still reverses against the frozen balance.
    engine
        .delete_transaction(detail.transaction.id, "alice")
        .await
        .unwrap();
    assert_eq!(balance_of(&engine, account_id, "alice").await, 100_000);
}

#[tokio::test]
async fn foreign_transactions_are_forbidden_when_addressed() {
    let engine = engine_with_db().await;
    let account_id = seed_account(&engine, "alice", "Main", 100_000).await;
    let category_id = seed_category(&engine, "alice", "Misc", CategoryKind::Expense).await;

    let detail = engine
        .create_transaction(CreateTransactionCmd::new(
            "alice",
            account_id,
            category_id,
            TransactionKind::Expense,
            MoneyCents::new(10_000),
            "Private",
        ))
        .await
        .unwrap();

    let err = engine
        .transaction_detail(detail.transaction.id, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .delete_transaction(detail.transaction.id, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(balance_of(&engine, account_id, "alice").await, 90_000);
}

#[tokio::test]
async fn listing_filters_by_kind_and_window() {
    let engine = engine_with_db().await;
    let account_id = seed_account(&engine, "alice", "Main", 1_000_000).await;
    let expense_cat = seed_category(&engine, "alice", "Food", CategoryKind::Expense).await;
    let income_cat = seed_category(&engine, "alice", "Salary", CategoryKind::Income).await;

    for (kind, category_id, amount, day) in [
        (TransactionKind::Expense, expense_cat, 10_000_i64, 5),
        (TransactionKind::Expense, expense_cat, 20_000, 15),
        (TransactionKind::Income, income_cat, 500_000, 10),
    ] {
        engine
            .create_transaction(
                CreateTransactionCmd::new(
                    "alice",
                    account_id,
                    category_id,
                    kind,
                    MoneyCents::new(amount),
                    "entry",
                )
                .occurred_on(date(2026, 8, day)),
            )
            .await
            .unwrap();
    }

    let expenses = engine
        .list_transactions(
            "alice",
            engine::TransactionListFilter {
                kind: Some(TransactionKind::Expense),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(expenses.len(), 2);
    // Newest first.
    assert_eq!(expenses[0].transaction.occurred_on, date(2026, 8, 15));

    let windowed = engine
        .list_transactions(
            "alice",
            engine::TransactionListFilter {
                from: Some(date(2026, 8, 8)),
                to: Some(date(2026, 8, 12)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(windowed.len(), 1);
    assert_eq!(windowed[0].transaction.kind, TransactionKind::Income);

    let foreign = engine
        .list_transactions("bob", engine::TransactionListFilter::default())
        .await
        .unwrap();
    assert!(foreign.is_empty());
}

#[tokio::test]
async fn balances_survive_a_restart() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();
    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let account_id = {
        let db = connect(&url).await;
        migration::Migrator::up(&db, None).await.unwrap();
        seed_user(&db, "alice").await;
        let engine = Engine::builder().database(db).build().await.unwrap();

        let account_id = seed_account(&engine, "alice", "Main", 1_000_000).await;
        let category_id = seed_category(&engine, "alice", "Food", CategoryKind::Expense).await;
        engine
            .create_transaction(CreateTransactionCmd::new(
                "alice",
                account_id,
                category_id,
                TransactionKind::Expense,
                MoneyCents::new(50_000),
                "Groceries",
            ))
            .await
            .unwrap();
        account_id
    };

    let db = connect(&url).await;
    let engine = Engine::builder().database(db).build().await.unwrap();
    assert_eq!(balance_of(&engine, account_id, "alice").await, 950_000);

    std::fs::remove_file(&path).ok();
}

use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{categories, users};
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Shared expense/income categories inserted with `categories seed`.
/// Owner is left NULL so every user sees them.
const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Salary", "income"),
    ("Freelance", "income"),
    ("Investment Returns", "income"),
    ("Bonus", "income"),
    ("Food & Drink", "expense"),
    ("Transportation", "expense"),
    ("Shopping", "expense"),
    ("Bills & Utilities", "expense"),
    ("Entertainment", "expense"),
    ("Health", "expense"),
    ("Education", "expense"),
    ("Other", "expense"),
];

#[derive(Parser, Debug)]
#[command(name = "bankqu_admin")]
#[command(about = "Admin utilities for BankQu (bootstrap users and default categories)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./bankqu.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Categories(Categories),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Categories {
    #[command(subcommand)]
    command: CategoriesCommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesCommand {
    /// Insert the shared default categories, skipping ones already present.
    Seed,
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let p1 = rpassword::prompt_password("Password: ")?;
        if p1.is_empty() {
            eprintln!("Password must not be empty.");
            continue;
        }

        let p2 = rpassword::prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        eprintln!("Passwords do not match. Try again.");
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let password = prompt_password_twice()?;

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
                password: Set(password),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.username);
        }
        Command::Categories(Categories {
            command: CategoriesCommand::Seed,
        }) => {
            let mut inserted = 0;
            for (name, kind) in DEFAULT_CATEGORIES {
                let exists = categories::Entity::find()
                    .filter(categories::Column::OwnerId.is_null())
                    .filter(categories::Column::Name.eq(*name))
                    .one(&db)
                    .await?
                    .is_some();
                if exists {
                    continue;
                }

                let category = categories::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    owner_id: Set(None),
                    name: Set((*name).to_string()),
                    kind: Set((*kind).to_string()),
                    icon: Set(None),
                    color: Set(None),
                    description: Set(None),
                    active: Set(true),
                };
                categories::Entity::insert(category).exec(&db).await?;
                inserted += 1;
            }

            println!("seeded {inserted} default categories");
        }
    }

    Ok(())
}

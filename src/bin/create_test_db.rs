use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use expense_tracker::{
    NewBudget, NewExpense, NewIncome, Period, UserID, create_budget, create_expense,
    create_income, initialize_db,
};

/// A utility for creating a test database for the REST API server of expense_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The owner ID to create the records for.
    #[arg(long, short, default_value_t = 1)]
    user_id: i64,
}

/// Create and populate a database for manual testing.
///
/// The budgets are for the current month so that they show up in the budget summary.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let user_id = UserID::new(args.user_id);
    let today = OffsetDateTime::now_utc().date();
    let period = Period::containing(today)?;

    println!("Creating test income...");
    create_income(
        NewIncome {
            user_id,
            source: "Salary".to_owned(),
            amount: 4200.0,
            date: period.start(),
            icon: Some("💼".to_owned()),
        },
        &conn,
    )?;

    println!("Creating test expenses...");
    for (category, amount, days_ago) in [
        ("Food", 64.2, 0),
        ("Food", 120.5, 1),
        ("Transport", 45.0, 2),
        ("Entertainment", 89.99, 3),
        ("Food", 38.75, 40),
    ] {
        create_expense(
            NewExpense {
                user_id,
                category: category.to_owned(),
                amount,
                date: days_before(today, days_ago),
                icon: None,
            },
            &conn,
        )?;
    }

    println!("Creating test budgets...");
    for (category, budget_amount) in [
        ("Food", 300.0),
        ("Transport", 50.0),
        ("Entertainment", 80.0),
        ("Rent", 1500.0),
    ] {
        create_budget(
            NewBudget {
                user_id,
                category: category.to_owned(),
                period,
                budget_amount,
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}

fn days_before(date: Date, days: i64) -> Date {
    date.checked_sub(Duration::days(days)).unwrap_or(date)
}

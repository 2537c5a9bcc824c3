//! The interactive console front end for the tally ledger.
//!
//! All ledger logic lives in the library; this binary only parses menu input,
//! calls the core through the store traits and renders the results.

use std::io::{self, Write};

use clap::Parser;
use rusqlite::Connection;
use time::{
    Date, Month, OffsetDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};
use tracing_subscriber::EnvFilter;

use tally::{
    Error, Session, analytics,
    analytics::SpendingAssessment,
    auth,
    models::{CategoryName, DatabaseID, Kind, NewGoal, NewTransaction, PasswordHash, TransactionUpdate},
    stores::{
        CategoryStore, GoalStore, TransactionQuery, TransactionStore,
        sqlite::{SqliteAppState, create_app_state},
    },
};

/// The interactive console app for tracking personal finances.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "tally.db")]
    db_path: String,
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> CliResult {
    setup_logging();

    let args = Args::parse();
    let connection = Connection::open(&args.db_path)?;
    let mut state = create_app_state(connection)?;

    if auth::ensure_default_admin(&mut state.user_store, PasswordHash::DEFAULT_COST)? {
        println!("Created default account admin/admin123.");
    }

    println!("=== Personal Finance Manager ===");

    let mut session: Option<Session> = None;

    loop {
        let keep_running = match &session {
            None => run_logged_out_menu(&mut state, &mut session),
            Some(_) => run_main_menu(&mut state, &mut session),
        };

        match keep_running {
            Ok(true) => {}
            Ok(false) => break,
            Err(error) => println!("{error}"),
        }
    }

    println!("Goodbye!");

    Ok(())
}

fn setup_logging() {
    // The menu owns stdout, so logs stay quiet unless RUST_LOG asks for them.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn run_logged_out_menu(
    state: &mut SqliteAppState,
    session: &mut Option<Session>,
) -> Result<bool, Box<dyn std::error::Error>> {
    println!("\n=== Welcome ===");
    println!("1. Log in");
    println!("2. Register");
    println!("0. Exit");

    match prompt("Enter your choice: ")?.as_str() {
        "1" => {
            let username = prompt("Username: ")?;
            let password = rpassword::prompt_password("Password: ")?;

            *session = Some(auth::log_in(&state.user_store, &username, &password)?);
            println!("Login successful! Welcome, {username}");
        }
        "2" => {
            let username = prompt("Username: ")?;
            let password = rpassword::prompt_password("Password: ")?;
            let email = prompt("Email (optional): ")?;
            let email = (!email.is_empty()).then_some(email);

            *session = Some(auth::register_user(
                &mut state.user_store,
                &mut state.category_store,
                &username,
                &password,
                email,
                PasswordHash::DEFAULT_COST,
            )?);
            println!("Registration successful! Welcome, {username}");
        }
        "0" => return Ok(false),
        _ => println!("Invalid choice. Please try again."),
    }

    Ok(true)
}

fn run_main_menu(
    state: &mut SqliteAppState,
    session: &mut Option<Session>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let current = session.clone().ok_or(Error::Unauthenticated)?;

    println!("\n=== Main Menu ({}) ===", current.username());
    println!(" 1. Add transaction");
    println!(" 2. List transactions");
    println!(" 3. Update transaction");
    println!(" 4. Delete transaction");
    println!(" 5. Add category");
    println!(" 6. List categories");
    println!(" 7. Delete category");
    println!(" 8. Add savings goal");
    println!(" 9. List savings goals");
    println!("10. Monthly summary");
    println!("11. Expenses by category");
    println!("12. Financial health");
    println!("13. Monthly report");
    println!("14. Savings forecast");
    println!("15. Log out");
    println!(" 0. Exit");

    match prompt("Enter your choice: ")?.as_str() {
        "1" => add_transaction(state, &current)?,
        "2" => list_transactions(state, &current)?,
        "3" => update_transaction(state, &current)?,
        "4" => delete_transaction(state, &current)?,
        "5" => add_category(state, &current)?,
        "6" => list_categories(state, &current)?,
        "7" => delete_category(state, &current)?,
        "8" => add_goal(state, &current)?,
        "9" => list_goals(state, &current)?,
        "10" => show_monthly_summary(state, &current)?,
        "11" => show_expenses_by_category(state, &current)?,
        "12" => show_financial_health(state, &current)?,
        "13" => show_monthly_report(state, &current)?,
        "14" => show_savings_forecast()?,
        "15" => {
            if let Some(current) = session.take() {
                auth::log_out(current);
            }
            println!("Logged out.");
        }
        "0" => return Ok(false),
        _ => println!("Invalid choice. Please try again."),
    }

    Ok(true)
}

fn add_transaction(state: &mut SqliteAppState, session: &Session) -> CliResult {
    let kind: Kind = prompt("Enter kind (INCOME/EXPENSE): ")?.parse()?;
    let amount: f64 = prompt("Enter amount: ")?.parse()?;
    let date = prompt_date("Enter date (YYYY-MM-DD) or press Enter for today: ")?;
    let description = prompt("Enter description: ")?;
    let category_id = select_category(state, kind, session)?;

    let new_transaction = NewTransaction::new(kind, amount, date, description, category_id)?;
    state.transaction_store.create(new_transaction, session)?;

    println!("Transaction added!");

    Ok(())
}

fn select_category(
    state: &SqliteAppState,
    kind: Kind,
    session: &Session,
) -> Result<Option<DatabaseID>, Box<dyn std::error::Error>> {
    let categories = state.category_store.get_all(Some(kind), session)?;

    if categories.is_empty() {
        return Ok(None);
    }

    println!("Available categories:");
    for category in &categories {
        println!("  {}: {}", category.id(), category.name());
    }

    let input = prompt("Enter category ID or press Enter to skip: ")?;
    if input.is_empty() {
        return Ok(None);
    }

    Ok(Some(input.parse()?))
}

fn list_transactions(state: &SqliteAppState, session: &Session) -> CliResult {
    let transactions = state
        .transaction_store
        .get_query(TransactionQuery::default(), session)?;

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    println!(
        "{:<5} {:<8} {:>10} {:<12} {:<30} {}",
        "ID", "Kind", "Amount", "Date", "Description", "Category ID"
    );
    println!("{}", "-".repeat(80));

    for transaction in &transactions {
        println!(
            "{:<5} {:<8} {:>10.2} {:<12} {:<30} {}",
            transaction.id(),
            transaction.kind().as_str(),
            transaction.amount(),
            transaction.date().to_string(),
            truncate(transaction.description(), 30),
            transaction
                .category_id()
                .map_or("-".to_string(), |id| id.to_string()),
        );
    }

    Ok(())
}

fn update_transaction(state: &mut SqliteAppState, session: &Session) -> CliResult {
    let id: DatabaseID = prompt("Enter transaction ID: ")?.parse()?;

    let amount_input = prompt("New amount or press Enter to keep: ")?;
    let amount = if amount_input.is_empty() {
        None
    } else {
        Some(amount_input.parse()?)
    };

    let description_input = prompt("New description or press Enter to keep: ")?;
    let description = (!description_input.is_empty()).then_some(description_input);

    let changes = TransactionUpdate {
        amount,
        description,
    };

    if changes.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    state.transaction_store.update(id, changes, session)?;
    println!("Transaction updated!");

    Ok(())
}

fn delete_transaction(state: &mut SqliteAppState, session: &Session) -> CliResult {
    let id: DatabaseID = prompt("Enter transaction ID: ")?.parse()?;

    state.transaction_store.delete(id, session)?;
    println!("Transaction deleted!");

    Ok(())
}

fn add_category(state: &mut SqliteAppState, session: &Session) -> CliResult {
    let name = CategoryName::new(&prompt("Enter name: ")?)?;
    let kind: Kind = prompt("Enter kind (INCOME/EXPENSE): ")?.parse()?;

    state.category_store.create(name, kind, session)?;
    println!("Category added!");

    Ok(())
}

fn list_categories(state: &SqliteAppState, session: &Session) -> CliResult {
    let categories = state.category_store.get_all(None, session)?;

    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    println!("{:<5} {:<8} {}", "ID", "Kind", "Name");
    println!("{}", "-".repeat(40));

    for category in &categories {
        println!(
            "{:<5} {:<8} {}",
            category.id(),
            category.kind().as_str(),
            category.name(),
        );
    }

    Ok(())
}

fn delete_category(state: &mut SqliteAppState, session: &Session) -> CliResult {
    let id: DatabaseID = prompt("Enter category ID: ")?.parse()?;

    state.category_store.delete(id, session)?;
    println!("Category deleted! Its transactions are now uncategorised.");

    Ok(())
}

fn add_goal(state: &mut SqliteAppState, session: &Session) -> CliResult {
    let name = prompt("Enter goal name: ")?;
    let target_amount: f64 = prompt("Enter target amount: ")?.parse()?;
    let target_date = Date::parse(&prompt("Enter target date (YYYY-MM-DD): ")?, DATE_FORMAT)?;

    let new_goal = NewGoal::new(name, target_amount, target_date)?;
    state.goal_store.create(new_goal, session)?;

    println!("Goal added!");

    Ok(())
}

fn list_goals(state: &SqliteAppState, session: &Session) -> CliResult {
    let goals = state.goal_store.get_all(session)?;

    if goals.is_empty() {
        println!("No goals found.");
        return Ok(());
    }

    println!(
        "{:<5} {:<20} {:>12} {:>12} {}",
        "ID", "Name", "Target", "Saved", "Target date"
    );
    println!("{}", "-".repeat(66));

    for goal in &goals {
        println!(
            "{:<5} {:<20} {:>12.2} {:>12.2} {}",
            goal.id(),
            truncate(goal.name(), 20),
            goal.target_amount(),
            goal.current_amount(),
            goal.target_date(),
        );
    }

    Ok(())
}

fn show_monthly_summary(state: &SqliteAppState, session: &Session) -> CliResult {
    let summary = analytics::monthly_summary(&state.transaction_store, session, 6)?;

    if summary.is_empty() {
        println!("No transactions in the last 6 months.");
        return Ok(());
    }

    println!(
        "{:<8} {:>12} {:>12} {:>12}",
        "Month", "Income", "Expense", "Balance"
    );
    println!("{}", "-".repeat(48));

    for (month, totals) in summary.iter().rev() {
        println!(
            "{:<8} {:>12.2} {:>12.2} {:>12.2}",
            month, totals.income, totals.expense, totals.balance
        );
    }

    Ok(())
}

fn show_expenses_by_category(state: &SqliteAppState, session: &Session) -> CliResult {
    let breakdown = analytics::expenses_by_category(
        &state.transaction_store,
        &state.category_store,
        session,
        None,
    )?;

    if breakdown.is_empty() {
        println!("No categorised expenses this month.");
        return Ok(());
    }

    println!("=== Expenses this month ===");
    for entry in &breakdown {
        println!("{:<20} {:>12.2}", entry.category, entry.total);
    }

    Ok(())
}

fn show_financial_health(state: &SqliteAppState, session: &Session) -> CliResult {
    let health = analytics::financial_health(&state.transaction_store, session)?;

    println!("=== Financial Health ===");
    println!("Total income:  ${:.2}", health.total_income);
    println!("Total expense: ${:.2}", health.total_expense);
    println!("Balance:       ${:.2}", health.balance);
    println!("Savings rate:  {:.2}%", health.savings_rate);

    Ok(())
}

fn show_monthly_report(state: &SqliteAppState, session: &Session) -> CliResult {
    let year: i32 = prompt("Enter year (e.g., 2024): ")?.parse()?;
    let month = Month::try_from(prompt("Enter month (1-12): ")?.parse::<u8>()?)?;

    let start = Date::from_calendar_date(year, month, 1)?;
    let end = start.replace_day(month.length(year))?;

    let transactions = state.transaction_store.get_query(
        TransactionQuery {
            date_range: Some(start..=end),
            ..Default::default()
        },
        session,
    )?;

    println!("=== Transactions for {year}-{:02} ===", u8::from(month));

    if transactions.is_empty() {
        println!("No transactions for this period.");
        return Ok(());
    }

    let mut total_income = 0.0;
    let mut total_expense = 0.0;

    for transaction in &transactions {
        println!(
            "{:<8} {:>10.2} {:<12} {}",
            transaction.kind().as_str(),
            transaction.amount(),
            transaction.date().to_string(),
            truncate(transaction.description(), 30),
        );

        match transaction.kind() {
            Kind::Income => total_income += transaction.amount(),
            Kind::Expense => total_expense += transaction.amount(),
        }
    }

    println!("\n=== Summary ===");
    println!("Total Income: ${total_income:.2}");
    println!("Total Expense: ${total_expense:.2}");
    println!("Balance: ${:.2}", total_income - total_expense);

    if let Some(ratio) = analytics::expense_ratio(&state.transaction_store, session, year, month)? {
        println!("Expense to Income Ratio: {:.2}%", ratio.ratio);

        match ratio.assessment {
            Some(SpendingAssessment::HighSpending) => {
                println!("Warning: Your expenses are more than 80% of your income!");
                println!("Suggestion: Try to reduce non-essential expenses.");
            }
            Some(SpendingAssessment::HealthySavings) => {
                println!("Good: You're saving more than half of your income!");
            }
            None => {}
        }
    }

    Ok(())
}

fn show_savings_forecast() -> CliResult {
    let monthly_income: f64 = prompt("Enter your average monthly income: ")?.parse()?;
    let monthly_expense: f64 = prompt("Enter your average monthly expenses: ")?.parse()?;
    let months: u32 = prompt("Enter number of months to forecast: ")?.parse()?;

    let forecast = analytics::savings_forecast(monthly_income, monthly_expense, months);

    println!("Monthly savings: ${:.2}", forecast.monthly_savings);
    println!(
        "After {months} months you could save: ${:.2}",
        forecast.total_projected
    );

    if let Some(reduction) = forecast.required_reduction {
        println!("Warning: You're spending more than you earn!");
        println!("You need to reduce expenses by ${reduction:.2} per month");
    }

    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    Ok(line.trim().to_string())
}

fn prompt_date(label: &str) -> Result<Date, Box<dyn std::error::Error>> {
    let input = prompt(label)?;

    if input.is_empty() {
        return Ok(OffsetDateTime::now_utc().date());
    }

    Ok(Date::parse(&input, DATE_FORMAT)?)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

//! Read-only reporting over a user's ledger.
//!
//! Every function here goes through the store traits and never mutates
//! anything; given the same ledger contents the outputs are the same. The one
//! exception to reading the ledger is [savings_forecast], which is a plain
//! calculator over caller-supplied figures.

use std::collections::{BTreeMap, HashMap};

use time::{Date, Month, OffsetDateTime};

use crate::{
    Error, Session,
    models::{DatabaseID, Kind, Transaction},
    stores::{CategoryStore, TransactionQuery, TransactionStore},
};

/// The income and expense totals for one calendar month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTotals {
    /// Sum of the month's income amounts.
    pub income: f64,
    /// Sum of the month's expense amounts.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// The total spent against one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The summed expense amounts.
    pub total: f64,
}

/// Whole-history totals and savings rate for a user.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialHealth {
    /// Sum of every income amount the user ever recorded.
    pub total_income: f64,
    /// Sum of every expense amount the user ever recorded.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
    /// `balance / total_income * 100`, or zero when there is no income.
    pub savings_rate: f64,
}

/// How a month's expense-to-income ratio should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendingAssessment {
    /// Expenses are more than 80% of income.
    HighSpending,
    /// More than half of the month's income was saved.
    HealthySavings,
}

/// A month's expense-to-income ratio and its assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRatio {
    /// `expense / income * 100`.
    pub ratio: f64,
    /// Set only when the ratio crosses one of the comment thresholds.
    pub assessment: Option<SpendingAssessment>,
}

/// A linear projection of savings over a number of months.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsForecast {
    /// `monthly_income - monthly_expense`.
    pub monthly_savings: f64,
    /// `monthly_savings * months`.
    pub total_projected: f64,
    /// When spending exceeds income, the monthly expense reduction needed to
    /// break even.
    pub required_reduction: Option<f64>,
}

/// Summarise the trailing `months_back` calendar months of activity, the
/// current month included.
///
/// Keys are `YYYY-MM` strings. Months without any transactions are omitted
/// rather than zero-filled. A `months_back` of zero is treated as one: the
/// current month alone.
///
/// # Errors
/// Returns [Error::StorageUnavailable] if the underlying store fails.
pub fn monthly_summary<T: TransactionStore>(
    transactions: &T,
    session: &Session,
    months_back: u32,
) -> Result<BTreeMap<String, MonthlyTotals>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let start = trailing_months_start(today, months_back);
    let end = end_of_month(today);

    let entries = transactions.get_query(
        TransactionQuery {
            date_range: Some(start..=end),
            ..Default::default()
        },
        session,
    )?;

    Ok(summarise_by_month(&entries))
}

/// Break down expense totals by category, biggest first.
///
/// Covers expense transactions from `period_start` (default: the first day of
/// the current month) through today. Transactions without a category are left
/// out of this view; they still count towards the totals in
/// [financial_health].
///
/// # Errors
/// Returns [Error::StorageUnavailable] if the underlying store fails.
pub fn expenses_by_category<T, C>(
    transactions: &T,
    categories: &C,
    session: &Session,
    period_start: Option<Date>,
) -> Result<Vec<CategoryTotal>, Error>
where
    T: TransactionStore,
    C: CategoryStore,
{
    let today = OffsetDateTime::now_utc().date();
    let start = period_start.unwrap_or_else(|| today.replace_day(1).unwrap());

    let entries = transactions.get_query(
        TransactionQuery {
            date_range: Some(start..=today),
            ..Default::default()
        },
        session,
    )?;

    let mut totals_by_category: BTreeMap<DatabaseID, f64> = BTreeMap::new();

    for transaction in &entries {
        if transaction.kind() != Kind::Expense {
            continue;
        }

        if let Some(category_id) = transaction.category_id() {
            *totals_by_category.entry(category_id).or_insert(0.0) += transaction.amount();
        }
    }

    let names: HashMap<DatabaseID, String> = categories
        .get_all(None, session)?
        .into_iter()
        .map(|category| (category.id(), category.name().to_string()))
        .collect();

    let mut breakdown: Vec<CategoryTotal> = totals_by_category
        .into_iter()
        .filter_map(|(category_id, total)| {
            names.get(&category_id).map(|name| CategoryTotal {
                category: name.clone(),
                total,
            })
        })
        .collect();

    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));

    Ok(breakdown)
}

/// Totals and savings rate over the user's entire transaction history.
///
/// # Errors
/// Returns [Error::StorageUnavailable] if the underlying store fails.
pub fn financial_health<T: TransactionStore>(
    transactions: &T,
    session: &Session,
) -> Result<FinancialHealth, Error> {
    let entries = transactions.get_query(TransactionQuery::default(), session)?;
    let (total_income, total_expense) = sum_by_kind(&entries);

    let balance = total_income - total_expense;
    let savings_rate = if total_income > 0.0 {
        balance / total_income * 100.0
    } else {
        0.0
    };

    Ok(FinancialHealth {
        total_income,
        total_expense,
        balance,
        savings_rate,
    })
}

/// The expense-to-income ratio for one calendar month.
///
/// Returns `None` unless the month has both income and expenses; a month with
/// only one side of the ledger has no meaningful ratio.
///
/// # Errors
/// Returns [Error::StorageUnavailable] if the underlying store fails.
pub fn expense_ratio<T: TransactionStore>(
    transactions: &T,
    session: &Session,
    year: i32,
    month: Month,
) -> Result<Option<ExpenseRatio>, Error> {
    let Ok(start) = Date::from_calendar_date(year, month, 1) else {
        return Ok(None);
    };
    let end = end_of_month(start);

    let entries = transactions.get_query(
        TransactionQuery {
            date_range: Some(start..=end),
            ..Default::default()
        },
        session,
    )?;

    let (income, expense) = sum_by_kind(&entries);

    if income <= 0.0 || expense <= 0.0 {
        return Ok(None);
    }

    let ratio = expense / income * 100.0;
    let assessment = if ratio > 80.0 {
        Some(SpendingAssessment::HighSpending)
    } else if ratio < 50.0 {
        Some(SpendingAssessment::HealthySavings)
    } else {
        None
    };

    Ok(Some(ExpenseRatio { ratio, assessment }))
}

/// Project savings over `months` from caller-supplied monthly figures.
///
/// A plain linear extrapolation with no compounding and no variance; the
/// ledger is never read. Negative monthly savings produce a
/// `required_reduction` equal to the shortfall.
pub fn savings_forecast(monthly_income: f64, monthly_expense: f64, months: u32) -> SavingsForecast {
    let monthly_savings = monthly_income - monthly_expense;
    let total_projected = monthly_savings * f64::from(months);
    let required_reduction = (monthly_savings < 0.0).then(|| monthly_savings.abs());

    SavingsForecast {
        monthly_savings,
        total_projected,
        required_reduction,
    }
}

fn summarise_by_month(transactions: &[Transaction]) -> BTreeMap<String, MonthlyTotals> {
    let mut months: BTreeMap<String, MonthlyTotals> = BTreeMap::new();

    for transaction in transactions {
        let totals = months.entry(month_key(transaction.date())).or_default();

        match transaction.kind() {
            Kind::Income => totals.income += transaction.amount(),
            Kind::Expense => totals.expense += transaction.amount(),
        }
    }

    for totals in months.values_mut() {
        totals.balance = totals.income - totals.expense;
    }

    months
}

fn sum_by_kind(transactions: &[Transaction]) -> (f64, f64) {
    let mut income = 0.0;
    let mut expense = 0.0;

    for transaction in transactions {
        match transaction.kind() {
            Kind::Income => income += transaction.amount(),
            Kind::Expense => expense += transaction.amount(),
        }
    }

    (income, expense)
}

fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

/// The first day of the month `months_back - 1` months before `today`'s month.
fn trailing_months_start(today: Date, months_back: u32) -> Date {
    let back = months_back.saturating_sub(1) as i32;
    let mut year = today.year();
    let mut month = i32::from(u8::from(today.month())) - back;

    while month < 1 {
        month += 12;
        year -= 1;
    }

    Date::from_calendar_date(year, Month::try_from(month as u8).unwrap(), 1).unwrap()
}

fn end_of_month(date: Date) -> Date {
    date.replace_day(date.month().length(date.year())).unwrap()
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::models::{Kind, Transaction, UserID};

    use super::{end_of_month, month_key, summarise_by_month, trailing_months_start};

    fn transaction(kind: Kind, amount: f64, date: time::Date) -> Transaction {
        Transaction::new_unchecked(1, kind, amount, date, String::new(), None, UserID::new(1))
    }

    #[test]
    fn summarise_groups_by_calendar_month() {
        let transactions = vec![
            transaction(Kind::Income, 1000.0, date!(2024 - 01 - 15)),
            transaction(Kind::Expense, 300.0, date!(2024 - 01 - 20)),
            transaction(Kind::Expense, 30.0, date!(2024 - 02 - 10)),
        ];

        let summary = summarise_by_month(&transactions);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary["2024-01"].income, 1000.0);
        assert_eq!(summary["2024-01"].expense, 300.0);
        assert_eq!(summary["2024-01"].balance, 700.0);
        assert_eq!(summary["2024-02"].balance, -30.0);
    }

    #[test]
    fn summarise_handles_empty_input() {
        let summary = summarise_by_month(&[]);

        assert!(summary.is_empty());
    }

    #[test]
    fn balance_equals_income_minus_expense_for_every_month() {
        let transactions = vec![
            transaction(Kind::Income, 1234.56, date!(2024 - 03 - 01)),
            transaction(Kind::Expense, 234.56, date!(2024 - 03 - 31)),
            transaction(Kind::Income, 50.0, date!(2024 - 04 - 02)),
        ];

        for totals in summarise_by_month(&transactions).values() {
            assert_eq!(totals.balance, totals.income - totals.expense);
        }
    }

    #[test]
    fn month_key_pads_the_month_number() {
        assert_eq!(month_key(date!(2024 - 01 - 31)), "2024-01");
        assert_eq!(month_key(date!(2024 - 12 - 01)), "2024-12");
    }

    #[test]
    fn trailing_months_start_stays_within_the_year() {
        assert_eq!(
            trailing_months_start(date!(2024 - 08 - 15), 6),
            date!(2024 - 03 - 01)
        );
    }

    #[test]
    fn trailing_months_start_crosses_year_boundaries() {
        assert_eq!(
            trailing_months_start(date!(2024 - 02 - 29), 6),
            date!(2023 - 09 - 01)
        );
        assert_eq!(
            trailing_months_start(date!(2024 - 01 - 01), 13),
            date!(2023 - 01 - 01)
        );
    }

    #[test]
    fn trailing_months_start_of_zero_means_the_current_month() {
        assert_eq!(
            trailing_months_start(date!(2024 - 08 - 15), 0),
            date!(2024 - 08 - 01)
        );
    }

    #[test]
    fn end_of_month_handles_leap_years() {
        assert_eq!(end_of_month(date!(2024 - 02 - 10)), date!(2024 - 02 - 29));
        assert_eq!(end_of_month(date!(2023 - 02 - 10)), date!(2023 - 02 - 28));
    }
}

#[cfg(test)]
mod analytics_tests {
    use rusqlite::Connection;
    use time::{Month, OffsetDateTime, macros::date};

    use crate::{
        Session,
        models::{CategoryName, Kind, NewTransaction, PasswordHash},
        stores::{
            CategoryStore, TransactionStore, UserStore,
            sqlite::{SqliteAppState, create_app_state},
        },
    };

    use super::{
        SpendingAssessment, expense_ratio, expenses_by_category, financial_health,
        monthly_summary, savings_forecast,
    };

    fn get_app_state() -> SqliteAppState {
        let connection = Connection::open_in_memory().unwrap();
        create_app_state(connection).unwrap()
    }

    fn create_test_session(state: &mut SqliteAppState, username: &str) -> Session {
        let user = state
            .user_store
            .create(username, PasswordHash::new_unchecked("hunter2"), None)
            .unwrap();

        Session::new(user.id(), username)
    }

    fn insert(
        state: &mut SqliteAppState,
        session: &Session,
        kind: Kind,
        amount: f64,
        date: time::Date,
    ) {
        state
            .transaction_store
            .create(
                NewTransaction::new(kind, amount, date, "", None).unwrap(),
                session,
            )
            .unwrap();
    }

    #[test]
    fn monthly_summary_only_contains_months_with_activity() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");
        let today = OffsetDateTime::now_utc().date();

        insert(&mut state, &session, Kind::Income, 1000.0, today);
        insert(&mut state, &session, Kind::Expense, 250.0, today);
        // Far outside the trailing window, must not appear.
        insert(&mut state, &session, Kind::Expense, 99.0, date!(2000 - 01 - 01));

        let summary = monthly_summary(&state.transaction_store, &session, 6).unwrap();

        let current_key = format!("{:04}-{:02}", today.year(), u8::from(today.month()));
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[&current_key].income, 1000.0);
        assert_eq!(summary[&current_key].expense, 250.0);
        assert_eq!(summary[&current_key].balance, 750.0);
    }

    #[test]
    fn expenses_by_category_sorts_descending_and_skips_uncategorised() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        let food = state
            .category_store
            .create(CategoryName::new_unchecked("Food"), Kind::Expense, &session)
            .unwrap();
        let transport = state
            .category_store
            .create(
                CategoryName::new_unchecked("Transport"),
                Kind::Expense,
                &session,
            )
            .unwrap();

        let day = date!(2024 - 06 - 15);
        for (amount, category_id) in [
            (30.0, Some(food.id())),
            (20.0, Some(food.id())),
            (70.0, Some(transport.id())),
            (999.0, None),
        ] {
            state
                .transaction_store
                .create(
                    NewTransaction::new(Kind::Expense, amount, day, "", category_id).unwrap(),
                    &session,
                )
                .unwrap();
        }

        // Income in the same period must not show up in an expense breakdown.
        insert(&mut state, &session, Kind::Income, 5000.0, day);

        let breakdown = expenses_by_category(
            &state.transaction_store,
            &state.category_store,
            &session,
            Some(date!(2024 - 06 - 01)),
        )
        .unwrap();

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Transport");
        assert_eq!(breakdown[0].total, 70.0);
        assert_eq!(breakdown[1].category, "Food");
        assert_eq!(breakdown[1].total, 50.0);
    }

    #[test]
    fn financial_health_with_no_income_has_zero_savings_rate() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        insert(
            &mut state,
            &session,
            Kind::Expense,
            100.0,
            date!(2024 - 06 - 15),
        );

        let health = financial_health(&state.transaction_store, &session).unwrap();

        assert_eq!(health.total_income, 0.0);
        assert_eq!(health.total_expense, 100.0);
        assert_eq!(health.balance, -100.0);
        assert_eq!(health.savings_rate, 0.0);
    }

    #[test]
    fn financial_health_computes_savings_rate() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        insert(
            &mut state,
            &session,
            Kind::Income,
            2000.0,
            date!(2024 - 06 - 01),
        );
        insert(
            &mut state,
            &session,
            Kind::Expense,
            500.0,
            date!(2024 - 06 - 15),
        );

        let health = financial_health(&state.transaction_store, &session).unwrap();

        assert_eq!(health.balance, 1500.0);
        assert_eq!(health.savings_rate, 75.0);
    }

    #[test]
    fn expense_ratio_requires_both_totals() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        insert(
            &mut state,
            &session,
            Kind::Income,
            2000.0,
            date!(2024 - 06 - 01),
        );

        let ratio = expense_ratio(&state.transaction_store, &session, 2024, Month::June).unwrap();

        assert_eq!(ratio, None);
    }

    #[test]
    fn expense_ratio_flags_high_spending() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        insert(
            &mut state,
            &session,
            Kind::Income,
            1000.0,
            date!(2024 - 06 - 01),
        );
        insert(
            &mut state,
            &session,
            Kind::Expense,
            900.0,
            date!(2024 - 06 - 15),
        );

        let ratio = expense_ratio(&state.transaction_store, &session, 2024, Month::June)
            .unwrap()
            .unwrap();

        assert_eq!(ratio.ratio, 90.0);
        assert_eq!(ratio.assessment, Some(SpendingAssessment::HighSpending));
    }

    #[test]
    fn expense_ratio_flags_healthy_savings() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        insert(
            &mut state,
            &session,
            Kind::Income,
            1000.0,
            date!(2024 - 06 - 01),
        );
        insert(
            &mut state,
            &session,
            Kind::Expense,
            400.0,
            date!(2024 - 06 - 15),
        );

        let ratio = expense_ratio(&state.transaction_store, &session, 2024, Month::June)
            .unwrap()
            .unwrap();

        assert_eq!(ratio.ratio, 40.0);
        assert_eq!(ratio.assessment, Some(SpendingAssessment::HealthySavings));
    }

    #[test]
    fn expense_ratio_in_the_middle_has_no_assessment() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        insert(
            &mut state,
            &session,
            Kind::Income,
            1000.0,
            date!(2024 - 06 - 01),
        );
        insert(
            &mut state,
            &session,
            Kind::Expense,
            600.0,
            date!(2024 - 06 - 15),
        );

        let ratio = expense_ratio(&state.transaction_store, &session, 2024, Month::June)
            .unwrap()
            .unwrap();

        assert_eq!(ratio.ratio, 60.0);
        assert_eq!(ratio.assessment, None);
    }

    #[test]
    fn expense_ratio_ignores_other_months() {
        let mut state = get_app_state();
        let session = create_test_session(&mut state, "alice");

        insert(
            &mut state,
            &session,
            Kind::Income,
            1000.0,
            date!(2024 - 05 - 31),
        );
        insert(
            &mut state,
            &session,
            Kind::Expense,
            600.0,
            date!(2024 - 07 - 01),
        );

        let ratio = expense_ratio(&state.transaction_store, &session, 2024, Month::June).unwrap();

        assert_eq!(ratio, None);
    }

    #[test]
    fn savings_forecast_projects_linearly() {
        let forecast = savings_forecast(2000.0, 1500.0, 6);

        assert_eq!(forecast.monthly_savings, 500.0);
        assert_eq!(forecast.total_projected, 3000.0);
        assert_eq!(forecast.required_reduction, None);
    }

    #[test]
    fn savings_forecast_warns_when_overspending() {
        let forecast = savings_forecast(1000.0, 1200.0, 3);

        assert_eq!(forecast.monthly_savings, -200.0);
        assert_eq!(forecast.total_projected, -600.0);
        assert_eq!(forecast.required_reduction, Some(200.0));
    }
}

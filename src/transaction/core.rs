//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    amount::Amount,
    auth::UserID,
    database_id::{PaymentMethodId, RowsAffected, TransactionId},
    payment_method::get_payment_method,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// What a transaction was for.
///
/// Some categories only make sense for one transaction type, see
/// [Category::is_valid_for].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Income from a job.
    Earned,
    /// Income that takes little effort, e.g. rent from a property.
    Passive,
    /// Investment income, e.g. dividends.
    #[serde(alias = "porftolio")]
    Portfolio,
    /// Movies, concerts and the like.
    Entertainment,
    /// Car costs.
    Vehicle,
    /// Rent, mortgage payments and bills.
    Housing,
    /// Public transport, taxis.
    Transportation,
    /// Shopping.
    Shopping,
    /// Fees, interest and insurance.
    Financial,
    /// Eating out.
    Food,
    /// Groceries.
    Groceries,
    /// Fuel.
    Gas,
    /// Anything else.
    Other,
}

impl Category {
    fn as_str(&self) -> &'static str {
        match self {
            Category::Earned => "earned",
            Category::Passive => "passive",
            Category::Portfolio => "portfolio",
            Category::Entertainment => "entertainment",
            Category::Vehicle => "vehicle",
            Category::Housing => "housing",
            Category::Transportation => "transportation",
            Category::Shopping => "shopping",
            Category::Financial => "financial",
            Category::Food => "food",
            Category::Groceries => "groceries",
            Category::Gas => "gas",
            Category::Other => "other",
        }
    }

    /// Whether a transaction of `transaction_type` can use this category.
    pub fn is_valid_for(&self, transaction_type: TransactionType) -> bool {
        match self {
            Category::Other => true,
            Category::Earned | Category::Passive | Category::Portfolio => {
                transaction_type == TransactionType::Income
            }
            _ => transaction_type == TransactionType::Expense,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "earned" => Ok(Category::Earned),
            "passive" => Ok(Category::Passive),
            "portfolio" => Ok(Category::Portfolio),
            "entertainment" => Ok(Category::Entertainment),
            "vehicle" => Ok(Category::Vehicle),
            "housing" => Ok(Category::Housing),
            "transportation" => Ok(Category::Transportation),
            "shopping" => Ok(Category::Shopping),
            "financial" => Ok(Category::Financial),
            "food" => Ok(Category::Food),
            "groceries" => Ok(Category::Groceries),
            "gas" => Ok(Category::Gas),
            "other" => Ok(Category::Other),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// How often a transaction recurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatInterval {
    /// A one-off transaction.
    #[default]
    None,
    /// Every week.
    Weekly,
    /// Every month.
    Monthly,
    /// Every year.
    Yearly,
}

impl RepeatInterval {
    fn as_str(&self) -> &'static str {
        match self {
            RepeatInterval::None => "none",
            RepeatInterval::Weekly => "weekly",
            RepeatInterval::Monthly => "monthly",
            RepeatInterval::Yearly => "yearly",
        }
    }
}

impl ToSql for RepeatInterval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RepeatInterval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "none" => Ok(RepeatInterval::None),
            "weekly" => Ok(RepeatInterval::Weekly),
            "monthly" => Ok(RepeatInterval::Monthly),
            "yearly" => Ok(RepeatInterval::Yearly),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,
    /// What the transaction was for.
    pub category: Category,
    /// The payment method the money went through, if any.
    pub payment_method_id: Option<PaymentMethodId>,
    /// The amount of money spent or earned, always non-negative.
    pub amount: Amount,
    /// The day the transaction was recorded.
    pub date: Date,
    /// How often the transaction recurs.
    pub repeat_interval: RepeatInterval,
}

/// The editable fields of a transaction, used for both creating and editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,
    /// What the transaction was for.
    pub category: Category,
    /// The payment method the money went through, if any.
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
    /// The amount of money spent or earned.
    pub amount: Amount,
    /// How often the transaction recurs, defaults to never.
    #[serde(default)]
    pub repeat_interval: RepeatInterval,
}

/// A calendar month that has at least one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMonth {
    /// The year, e.g. 2026.
    pub year: i32,
    /// The month number, 1 for January through to 12 for December.
    pub month: u8,
    /// A display label, e.g. "October 2026".
    pub label: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                payment_method_id INTEGER,
                transaction_type TEXT NOT NULL,
                category TEXT NOT NULL,
                amount INTEGER NOT NULL,
                date TEXT NOT NULL,
                repeat_interval TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(payment_method_id) REFERENCES payment_method(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Used by the monthly listings and the summary.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

const SELECT_COLUMNS: &str = "id, transaction_type, category, payment_method_id, amount, date, repeat_interval";

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        category: row.get(2)?,
        payment_method_id: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
        repeat_interval: row.get(6)?,
    })
}

/// Check the category fits the transaction type and that the payment method,
/// if any, belongs to `user_id`.
fn validate_new_transaction(
    user_id: UserID,
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    if !new_transaction
        .category
        .is_valid_for(new_transaction.transaction_type)
    {
        return Err(Error::InvalidCategory(
            new_transaction.category,
            new_transaction.transaction_type,
        ));
    }

    if let Some(payment_method_id) = new_transaction.payment_method_id {
        match get_payment_method(payment_method_id, user_id, connection) {
            Ok(_) => {}
            Err(Error::NotFound) => return Err(Error::InvalidPaymentMethod(payment_method_id)),
            Err(error) => return Err(error),
        }
    }

    Ok(())
}

/// Create a new transaction for `user_id` dated `date`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category cannot be used with the transaction type,
/// - [Error::InvalidPaymentMethod] if the payment method is not one of the user's,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: &NewTransaction,
    date: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_new_transaction(user_id, new_transaction, connection)?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (user_id, transaction_type, category, payment_method_id, amount, date, repeat_interval)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                new_transaction.transaction_type,
                new_transaction.category,
                new_transaction.payment_method_id,
                new_transaction.amount,
                date,
                new_transaction.repeat_interval,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve one of the user's transactions by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of `user_id`'s transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
        ))?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get all of the user's transactions, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions(user_id: UserID, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the first day of the month and the first day of the following month.
///
/// # Errors
/// Returns an [Error::InvalidMonth] if `year` and `month` do not form a valid month.
fn month_bounds(year: i32, month: u8) -> Result<(Date, Date), Error> {
    let month = Month::try_from(month).map_err(|_| Error::InvalidMonth)?;
    let start = Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidMonth)?;
    let end = match month {
        Month::December => Date::from_calendar_date(year + 1, Month::January, 1),
        month => Date::from_calendar_date(year, month.next(), 1),
    }
    .map_err(|_| Error::InvalidMonth)?;

    Ok((start, end))
}

/// Get the user's transactions dated in `month` of `year`, newest first.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidMonth] if `month` is not between 1 and 12 or `year` is out of range,
/// - or [Error::SqlError] there is some SQL error.
pub fn get_transactions_in_month(
    user_id: UserID,
    year: i32,
    month: u8,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (start, end) = month_bounds(year, month)?;

    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE user_id = ?1 AND date >= ?2 AND date < ?3
             ORDER BY date DESC, id DESC"
        ))?
        .query_map((user_id.as_i64(), start, end), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the distinct months in which the user has at least one transaction, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transaction_months(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<TransactionMonth>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT
                CAST(strftime('%Y', date) AS INTEGER) AS year,
                CAST(strftime('%m', date) AS INTEGER) AS month
             FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY year DESC, month DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            let year: i32 = row.get(0)?;
            let month_number: u8 = row.get(1)?;
            let month = Month::try_from(month_number)
                .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(1, month_number.into()))?;

            Ok(TransactionMonth {
                year,
                month: month_number,
                label: format!("{month} {year}"),
            })
        })?
        .map(|maybe_month| maybe_month.map_err(Error::from))
        .collect()
}

/// Replace the type, category, payment method, amount and repeat interval
/// of one of the user's transactions. The date is left unchanged.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to one of `user_id`'s transactions,
/// - [Error::InvalidCategory] if the category cannot be used with the transaction type,
/// - [Error::InvalidPaymentMethod] if the payment method is not one of the user's,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    match get_transaction(id, user_id, connection) {
        Ok(_) => {}
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    }

    validate_new_transaction(user_id, new_transaction, connection)?;

    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET transaction_type = ?1,
                 category = ?2,
                 payment_method_id = ?3,
                 amount = ?4,
                 repeat_interval = ?5
             WHERE id = ?6 AND user_id = ?7
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.transaction_type,
                new_transaction.category,
                new_transaction.payment_method_id,
                new_transaction.amount,
                new_transaction.repeat_interval,
                id,
                user_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// Delete one of the user's transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            &[(":id", &id), (":user_id", &user_id.as_i64())],
        )
        .map_err(Error::from)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        amount::Amount,
        auth::delete_user,
        payment_method::{
            CardProcessor, MethodType, NewPaymentMethod, create_payment_method,
            get_payment_methods,
        },
        test_utils::{get_test_connection, must_create_test_user},
        transaction::core::{
            Category, NewTransaction, RepeatInterval, TransactionMonth, TransactionType,
            create_transaction, delete_transaction, get_transaction, get_transaction_months,
            get_transactions, get_transactions_in_month, update_transaction,
        },
    };

    fn groceries(amount: Amount) -> NewTransaction {
        NewTransaction {
            transaction_type: TransactionType::Expense,
            category: Category::Groceries,
            payment_method_id: None,
            amount,
            repeat_interval: RepeatInterval::None,
        }
    }

    #[test]
    fn create_transaction_succeeds() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let cash = get_payment_methods(user.id, &connection).unwrap().remove(0);
        let new_transaction = NewTransaction {
            payment_method_id: Some(cash.id),
            ..groceries(Amount::new(dec!(12.34)).unwrap())
        };

        let transaction =
            create_transaction(user.id, &new_transaction, date!(2026 - 10 - 14), &connection)
                .unwrap();

        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.category, Category::Groceries);
        assert_eq!(transaction.payment_method_id, Some(cash.id));
        assert_eq!(transaction.amount, Amount::new(dec!(12.34)).unwrap());
        assert_eq!(transaction.date, date!(2026 - 10 - 14));
        assert_eq!(
            get_transaction(transaction.id, user.id, &connection),
            Ok(transaction)
        );
    }

    #[test]
    fn create_transaction_fails_on_mismatched_category() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let new_transaction = NewTransaction {
            transaction_type: TransactionType::Income,
            ..groceries(Amount::ZERO)
        };

        let result =
            create_transaction(user.id, &new_transaction, date!(2026 - 10 - 14), &connection);

        assert_eq!(
            result,
            Err(Error::InvalidCategory(
                Category::Groceries,
                TransactionType::Income
            ))
        );
    }

    #[test]
    fn other_category_is_valid_for_both_types() {
        assert!(Category::Other.is_valid_for(TransactionType::Income));
        assert!(Category::Other.is_valid_for(TransactionType::Expense));
        assert!(!Category::Earned.is_valid_for(TransactionType::Expense));
        assert!(!Category::Housing.is_valid_for(TransactionType::Income));
    }

    #[test]
    fn portfolio_category_accepts_misspelling() {
        let category: Category = serde_json::from_str("\"porftolio\"").unwrap();

        assert_eq!(category, Category::Portfolio);
    }

    #[test]
    fn create_transaction_fails_on_other_users_payment_method() {
        let connection = get_test_connection();
        let alice = must_create_test_user("alice", &connection);
        let bob = must_create_test_user("bob", &connection);
        let bobs_cash = get_payment_methods(bob.id, &connection).unwrap().remove(0);
        let new_transaction = NewTransaction {
            payment_method_id: Some(bobs_cash.id),
            ..groceries(Amount::ZERO)
        };

        let result =
            create_transaction(alice.id, &new_transaction, date!(2026 - 10 - 14), &connection);

        assert_eq!(result, Err(Error::InvalidPaymentMethod(bobs_cash.id)));
    }

    #[test]
    fn get_transactions_returns_newest_first() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let new_transaction = groceries(Amount::ZERO);
        let oldest =
            create_transaction(user.id, &new_transaction, date!(2026 - 08 - 01), &connection)
                .unwrap();
        let newest =
            create_transaction(user.id, &new_transaction, date!(2026 - 10 - 01), &connection)
                .unwrap();
        let middle =
            create_transaction(user.id, &new_transaction, date!(2026 - 09 - 01), &connection)
                .unwrap();

        let transactions = get_transactions(user.id, &connection).unwrap();

        assert_eq!(transactions, vec![newest, middle, oldest]);
    }

    #[test]
    fn get_transactions_in_month_filters_by_date_and_user() {
        let connection = get_test_connection();
        let alice = must_create_test_user("alice", &connection);
        let bob = must_create_test_user("bob", &connection);
        let new_transaction = groceries(Amount::ZERO);
        create_transaction(alice.id, &new_transaction, date!(2026 - 09 - 30), &connection)
            .unwrap();
        let first_day =
            create_transaction(alice.id, &new_transaction, date!(2026 - 10 - 01), &connection)
                .unwrap();
        let last_day =
            create_transaction(alice.id, &new_transaction, date!(2026 - 10 - 31), &connection)
                .unwrap();
        create_transaction(alice.id, &new_transaction, date!(2026 - 11 - 01), &connection)
            .unwrap();
        create_transaction(bob.id, &new_transaction, date!(2026 - 10 - 15), &connection).unwrap();

        let transactions = get_transactions_in_month(alice.id, 2026, 10, &connection).unwrap();

        assert_eq!(transactions, vec![last_day, first_day]);
    }

    #[test]
    fn get_transactions_in_december() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let transaction = create_transaction(
            user.id,
            &groceries(Amount::ZERO),
            date!(2025 - 12 - 31),
            &connection,
        )
        .unwrap();

        let transactions = get_transactions_in_month(user.id, 2025, 12, &connection).unwrap();

        assert_eq!(transactions, vec![transaction]);
    }

    #[test]
    fn get_transactions_in_month_fails_on_invalid_month() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);

        assert_eq!(
            get_transactions_in_month(user.id, 2026, 13, &connection),
            Err(Error::InvalidMonth)
        );
        assert_eq!(
            get_transactions_in_month(user.id, 2026, 0, &connection),
            Err(Error::InvalidMonth)
        );
    }

    #[test]
    fn get_transaction_months_returns_distinct_months() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let new_transaction = groceries(Amount::ZERO);
        for date in [
            date!(2025 - 12 - 24),
            date!(2026 - 10 - 01),
            date!(2026 - 10 - 14),
            date!(2026 - 02 - 28),
        ] {
            create_transaction(user.id, &new_transaction, date, &connection).unwrap();
        }

        let months = get_transaction_months(user.id, &connection).unwrap();

        assert_eq!(
            months,
            vec![
                TransactionMonth {
                    year: 2026,
                    month: 10,
                    label: "October 2026".to_owned()
                },
                TransactionMonth {
                    year: 2026,
                    month: 2,
                    label: "February 2026".to_owned()
                },
                TransactionMonth {
                    year: 2025,
                    month: 12,
                    label: "December 2025".to_owned()
                },
            ]
        );
    }

    #[test]
    fn update_transaction_keeps_date() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let transaction = create_transaction(
            user.id,
            &groceries(Amount::ZERO),
            date!(2026 - 10 - 01),
            &connection,
        )
        .unwrap();
        let replacement = NewTransaction {
            transaction_type: TransactionType::Income,
            category: Category::Earned,
            payment_method_id: None,
            amount: Amount::new(dec!(1000)).unwrap(),
            repeat_interval: RepeatInterval::Monthly,
        };

        let updated = update_transaction(transaction.id, user.id, &replacement, &connection)
            .unwrap();

        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.date, date!(2026 - 10 - 01));
        assert_eq!(updated.transaction_type, TransactionType::Income);
        assert_eq!(updated.category, Category::Earned);
        assert_eq!(updated.amount, Amount::new(dec!(1000)).unwrap());
        assert_eq!(updated.repeat_interval, RepeatInterval::Monthly);
    }

    #[test]
    fn update_other_users_transaction_fails() {
        let connection = get_test_connection();
        let alice = must_create_test_user("alice", &connection);
        let bob = must_create_test_user("bob", &connection);
        let transaction = create_transaction(
            alice.id,
            &groceries(Amount::ZERO),
            date!(2026 - 10 - 01),
            &connection,
        )
        .unwrap();

        let result = update_transaction(
            transaction.id,
            bob.id,
            &groceries(Amount::MAX),
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
        assert_eq!(
            get_transaction(transaction.id, alice.id, &connection),
            Ok(transaction)
        );
    }

    #[test]
    fn delete_transaction_succeeds() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let transaction = create_transaction(
            user.id,
            &groceries(Amount::ZERO),
            date!(2026 - 10 - 01),
            &connection,
        )
        .unwrap();

        assert_eq!(delete_transaction(transaction.id, user.id, &connection), Ok(1));
        assert_eq!(
            get_transaction(transaction.id, user.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(delete_transaction(transaction.id, user.id, &connection), Ok(0));
    }

    #[test]
    fn deleting_payment_method_clears_it_from_transactions() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let card = create_payment_method(
            user.id,
            &NewPaymentMethod {
                name: "Visa".to_owned(),
                method_type: MethodType::Credit,
                processor: CardProcessor::Visa,
            },
            &connection,
        )
        .unwrap();
        let transaction = create_transaction(
            user.id,
            &NewTransaction {
                payment_method_id: Some(card.id),
                ..groceries(Amount::ZERO)
            },
            date!(2026 - 10 - 01),
            &connection,
        )
        .unwrap();

        connection
            .execute("DELETE FROM payment_method WHERE id = ?1", [card.id])
            .unwrap();

        let transaction = get_transaction(transaction.id, user.id, &connection).unwrap();
        assert_eq!(transaction.payment_method_id, None);
    }

    #[test]
    fn deleting_user_deletes_their_transactions() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        create_transaction(
            user.id,
            &groceries(Amount::ZERO),
            date!(2026 - 10 - 01),
            &connection,
        )
        .unwrap();

        delete_user(user.id, &connection).unwrap();

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn transaction_serializes_amount_and_date_as_strings() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let transaction = create_transaction(
            user.id,
            &groceries(Amount::new(dec!(12.5)).unwrap()),
            date!(2026 - 10 - 01),
            &connection,
        )
        .unwrap();

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["amount"], "12.50");
        assert_eq!(json["date"], "2026-10-01");
        assert_eq!(json["transaction_type"], "expense");
        assert_eq!(json["repeat_interval"], "none");
    }
}

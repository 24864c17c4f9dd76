//! Aggregates a user's transactions into a monthly summary.
//!
//! Recurring expenses are normalized onto a monthly basis (a weekly expense
//! counts four times) and combined with the one-off expenses of the current
//! month. Payment method balances are calculated over all time.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Serialize, Serializer, ser::SerializeMap};
use time::Date;

use crate::{
    payment_method::PaymentMethod,
    transaction::{RepeatInterval, Transaction, TransactionType},
};

/// The number of weeks a weekly expense is counted for in a month.
const WEEKS_PER_MONTH: i64 = 4;

/// The financial summary of a single month.
///
/// Monetary values are exact decimals and serialize as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// Income minus all expenses for the month.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// The income dated in the month.
    #[serde(with = "rust_decimal::serde::float")]
    pub income_amount: Decimal,
    /// Fixed plus variable expenses.
    #[serde(with = "rust_decimal::serde::float")]
    pub expense_amount: Decimal,
    /// Weekly recurring expenses times four plus monthly recurring expenses.
    #[serde(with = "rust_decimal::serde::float")]
    pub fixed_expense_amount: Decimal,
    /// One-off expenses dated in the month.
    #[serde(with = "rust_decimal::serde::float")]
    pub variable_expense_amount: Decimal,
    /// Income minus expenses for each payment method over all time, keyed by
    /// payment method name.
    #[serde(serialize_with = "serialize_balances")]
    pub payment_method_balances: BTreeMap<String, Decimal>,
}

fn serialize_balances<S>(
    balances: &BTreeMap<String, Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(balances.len()))?;

    for (name, balance) in balances {
        map.serialize_entry(name, &balance.to_f64().unwrap_or_default())?;
    }

    map.end()
}

fn in_month(date: Date, reference_date: Date) -> bool {
    date.year() == reference_date.year() && date.month() == reference_date.month()
}

fn sum_where(transactions: &[Transaction], predicate: impl Fn(&Transaction) -> bool) -> Decimal {
    transactions
        .iter()
        .filter(|transaction| predicate(transaction))
        .map(|transaction| transaction.amount.as_decimal())
        .sum()
}

/// Compute the summary of the month containing `reference_date`.
///
/// `transactions` and `payment_methods` should all belong to the same user.
/// Yearly expenses count towards neither the fixed nor the variable expenses.
pub fn compute_summary(
    transactions: &[Transaction],
    payment_methods: &[PaymentMethod],
    reference_date: Date,
) -> SummaryReport {
    let income_amount = sum_where(transactions, |transaction| {
        transaction.transaction_type == TransactionType::Income
            && in_month(transaction.date, reference_date)
    });

    let recurring_expenses = |interval: RepeatInterval| {
        sum_where(transactions, |transaction| {
            transaction.transaction_type == TransactionType::Expense
                && transaction.repeat_interval == interval
        })
    };
    let weekly_base = recurring_expenses(RepeatInterval::Weekly);
    let monthly_base = recurring_expenses(RepeatInterval::Monthly);
    let fixed_expense_amount = weekly_base * Decimal::from(WEEKS_PER_MONTH) + monthly_base;

    let variable_expense_amount = sum_where(transactions, |transaction| {
        transaction.transaction_type == TransactionType::Expense
            && transaction.repeat_interval == RepeatInterval::None
            && in_month(transaction.date, reference_date)
    });

    let expense_amount = fixed_expense_amount + variable_expense_amount;

    let payment_method_balances = payment_methods
        .iter()
        .map(|payment_method| {
            let balance: Decimal = transactions
                .iter()
                .filter(|transaction| transaction.payment_method_id == Some(payment_method.id))
                .map(|transaction| match transaction.transaction_type {
                    TransactionType::Income => transaction.amount.as_decimal(),
                    TransactionType::Expense => -transaction.amount.as_decimal(),
                })
                .sum();

            (payment_method.name.clone(), balance)
        })
        .collect();

    SummaryReport {
        balance: income_amount - expense_amount,
        income_amount,
        expense_amount,
        fixed_expense_amount,
        variable_expense_amount,
        payment_method_balances,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, macros::date};

    use crate::{
        amount::Amount,
        payment_method::{CardProcessor, MethodType, PaymentMethod},
        summary::aggregation::compute_summary,
        transaction::{Category, RepeatInterval, Transaction, TransactionType},
    };

    const TODAY: Date = date!(2026 - 10 - 14);

    fn transaction(
        id: i64,
        transaction_type: TransactionType,
        amount: Decimal,
        date: Date,
        repeat_interval: RepeatInterval,
        payment_method_id: Option<i64>,
    ) -> Transaction {
        Transaction {
            id,
            transaction_type,
            category: Category::Other,
            payment_method_id,
            amount: Amount::new(amount).unwrap(),
            date,
            repeat_interval,
        }
    }

    fn expense(id: i64, amount: Decimal, date: Date, interval: RepeatInterval) -> Transaction {
        transaction(id, TransactionType::Expense, amount, date, interval, None)
    }

    fn income(id: i64, amount: Decimal, date: Date) -> Transaction {
        transaction(
            id,
            TransactionType::Income,
            amount,
            date,
            RepeatInterval::None,
            None,
        )
    }

    fn payment_method(id: i64, name: &str) -> PaymentMethod {
        PaymentMethod {
            id,
            name: name.to_owned(),
            method_type: MethodType::Credit,
            processor: CardProcessor::Visa,
        }
    }

    #[test]
    fn empty_input_gives_zero_summary() {
        let summary = compute_summary(&[], &[], TODAY);

        assert_eq!(summary.balance, Decimal::ZERO);
        assert_eq!(summary.income_amount, Decimal::ZERO);
        assert_eq!(summary.expense_amount, Decimal::ZERO);
        assert_eq!(summary.fixed_expense_amount, Decimal::ZERO);
        assert_eq!(summary.variable_expense_amount, Decimal::ZERO);
        assert!(summary.payment_method_balances.is_empty());
    }

    #[test]
    fn payment_method_without_transactions_has_zero_balance() {
        let summary = compute_summary(&[], &[payment_method(1, "Cash")], TODAY);

        assert_eq!(
            summary.payment_method_balances,
            BTreeMap::from([("Cash".to_owned(), Decimal::ZERO)])
        );
    }

    #[test]
    fn combines_fixed_and_variable_expenses() {
        let transactions = vec![
            expense(1, dec!(50), date!(2026 - 01 - 05), RepeatInterval::Weekly),
            expense(2, dec!(200), date!(2025 - 06 - 01), RepeatInterval::Monthly),
            expense(3, dec!(30), date!(2026 - 10 - 02), RepeatInterval::None),
            income(4, dec!(1000), date!(2026 - 10 - 01)),
        ];

        let summary = compute_summary(&transactions, &[], TODAY);

        assert_eq!(summary.fixed_expense_amount, dec!(400));
        assert_eq!(summary.variable_expense_amount, dec!(30));
        assert_eq!(summary.expense_amount, dec!(430));
        assert_eq!(summary.income_amount, dec!(1000));
        assert_eq!(summary.balance, dec!(570));
    }

    #[test]
    fn ignores_one_off_transactions_outside_the_month() {
        let transactions = vec![
            expense(1, dec!(30), date!(2026 - 09 - 30), RepeatInterval::None),
            expense(2, dec!(30), date!(2025 - 10 - 14), RepeatInterval::None),
            income(3, dec!(1000), date!(2026 - 11 - 01)),
            income(4, dec!(1000), date!(2025 - 10 - 01)),
        ];

        let summary = compute_summary(&transactions, &[], TODAY);

        assert_eq!(summary.variable_expense_amount, Decimal::ZERO);
        assert_eq!(summary.income_amount, Decimal::ZERO);
        assert_eq!(summary.balance, Decimal::ZERO);
    }

    #[test]
    fn yearly_expenses_are_not_counted_as_monthly_expenses() {
        let transactions = vec![expense(
            1,
            dec!(120),
            date!(2026 - 10 - 01),
            RepeatInterval::Yearly,
        )];

        let summary = compute_summary(&transactions, &[], TODAY);

        assert_eq!(summary.expense_amount, Decimal::ZERO);
    }

    #[test]
    fn fixed_expenses_do_not_depend_on_order() {
        let mut transactions = vec![
            expense(1, dec!(12.34), date!(2026 - 10 - 01), RepeatInterval::Weekly),
            expense(2, dec!(99.99), date!(2024 - 02 - 29), RepeatInterval::Monthly),
            expense(3, dec!(0.01), date!(2026 - 01 - 01), RepeatInterval::Weekly),
        ];

        let summary = compute_summary(&transactions, &[], TODAY);
        transactions.reverse();
        let reversed_summary = compute_summary(&transactions, &[], TODAY);

        assert_eq!(summary.fixed_expense_amount, dec!(149.39));
        assert_eq!(summary, reversed_summary);
    }

    #[test]
    fn expenses_can_exceed_income() {
        let transactions = vec![
            income(1, dec!(100), date!(2026 - 10 - 01)),
            expense(2, dec!(250.50), date!(2026 - 10 - 03), RepeatInterval::None),
        ];

        let summary = compute_summary(&transactions, &[], TODAY);

        assert_eq!(summary.balance, dec!(-150.50));
        assert_eq!(
            summary.balance,
            summary.income_amount - summary.expense_amount
        );
    }

    #[test]
    fn payment_method_balances_cover_all_time() {
        let methods = vec![payment_method(1, "Cash"), payment_method(2, "Visa")];
        let transactions = vec![
            transaction(
                1,
                TransactionType::Income,
                dec!(500),
                date!(2020 - 01 - 01),
                RepeatInterval::None,
                Some(1),
            ),
            transaction(
                2,
                TransactionType::Expense,
                dec!(20),
                date!(2026 - 10 - 01),
                RepeatInterval::Weekly,
                Some(1),
            ),
            transaction(
                3,
                TransactionType::Expense,
                dec!(75.25),
                date!(2026 - 10 - 02),
                RepeatInterval::None,
                Some(2),
            ),
            expense(4, dec!(1000), date!(2026 - 10 - 03), RepeatInterval::None),
        ];

        let summary = compute_summary(&transactions, &methods, TODAY);

        assert_eq!(
            summary.payment_method_balances,
            BTreeMap::from([
                ("Cash".to_owned(), dec!(480)),
                ("Visa".to_owned(), dec!(-75.25)),
            ])
        );
    }

    #[test]
    fn serializes_figures_as_numbers() {
        let transactions = vec![
            income(1, dec!(1000), date!(2026 - 10 - 01)),
            expense(2, dec!(30.5), date!(2026 - 10 - 02), RepeatInterval::None),
        ];

        let summary = compute_summary(&transactions, &[payment_method(1, "Cash")], TODAY);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["balance"], 969.5);
        assert_eq!(json["income_amount"], 1000.0);
        assert_eq!(json["variable_expense_amount"], 30.5);
        assert_eq!(json["payment_method_balances"]["Cash"], 0.0);
    }
}

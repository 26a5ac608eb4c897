//! Report generation business logic.
//!
//! Provides the aggregations the dashboard and reporting pages are built
//! from: per-user budget totals, expense breakdowns by category, recent
//! activity, and date/category-filtered transaction reports. All
//! functions return structured data for the presentation layer to
//! format.

use crate::core::budget::remaining_amount;
use crate::core::transaction::TransactionKind;
use crate::entities::{Budget, ExpenseCategory, Transaction, budget, transaction};
use crate::errors::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use std::collections::BTreeMap;

/// Aggregate income/expense position over a user's budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetSummary {
    /// Sum of income amounts across all budgets
    pub total_income: Decimal,
    /// Sum of expense amounts across all budgets
    pub total_expense: Decimal,
    /// Income minus expense; negative means overspend
    pub remaining_budget: Decimal,
}

/// Total expense amount attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// Category name
    pub category: String,
    /// Summed expense-transaction amounts
    pub total_amount: Decimal,
}

/// Optional filters for a transaction report.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Include transactions on or after this date
    pub start_date: Option<NaiveDate>,
    /// Include transactions on or before this date
    pub end_date: Option<NaiveDate>,
    /// Restrict to one expense category
    pub category_id: Option<i64>,
}

/// A filtered transaction listing with its grand total.
#[derive(Debug, Clone)]
pub struct TransactionReport {
    /// Matching transactions, newest first
    pub transactions: Vec<transaction::Model>,
    /// Sum of the matching transactions' amounts
    pub total_amount: Decimal,
}

/// Sums a user's budgets into a single income/expense position.
pub async fn budget_summary(db: &DatabaseConnection, user_id: i64) -> Result<BudgetSummary> {
    let budgets = Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    for row in &budgets {
        total_income += row.income_amount;
        total_expense += row.expense_amount;
    }

    Ok(BudgetSummary {
        total_income,
        total_expense,
        remaining_budget: total_income - total_expense,
    })
}

/// Sums a user's expense transactions per category, ordered by category
/// name.
pub async fn expense_breakdown(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<CategoryTotal>> {
    let expenses = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::TransactionType.eq(TransactionKind::Expense.as_str()))
        .all(db)
        .await?;

    let mut totals: BTreeMap<i64, Decimal> = BTreeMap::new();
    for row in &expenses {
        *totals.entry(row.expense_category_id).or_default() += row.amount;
    }

    let categories = ExpenseCategory::find().all(db).await?;
    let names: BTreeMap<i64, String> =
        categories.into_iter().map(|c| (c.id, c.name)).collect();

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category_id, total_amount)| CategoryTotal {
            category: names
                .get(&category_id)
                .cloned()
                .unwrap_or_else(|| category_id.to_string()),
            total_amount,
        })
        .collect();
    breakdown.sort_by(|a, b| a.category.cmp(&b.category));
    Ok(breakdown)
}

/// A user's most recent transactions, newest first.
pub async fn recent_transactions(
    db: &DatabaseConnection,
    user_id: i64,
    limit: u64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::TransactionDate)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's transactions under the given filters and totals them.
///
/// Date bounds are inclusive on both ends.
pub async fn generate_report(
    db: &DatabaseConnection,
    user_id: i64,
    filter: &ReportFilter,
) -> Result<TransactionReport> {
    let mut query = Transaction::find().filter(transaction::Column::UserId.eq(user_id));

    if let Some(start) = filter.start_date {
        query = query.filter(transaction::Column::TransactionDate.gte(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(transaction::Column::TransactionDate.lte(end));
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(transaction::Column::ExpenseCategoryId.eq(category_id));
    }

    let transactions = query
        .order_by_desc(transaction::Column::TransactionDate)
        .all(db)
        .await?;

    let total_amount = transactions
        .iter()
        .fold(Decimal::ZERO, |acc, row| acc + row.amount);

    Ok(TransactionReport {
        transactions,
        total_amount,
    })
}

/// Per-budget remaining amounts for a user, in budget-name order.
pub async fn remaining_by_budget(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<(budget::Model, Decimal)>> {
    let budgets = Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_asc(budget::Column::BudgetName)
        .all(db)
        .await?;

    Ok(budgets
        .into_iter()
        .map(|row| {
            let remaining = remaining_amount(&row);
            (row, remaining)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::budget::NewBudget;
    use crate::core::transaction::NewTransaction;
    use crate::test_utils::{create_test_category, create_test_user, setup_test_db, test_config};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn record(
        db: &DatabaseConnection,
        config: &crate::config::AppConfig,
        budget_id: i64,
        user_id: i64,
        category_id: i64,
        amount: i64,
        day: u32,
        kind: TransactionKind,
    ) -> Result<()> {
        crate::core::transaction::create_transaction(
            db,
            config,
            NewTransaction {
                budget_id,
                user_id,
                amount: Decimal::new(amount, 2),
                expense_category_id: category_id,
                transaction_date: date(2024, 9, day),
                payment_method: "Cash".to_string(),
                description: None,
                kind,
            },
        )
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_summary_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "alice").await?;
        let category = create_test_category(&db, "Cloud Services").await?;

        for (income, expense) in [(100_000, 40_000), (50_000, 80_000)] {
            crate::core::budget::create_budget(
                &db,
                NewBudget {
                    user_id: user.id,
                    budget_name: format!("Budget {income}"),
                    income_amount: Decimal::new(income, 2),
                    expense_amount: Decimal::new(expense, 2),
                    expense_category_id: category.id,
                    payment_method: "Cash".to_string(),
                },
            )
            .await?;
        }

        let summary = budget_summary(&db, user.id).await?;
        assert_eq!(summary.total_income, Decimal::new(150_000, 2));
        assert_eq!(summary.total_expense, Decimal::new(120_000, 2));
        assert_eq!(summary.remaining_budget, Decimal::new(30_000, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_summary_empty_user_is_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "bob").await?;

        let summary = budget_summary(&db, user.id).await?;
        assert_eq!(summary.total_income, Decimal::ZERO);
        assert_eq!(summary.total_expense, Decimal::ZERO);
        assert_eq!(summary.remaining_budget, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_expense_breakdown_groups_by_category() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "carol").await?;
        let cloud = create_test_category(&db, "Cloud Services").await?;
        let training = create_test_category(&db, "Training Programs").await?;
        let budget_row = crate::test_utils::create_test_budget(&db, user.id, cloud.id).await?;

        record(&db, &config, budget_row.id, user.id, cloud.id, 1000, 1, TransactionKind::Expense)
            .await?;
        record(&db, &config, budget_row.id, user.id, cloud.id, 2500, 2, TransactionKind::Expense)
            .await?;
        record(
            &db, &config, budget_row.id, user.id, training.id, 5000, 3,
            TransactionKind::Expense,
        )
        .await?;
        // Income transactions stay out of the expense breakdown
        record(&db, &config, budget_row.id, user.id, cloud.id, 9999, 4, TransactionKind::Income)
            .await?;

        let breakdown = expense_breakdown(&db, user.id).await?;
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Cloud Services");
        assert_eq!(breakdown[0].total_amount, Decimal::new(3500, 2));
        assert_eq!(breakdown[1].category, "Training Programs");
        assert_eq!(breakdown[1].total_amount, Decimal::new(5000, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_recent_transactions_limit() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "dave").await?;
        let category = create_test_category(&db, "Cloud Services").await?;
        let budget_row = crate::test_utils::create_test_budget(&db, user.id, category.id).await?;

        for day in 1..=5 {
            record(
                &db, &config, budget_row.id, user.id, category.id, 100, day,
                TransactionKind::Expense,
            )
            .await?;
        }

        let recent = recent_transactions(&db, user.id, 3).await?;
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].transaction_date, date(2024, 9, 5));
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_report_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "erin").await?;
        let cloud = create_test_category(&db, "Cloud Services").await?;
        let training = create_test_category(&db, "Training Programs").await?;
        let budget_row = crate::test_utils::create_test_budget(&db, user.id, cloud.id).await?;

        record(&db, &config, budget_row.id, user.id, cloud.id, 1000, 5, TransactionKind::Expense)
            .await?;
        record(&db, &config, budget_row.id, user.id, cloud.id, 2000, 15, TransactionKind::Expense)
            .await?;
        record(
            &db, &config, budget_row.id, user.id, training.id, 4000, 25,
            TransactionKind::Expense,
        )
        .await?;

        // Unfiltered report totals everything
        let all = generate_report(&db, user.id, &ReportFilter::default()).await?;
        assert_eq!(all.transactions.len(), 3);
        assert_eq!(all.total_amount, Decimal::new(7000, 2));

        // Inclusive date range
        let ranged = generate_report(
            &db,
            user.id,
            &ReportFilter {
                start_date: Some(date(2024, 9, 5)),
                end_date: Some(date(2024, 9, 15)),
                category_id: None,
            },
        )
        .await?;
        assert_eq!(ranged.transactions.len(), 2);
        assert_eq!(ranged.total_amount, Decimal::new(3000, 2));

        // Category filter
        let by_category = generate_report(
            &db,
            user.id,
            &ReportFilter {
                start_date: None,
                end_date: None,
                category_id: Some(training.id),
            },
        )
        .await?;
        assert_eq!(by_category.transactions.len(), 1);
        assert_eq!(by_category.total_amount, Decimal::new(4000, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_remaining_by_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "frank").await?;
        let category = create_test_category(&db, "Cloud Services").await?;

        crate::core::budget::create_budget(
            &db,
            NewBudget {
                user_id: user.id,
                budget_name: "Overspent".to_string(),
                income_amount: Decimal::new(1000, 2),
                expense_amount: Decimal::new(2500, 2),
                expense_category_id: category.id,
                payment_method: "Cash".to_string(),
            },
        )
        .await?;

        let remaining = remaining_by_budget(&db, user.id).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].1, Decimal::new(-1500, 2));
        Ok(())
    }
}

//! Transaction business logic.
//!
//! Transactions record individual income or expense events against a
//! budget. Creation validates the amount, the kind, and the referential
//! pieces: the budget must exist and belong to the recording user, and
//! the category must exist. Whether the category must also match the
//! budget's category is a configuration decision
//! (`strict_category_match`) - the legacy schema allowed them to differ.

use crate::config::AppConfig;
use crate::core::budget::validate_amount;
use crate::core::category;
use crate::entities::{Budget, Transaction, transaction};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, Set, prelude::*};

/// Kind of a transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl TransactionKind {
    /// Parses a stored transaction-type string.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::Validation {
                message: format!("unrecognized transaction type: {other:?}"),
            }),
        }
    }

    /// The stored string form of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Budget the transaction belongs to
    pub budget_id: i64,
    /// Recording user; must own the budget
    pub user_id: i64,
    /// Non-negative amount
    pub amount: Decimal,
    /// Referenced expense category
    pub expense_category_id: i64,
    /// Date the transaction occurred
    pub transaction_date: NaiveDate,
    /// Payment method tag
    pub payment_method: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Income or expense
    pub kind: TransactionKind,
}

/// Records a new transaction.
pub async fn create_transaction(
    db: &DatabaseConnection,
    config: &AppConfig,
    new_transaction: NewTransaction,
) -> Result<transaction::Model> {
    validate_amount(new_transaction.amount)?;

    let owning_budget = Budget::find_by_id(new_transaction.budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "budget",
            id: new_transaction.budget_id.to_string(),
        })?;

    if owning_budget.user_id != new_transaction.user_id {
        return Err(Error::PermissionDenied {
            message: "cannot record a transaction against another user's budget".to_string(),
        });
    }

    category::get_category_by_id(db, new_transaction.expense_category_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "expense category",
            id: new_transaction.expense_category_id.to_string(),
        })?;

    if config.strict_category_match
        && owning_budget.expense_category_id != new_transaction.expense_category_id
    {
        return Err(Error::Validation {
            message: format!(
                "transaction category {} does not match budget category {}",
                new_transaction.expense_category_id, owning_budget.expense_category_id
            ),
        });
    }

    let model = transaction::ActiveModel {
        budget_id: Set(new_transaction.budget_id),
        user_id: Set(new_transaction.user_id),
        amount: Set(new_transaction.amount),
        expense_category_id: Set(new_transaction.expense_category_id),
        transaction_date: Set(new_transaction.transaction_date),
        payment_method: Set(new_transaction.payment_method),
        description: Set(new_transaction.description),
        transaction_type: Set(new_transaction.kind.as_str().to_string()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Finds a transaction by its unique ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All transactions recorded by a user, newest first.
pub async fn get_transactions_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::TransactionDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All transactions against a budget, newest first.
pub async fn get_transactions_for_budget(
    db: &DatabaseConnection,
    budget_id: i64,
    limit: Option<u64>,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find()
        .filter(transaction::Column::BudgetId.eq(budget_id))
        .order_by_desc(transaction::Column::TransactionDate);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query.all(db).await.map_err(Into::into)
}

/// Updates a transaction's amount, date, or description.
///
/// The outer `Option` on `description` distinguishes "leave unchanged"
/// from "clear the description".
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    amount: Option<Decimal>,
    transaction_date: Option<NaiveDate>,
    description: Option<Option<String>>,
) -> Result<transaction::Model> {
    let existing = get_transaction_by_id(db, transaction_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "transaction",
            id: transaction_id.to_string(),
        })?;

    if let Some(amount) = amount {
        validate_amount(amount)?;
    }

    let mut active = existing.into_active_model();
    if let Some(amount) = amount {
        active.amount = Set(amount);
    }
    if let Some(date) = transaction_date {
        active.transaction_date = Set(date);
    }
    if let Some(description) = description {
        active.description = Set(description);
    }
    active.update(db).await.map_err(Into::into)
}

/// Deletes a transaction.
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let existing = get_transaction_by_id(db, transaction_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "transaction",
            id: transaction_id.to_string(),
        })?;

    existing.delete(db).await?;
    Ok(())
}

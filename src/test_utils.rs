//! Shared test utilities for `TeamBudgetPlanner`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::config::AppConfig;
use crate::core::budget::{self, NewBudget};
use crate::core::category;
use crate::core::role::Role;
use crate::core::transaction::{self, NewTransaction, TransactionKind};
use crate::core::user::{self, NewUser};
use crate::entities;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The stock application configuration used by tests.
pub fn test_config() -> AppConfig {
    AppConfig::default()
}

/// Builds registration input with sensible defaults.
///
/// # Defaults
/// * `email`: `"<username>@example.com"`
/// * `password`: `"correct horse"`
/// * `team`: None (configured default team)
/// * `work_phone`: None (generated during reconciliation)
pub fn new_test_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "correct horse".to_string(),
        team: None,
        work_phone: None,
    }
}

/// Registers a regular test user through the full registration path.
pub async fn create_test_user(
    db: &DatabaseConnection,
    config: &AppConfig,
    username: &str,
) -> Result<entities::user_profile::Model> {
    user::register_user(db, config, new_test_user(username)).await
}

/// Provisions an admin test user through the operator bootstrap path.
pub async fn create_test_admin(
    db: &DatabaseConnection,
    config: &AppConfig,
    username: &str,
) -> Result<entities::user_profile::Model> {
    user::provision_user(db, config, new_test_user(username), Role::Admin).await
}

/// Creates a test category by name.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::expense_category::Model> {
    category::create_category(db, name).await
}

/// Creates a test budget with sensible defaults.
///
/// # Defaults
/// * `budget_name`: `"Test Budget"`
/// * `income_amount`: 1000.00
/// * `expense_amount`: 250.00
/// * `payment_method`: `"Credit Card"`
pub async fn create_test_budget(
    db: &DatabaseConnection,
    user_id: i64,
    expense_category_id: i64,
) -> Result<entities::budget::Model> {
    budget::create_budget(
        db,
        NewBudget {
            user_id,
            budget_name: "Test Budget".to_string(),
            income_amount: Decimal::new(100_000, 2),
            expense_amount: Decimal::new(25_000, 2),
            expense_category_id,
            payment_method: "Credit Card".to_string(),
        },
    )
    .await
}

/// Records an expense test transaction against a budget.
///
/// The owner and category come from the budget itself; `amount` is a
/// decimal string like `"25.00"`.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    config: &AppConfig,
    budget_row: &entities::budget::Model,
    amount: &str,
) -> Result<entities::transaction::Model> {
    let amount: Decimal = amount.parse().map_err(|e| Error::Validation {
        message: format!("bad test amount: {e}"),
    })?;
    let transaction_date =
        chrono::NaiveDate::from_ymd_opt(2024, 9, 10).ok_or_else(|| Error::Validation {
            message: "bad test date".to_string(),
        })?;

    transaction::create_transaction(
        db,
        config,
        NewTransaction {
            budget_id: budget_row.id,
            user_id: budget_row.user_id,
            amount,
            expense_category_id: budget_row.expense_category_id,
            transaction_date,
            payment_method: "Credit Card".to_string(),
            description: Some("Test transaction".to_string()),
            kind: TransactionKind::Expense,
        },
    )
    .await
}

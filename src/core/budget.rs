//! Budget business logic.
//!
//! A budget pairs an income allocation with recorded expenses against an
//! expense category. Amounts are non-negative two-fractional-digit
//! decimals at the API boundary; the derived remaining amount may go
//! negative, which signals overspend and is deliberately allowed.

use crate::core::category;
use crate::entities::{Budget, Transaction, budget, transaction};
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use sea_orm::{IntoActiveModel, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct NewBudget {
    /// Owning user profile
    pub user_id: i64,
    /// Human-readable budget name
    pub budget_name: String,
    /// Income allocated to this budget
    pub income_amount: Decimal,
    /// Expenses recorded against this budget
    pub expense_amount: Decimal,
    /// Referenced expense category
    pub expense_category_id: i64,
    /// Payment method tag
    pub payment_method: String,
}

/// Field-wise changes for updating a budget.
#[derive(Debug, Clone, Default)]
pub struct BudgetChanges {
    /// New budget name
    pub budget_name: Option<String>,
    /// New income amount
    pub income_amount: Option<Decimal>,
    /// New expense amount
    pub expense_amount: Option<Decimal>,
    /// New category reference
    pub expense_category_id: Option<i64>,
    /// New payment method tag
    pub payment_method: Option<String>,
}

/// Validates a monetary input: non-negative, at most two fractional digits.
pub(crate) fn validate_amount(amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() || amount.scale() > 2 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// What is left of the income after expenses. Negative means overspend.
#[must_use]
pub fn remaining_amount(budget: &budget::Model) -> Decimal {
    budget.income_amount - budget.expense_amount
}

/// Creates a new budget, validating amounts and the category reference.
pub async fn create_budget(
    db: &DatabaseConnection,
    new_budget: NewBudget,
) -> Result<budget::Model> {
    if new_budget.budget_name.trim().is_empty() {
        return Err(Error::Validation {
            message: "budget name cannot be empty".to_string(),
        });
    }
    validate_amount(new_budget.income_amount)?;
    validate_amount(new_budget.expense_amount)?;

    category::get_category_by_id(db, new_budget.expense_category_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "expense category",
            id: new_budget.expense_category_id.to_string(),
        })?;

    let now = chrono::Utc::now();
    let model = budget::ActiveModel {
        user_id: Set(new_budget.user_id),
        budget_name: Set(new_budget.budget_name.trim().to_string()),
        income_amount: Set(new_budget.income_amount),
        expense_amount: Set(new_budget.expense_amount),
        expense_category_id: Set(new_budget.expense_category_id),
        payment_method: Set(new_budget.payment_method),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Finds a budget by its unique ID.
pub async fn get_budget_by_id(
    db: &DatabaseConnection,
    budget_id: i64,
) -> Result<Option<budget::Model>> {
    Budget::find_by_id(budget_id).one(db).await.map_err(Into::into)
}

/// All budgets owned by a user, ordered alphabetically by name.
pub async fn get_budgets_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<budget::Model>> {
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_asc(budget::Column::BudgetName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The most recently created budgets across all users.
pub async fn get_recent_budgets(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<budget::Model>> {
    Budget::find()
        .order_by_desc(budget::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies field-wise changes to a budget with the same validation as
/// creation.
pub async fn update_budget(
    db: &DatabaseConnection,
    budget_id: i64,
    changes: BudgetChanges,
) -> Result<budget::Model> {
    let existing = get_budget_by_id(db, budget_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "budget",
            id: budget_id.to_string(),
        })?;

    if let Some(name) = &changes.budget_name
        && name.trim().is_empty()
    {
        return Err(Error::Validation {
            message: "budget name cannot be empty".to_string(),
        });
    }
    if let Some(amount) = changes.income_amount {
        validate_amount(amount)?;
    }
    if let Some(amount) = changes.expense_amount {
        validate_amount(amount)?;
    }
    if let Some(category_id) = changes.expense_category_id {
        category::get_category_by_id(db, category_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                entity: "expense category",
                id: category_id.to_string(),
            })?;
    }

    let mut active = existing.into_active_model();
    if let Some(name) = changes.budget_name {
        active.budget_name = Set(name.trim().to_string());
    }
    if let Some(amount) = changes.income_amount {
        active.income_amount = Set(amount);
    }
    if let Some(amount) = changes.expense_amount {
        active.expense_amount = Set(amount);
    }
    if let Some(category_id) = changes.expense_category_id {
        active.expense_category_id = Set(category_id);
    }
    if let Some(payment_method) = changes.payment_method {
        active.payment_method = Set(payment_method);
    }
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Deletes a budget together with its transactions.
pub async fn delete_budget(db: &DatabaseConnection, budget_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = Budget::find_by_id(budget_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "budget",
            id: budget_id.to_string(),
        })?;

    Transaction::delete_many()
        .filter(transaction::Column::BudgetId.eq(budget_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        create_test_budget, create_test_category, create_test_transaction, create_test_user,
        setup_test_db, test_config,
    };
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_create_budget_and_remaining_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "alice").await?;
        let category = create_test_category(&db, "Cloud Services").await?;

        let created = create_budget(
            &db,
            NewBudget {
                user_id: user.id,
                budget_name: "Q3 Infrastructure".to_string(),
                income_amount: Decimal::new(100_000, 2), // 1000.00
                expense_amount: Decimal::new(25_050, 2), // 250.50
                expense_category_id: category.id,
                payment_method: "Credit Card".to_string(),
            },
        )
        .await?;

        assert_eq!(remaining_amount(&created), Decimal::new(74_950, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_remaining_amount_may_be_negative() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "bob").await?;
        let category = create_test_category(&db, "Training Programs").await?;

        let overspent = create_budget(
            &db,
            NewBudget {
                user_id: user.id,
                budget_name: "Conference travel".to_string(),
                income_amount: Decimal::new(10_000, 2), // 100.00
                expense_amount: Decimal::new(17_500, 2), // 175.00
                expense_category_id: category.id,
                payment_method: "Credit Card".to_string(),
            },
        )
        .await?;

        assert_eq!(remaining_amount(&overspent), Decimal::new(-7500, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_negative_amount_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "carol").await?;
        let category = create_test_category(&db, "Software Licenses").await?;

        let result = create_budget(
            &db,
            NewBudget {
                user_id: user.id,
                budget_name: "Bad".to_string(),
                income_amount: Decimal::new(-100, 2),
                expense_amount: Decimal::ZERO,
                expense_category_id: category.id,
                payment_method: "Credit Card".to_string(),
            },
        )
        .await;

        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "dave").await?;

        let result = create_budget(
            &db,
            NewBudget {
                user_id: user.id,
                budget_name: "Orphan".to_string(),
                income_amount: Decimal::ZERO,
                expense_amount: Decimal::ZERO,
                expense_category_id: 999,
                payment_method: "Cash".to_string(),
            },
        )
        .await;

        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_budget_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "erin").await?;
        let category = create_test_category(&db, "Cloud Services").await?;
        let budget_row = create_test_budget(&db, user.id, category.id).await?;

        let updated = update_budget(
            &db,
            budget_row.id,
            BudgetChanges {
                income_amount: Some(Decimal::new(200_000, 2)),
                payment_method: Some("Bank Transfer".to_string()),
                ..BudgetChanges::default()
            },
        )
        .await?;

        assert_eq!(updated.income_amount, Decimal::new(200_000, 2));
        assert_eq!(updated.payment_method, "Bank Transfer");
        // Untouched fields survive
        assert_eq!(updated.budget_name, budget_row.budget_name);
        Ok(())
    }

    #[tokio::test]
    async fn test_budgets_for_user_are_scoped_and_ordered() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let alice = create_test_user(&db, &config, "alice").await?;
        let bob = create_test_user(&db, &config, "bob").await?;
        let category = create_test_category(&db, "Cloud Services").await?;

        for name in ["Zeta", "Alpha"] {
            create_budget(
                &db,
                NewBudget {
                    user_id: alice.id,
                    budget_name: name.to_string(),
                    income_amount: Decimal::ZERO,
                    expense_amount: Decimal::ZERO,
                    expense_category_id: category.id,
                    payment_method: "Cash".to_string(),
                },
            )
            .await?;
        }
        create_test_budget(&db, bob.id, category.id).await?;

        let budgets = get_budgets_for_user(&db, alice.id).await?;
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].budget_name, "Alpha");
        assert_eq!(budgets[1].budget_name, "Zeta");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_budget_removes_its_transactions() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_config();
        let user = create_test_user(&db, &config, "frank").await?;
        let category = create_test_category(&db, "Cloud Services").await?;
        let budget_row = create_test_budget(&db, user.id, category.id).await?;
        create_test_transaction(&db, &config, &budget_row, "12.00").await?;

        delete_budget(&db, budget_row.id).await?;

        assert!(get_budget_by_id(&db, budget_row.id).await?.is_none());
        assert_eq!(
            Transaction::find()
                .filter(transaction::Column::BudgetId.eq(budget_row.id))
                .count(&db)
                .await?,
            0
        );
        Ok(())
    }
}

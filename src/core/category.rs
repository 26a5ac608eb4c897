//! Expense category business logic.
//!
//! Categories are shared reference data: budgets and transactions point
//! at them but never own them. Deleting a category that is still
//! referenced is refused with a conflict so financial records can never
//! be orphaned.

use crate::entities::{Budget, ExpenseCategory, Transaction, budget, expense_category, transaction};
use crate::errors::{Error, Result};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Category names seeded on first run.
const INITIAL_CATEGORIES: [&str; 4] = [
    "Cloud Services",
    "Software Licenses",
    "Development Tools",
    "Training Programs",
];

/// Creates a new expense category with a unique name.
pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<expense_category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "category name cannot be empty".to_string(),
        });
    }

    if get_category_by_name(db, name).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("category already exists: {name}"),
        });
    }

    let category = expense_category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };
    category.insert(db).await.map_err(Into::into)
}

/// Finds a category by its unique name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<expense_category::Model>> {
    ExpenseCategory::find()
        .filter(expense_category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its unique ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<expense_category::Model>> {
    ExpenseCategory::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all categories, ordered alphabetically by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<expense_category::Model>> {
    ExpenseCategory::find()
        .order_by_asc(expense_category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a category, refusing while any budget or transaction
/// references it.
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let category = ExpenseCategory::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "expense category",
            id: category_id.to_string(),
        })?;

    let budget_refs = Budget::find()
        .filter(budget::Column::ExpenseCategoryId.eq(category_id))
        .count(&txn)
        .await?;
    let transaction_refs = Transaction::find()
        .filter(transaction::Column::ExpenseCategoryId.eq(category_id))
        .count(&txn)
        .await?;

    if budget_refs > 0 || transaction_refs > 0 {
        return Err(Error::Conflict {
            message: format!(
                "category {:?} is still referenced by {budget_refs} budget(s) and {transaction_refs} transaction(s)",
                category.name
            ),
        });
    }

    category.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Seeds the initial category set, creating only the names that are
/// missing. Safe to run on every startup.
pub async fn seed_initial_categories(db: &DatabaseConnection) -> Result<usize> {
    let mut created = 0;
    for name in INITIAL_CATEGORIES {
        if get_category_by_name(db, name).await?.is_none() {
            create_category(db, name).await?;
            created += 1;
        }
    }

    if created > 0 {
        info!(created, "seeded expense categories");
    }
    Ok(created)
}

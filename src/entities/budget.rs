//! Budget entity - An income/expense allocation owned by one user.
//!
//! Amounts are stored as two-fractional-digit decimals. The remaining
//! amount is derived (`income - expense`) and may be negative, which is
//! meaningful: it signals overspend.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user profile
    pub user_id: i64,
    /// Human-readable budget name
    pub budget_name: String,
    /// Income allocated to this budget
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub income_amount: Decimal,
    /// Expenses recorded against this budget
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub expense_amount: Decimal,
    /// Referenced expense category
    pub expense_category_id: i64,
    /// Payment method tag (e.g., "Credit Card")
    pub payment_method: String,
    /// When the budget was created
    pub created_at: DateTimeUtc,
    /// When the budget was last updated
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `Budget` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one user profile
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UserId",
        to = "super::user_profile::Column::Id"
    )]
    UserProfile,
    /// Each budget references one expense category
    #[sea_orm(
        belongs_to = "super::expense_category::Entity",
        from = "Column::ExpenseCategoryId",
        to = "super::expense_category::Column::Id"
    )]
    ExpenseCategory,
    /// One budget has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl Related<super::expense_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseCategory.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

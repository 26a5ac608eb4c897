//! Transaction entity - A single income or expense record.
//!
//! Each transaction belongs to one budget and one user, references an
//! expense category, and carries a `transaction_type` of `"income"` or
//! `"expense"`. Whether the category must match the owning budget's
//! category is governed by application configuration, not the schema.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Budget this transaction belongs to
    pub budget_id: i64,
    /// Owning user profile
    pub user_id: i64,
    /// Transaction amount, always non-negative
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    /// Referenced expense category
    pub expense_category_id: i64,
    /// Date the transaction occurred
    pub transaction_date: Date,
    /// Payment method tag
    pub payment_method: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Kind of transaction: `"income"` or `"expense"`
    pub transaction_type: String,
}

/// Defines relationships between `Transaction` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id"
    )]
    Budget,
    /// Each transaction belongs to one user profile
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UserId",
        to = "super::user_profile::Column::Id"
    )]
    UserProfile,
    /// Each transaction references one expense category
    #[sea_orm(
        belongs_to = "super::expense_category::Entity",
        from = "Column::ExpenseCategoryId",
        to = "super::expense_category::Column::Id"
    )]
    ExpenseCategory,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
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

impl ActiveModelBehavior for ActiveModel {}

//! Expense category entity - A named, unique classification tag.
//!
//! Categories are shared: budgets and transactions hold non-owning
//! references to them. A category is never deleted while referenced.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique category name (e.g., "Cloud Services")
    #[sea_orm(unique)]
    pub name: String,
}

/// Defines relationships between `ExpenseCategory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Budgets referencing this category
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
    /// Transactions referencing this category
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

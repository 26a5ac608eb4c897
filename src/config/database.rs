//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements
//! from the entity models, ensuring that the database schema matches the Rust struct
//! definitions without requiring manual SQL.

use crate::entities::{
    Budget, ExpenseCategory, TeamSetting, Transaction, UserPermission, UserProfile,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/team_budget_planner.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from entity definitions.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_profile_table = schema.create_table_from_entity(UserProfile);
    let mut team_setting_table = schema.create_table_from_entity(TeamSetting);
    let mut expense_category_table = schema.create_table_from_entity(ExpenseCategory);
    let mut budget_table = schema.create_table_from_entity(Budget);
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    let mut user_permission_table = schema.create_table_from_entity(UserPermission);

    // Idempotent so startup can run it unconditionally
    db.execute(builder.build(user_profile_table.if_not_exists())).await?;
    db.execute(builder.build(team_setting_table.if_not_exists())).await?;
    db.execute(builder.build(expense_category_table.if_not_exists())).await?;
    db.execute(builder.build(budget_table.if_not_exists())).await?;
    db.execute(builder.build(transaction_table.if_not_exists())).await?;
    db.execute(builder.build(user_permission_table.if_not_exists())).await?;

    Ok(())
}

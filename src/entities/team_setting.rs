//! Team setting entity - Per-user team configuration.
//!
//! Exactly one row exists per user profile once reconciliation has run;
//! the unique index on `user_id` is the guard that makes reconciliation
//! idempotent. The `role` column is a snapshot copied from the profile,
//! refreshed whenever the profile's role changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team setting database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_settings")]
pub struct Model {
    /// Unique identifier for the setting record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user profile; unique so at most one record exists per user
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Team name, one of the configured allowed names
    pub team_name: String,
    /// Preferred currency: `"USD"` or `"GBP"`
    pub currency: String,
    /// Free-form communication preference (defaults to `"email"`)
    pub communication_preference: String,
    /// Role snapshot copied from the owning profile at last reconciliation
    pub role: String,
    /// Work phone copied from the owning profile
    pub work_phone: Option<String>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last updated
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `TeamSetting` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each setting record belongs to one user profile
    #[sea_orm(
        belongs_to = "super::user_profile::Entity",
        from = "Column::UserId",
        to = "super::user_profile::Column::Id"
    )]
    UserProfile,
}

impl Related<super::user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! User profile entity - Represents an authenticated principal.
//!
//! Each profile carries the coarse `role` flag (`"admin"` or `"regular"`)
//! from which account level and manager status are derived at read time.
//! The derived values are intentionally not stored so they can never drift
//! out of sync with the role.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique email address, stored lowercase
    #[sea_orm(unique)]
    pub email: String,
    /// Unique login name
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 hash of the user's password
    pub password_hash: String,
    /// Role flag: `"admin"` or `"regular"`
    pub role: String,
    /// Team the user belongs to
    pub team: String,
    /// Auto-generated unique work phone; None until first reconciliation
    #[sea_orm(unique)]
    pub work_phone: Option<String>,
    /// When the profile was created
    pub created_at: DateTimeUtc,
    /// When the profile was last updated
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `UserProfile` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One profile owns many budgets
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
    /// One profile owns many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// Exactly one team-setting record per profile
    #[sea_orm(has_one = "super::team_setting::Entity")]
    TeamSetting,
    /// Permission grants attached to this profile
    #[sea_orm(has_many = "super::user_permission::Entity")]
    Permissions,
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

impl Related<super::team_setting::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamSetting.def()
    }
}

impl Related<super::user_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

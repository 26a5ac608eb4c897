//! User permission entity - A named capability granted to a profile.
//!
//! Grants are written as a whole set per user (delete-then-insert inside
//! the reconciliation transaction), so no composite uniqueness constraint
//! is needed at the schema level.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permission grant database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_permissions")]
pub struct Model {
    /// Unique identifier for the grant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Profile the capability is attached to
    pub user_id: i64,
    /// Capability codename, e.g. `"create_budget"`
    pub codename: String,
}

/// Defines relationships between `UserPermission` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each grant belongs to one user profile
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

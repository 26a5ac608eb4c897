//! Permission codenames and role-based grants.
//!
//! Capabilities are named `<action>_<resource>` (e.g. `"create_budget"`).
//! Admins hold the full action/resource grid; regular users hold exactly
//! create/view/update on budgets and transactions, with no delete and no
//! administrative capabilities. Grants are replaced as a whole set so
//! re-granting is idempotent.

use crate::core::role::Role;
use crate::entities::{UserPermission, user_permission};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder, Set, prelude::*};

/// Action half of a permission codename.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PermissionAction {
    /// Create new records
    Create,
    /// Read existing records
    View,
    /// Modify existing records
    Update,
    /// Remove records
    Delete,
}

/// Resource half of a permission codename.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PermissionResource {
    /// Budget records
    Budget,
    /// Transaction records
    Transaction,
    /// Expense category records
    Category,
    /// User profile records
    User,
}

impl PermissionAction {
    const ALL: [Self; 4] = [Self::Create, Self::View, Self::Update, Self::Delete];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::View => "view",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl PermissionResource {
    const ALL: [Self; 4] = [Self::Budget, Self::Transaction, Self::Category, Self::User];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Transaction => "transaction",
            Self::Category => "category",
            Self::User => "user",
        }
    }
}

/// A single named capability.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Permission {
    /// What the holder may do
    pub action: PermissionAction,
    /// What the holder may do it to
    pub resource: PermissionResource,
}

impl Permission {
    /// Stable codename stored in the grant table.
    #[must_use]
    pub fn codename(self) -> String {
        format!("{}_{}", self.action.as_str(), self.resource.as_str())
    }

    /// Every action/resource pair - the admin grant.
    #[must_use]
    pub fn full_set() -> Vec<Self> {
        let mut permissions = Vec::new();
        for action in PermissionAction::ALL {
            for resource in PermissionResource::ALL {
                permissions.push(Self { action, resource });
            }
        }
        permissions
    }

    /// Exactly create/view/update on budgets and transactions - the
    /// regular grant. No delete, nothing administrative.
    #[must_use]
    pub fn regular_set() -> Vec<Self> {
        let actions = [
            PermissionAction::Create,
            PermissionAction::View,
            PermissionAction::Update,
        ];
        let resources = [PermissionResource::Budget, PermissionResource::Transaction];

        let mut permissions = Vec::new();
        for action in actions {
            for resource in resources {
                permissions.push(Self { action, resource });
            }
        }
        permissions
    }
}

/// The permission set a role confers.
#[must_use]
pub fn role_permissions(role: Role) -> Vec<Permission> {
    match role {
        Role::Admin => Permission::full_set(),
        Role::Regular => Permission::regular_set(),
    }
}

/// Replaces a user's permission grants with the set its role confers.
///
/// Delete-then-insert inside the caller's transaction: granting twice
/// leaves the same set, so reconciliation stays idempotent.
pub async fn grant_role_permissions<C>(conn: &C, user_id: i64, role: Role) -> Result<()>
where
    C: ConnectionTrait,
{
    UserPermission::delete_many()
        .filter(user_permission::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;

    for permission in role_permissions(role) {
        let grant = user_permission::ActiveModel {
            user_id: Set(user_id),
            codename: Set(permission.codename()),
            ..Default::default()
        };
        grant.insert(conn).await?;
    }

    Ok(())
}

/// Reads back a user's granted codenames, sorted for stable comparison.
pub async fn permissions_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<String>> {
    let grants = UserPermission::find()
        .filter(user_permission::Column::UserId.eq(user_id))
        .order_by_asc(user_permission::Column::Codename)
        .all(db)
        .await?;

    Ok(grants.into_iter().map(|grant| grant.codename).collect())
}

/// Whether a user holds a specific capability.
pub async fn has_permission(
    db: &DatabaseConnection,
    user_id: i64,
    permission: Permission,
) -> Result<bool> {
    let found = UserPermission::find()
        .filter(user_permission::Column::UserId.eq(user_id))
        .filter(user_permission::Column::Codename.eq(permission.codename()))
        .one(db)
        .await?;

    Ok(found.is_some())
}

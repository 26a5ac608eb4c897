//! Role-profile reconciliation.
//!
//! This module keeps an identity's role-dependent state consistent: the
//! derived account attributes, the permission grant set, and the single
//! team-setting record every identity owns. Callers that create an
//! identity or change its role dispatch the matching [`IdentityEvent`]
//! explicitly; there is no implicit save-hook broadcast, so ordering and
//! failure handling stay visible and testable.
//!
//! All writes happen inside one database transaction. Re-running
//! reconciliation for the same identity is idempotent: the unique
//! `user_id` on team settings guards against duplicates, and permission
//! grants are replaced as a set.

use crate::config::AppConfig;
use crate::core::{permission, phone, role::Role};
use crate::entities::{TeamSetting, UserProfile, team_setting, user_profile};
use crate::errors::{Error, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info};

/// Identity lifecycle event driving reconciliation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IdentityEvent {
    /// The identity was just created (registration or provisioning)
    Created,
    /// The identity's role was changed by an elevation operation
    RoleChanged {
        /// Role the identity held before the change
        previous: Role,
    },
}

/// Reconciles an identity's derived state after a lifecycle event.
///
/// On [`IdentityEvent::Created`]: ensures the identity carries a unique
/// work phone (reusing one it already has), creates the team-setting
/// record if none exists, and grants the permission set its role
/// confers. On [`IdentityEvent::RoleChanged`]: re-grants permissions and
/// refreshes the team-setting role snapshot without creating a second
/// record.
///
/// Returns the reconciled profile so callers observe the generated work
/// phone without a second read.
///
/// # Errors
/// - [`Error::NotFound`] if no profile exists for `user_id`
/// - [`Error::Validation`] if the stored role is unrecognized
/// - [`Error::Conflict`] if no unique work phone could be generated
///   within the bounded retry budget
pub async fn reconcile(
    db: &DatabaseConnection,
    config: &AppConfig,
    user_id: i64,
    event: IdentityEvent,
) -> Result<user_profile::Model> {
    let txn = db.begin().await?;

    let user = UserProfile::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user profile",
            id: user_id.to_string(),
        })?;

    let role = Role::parse(&user.role)?;
    debug!(
        user_id,
        role = %role,
        account_level = %role.account_level(),
        is_manager = role.is_manager(),
        "reconciling identity"
    );

    let user = match event {
        IdentityEvent::Created => ensure_work_phone(&txn, user).await?,
        IdentityEvent::RoleChanged { previous } => {
            if previous != role {
                info!(user_id, from = %previous, to = %role, "role changed");
            }
            user
        }
    };

    ensure_team_setting(&txn, config, &user, role).await?;
    permission::grant_role_permissions(&txn, user.id, role).await?;

    txn.commit().await?;
    Ok(user)
}

/// Gives the profile a unique work phone if it does not carry one yet.
async fn ensure_work_phone<C>(conn: &C, user: user_profile::Model) -> Result<user_profile::Model>
where
    C: ConnectionTrait,
{
    if user.work_phone.is_some() {
        return Ok(user);
    }

    let generated = phone::generate_unique_work_phone(conn).await?;
    let mut active = user.into_active_model();
    active.work_phone = Set(Some(generated));
    active.updated_at = Set(chrono::Utc::now());
    active.update(conn).await.map_err(Error::from_constraint)
}

/// Upserts the single team-setting record for a profile.
///
/// Creation uses the profile's team (or the configured default when the
/// profile carries none) and the configured currency and communication
/// preference. An existing record is never duplicated; its role snapshot
/// and phone are refreshed when stale so a crashed-and-retried
/// reconciliation converges.
async fn ensure_team_setting<C>(
    conn: &C,
    config: &AppConfig,
    user: &user_profile::Model,
    role: Role,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let existing = TeamSetting::find()
        .filter(team_setting::Column::UserId.eq(user.id))
        .one(conn)
        .await?;

    match existing {
        None => {
            let team_name = if user.team.is_empty() {
                config.default_team.clone()
            } else {
                user.team.clone()
            };

            let now = chrono::Utc::now();
            let setting = team_setting::ActiveModel {
                user_id: Set(user.id),
                team_name: Set(team_name),
                currency: Set(config.default_currency.clone()),
                communication_preference: Set(config.default_communication_preference.clone()),
                role: Set(role.as_str().to_string()),
                work_phone: Set(user.work_phone.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            setting.insert(conn).await.map_err(Error::from_constraint)?;
            debug!(user_id = user.id, "created team setting");
        }
        Some(setting) => {
            let stale =
                setting.role != role.as_str() || setting.work_phone != user.work_phone;
            if stale {
                let mut active = setting.into_active_model();
                active.role = Set(role.as_str().to_string());
                active.work_phone = Set(user.work_phone.clone());
                active.updated_at = Set(chrono::Utc::now());
                active.update(conn).await?;
                debug!(user_id = user.id, "refreshed team setting snapshot");
            }
        }
    }

    Ok(())
}

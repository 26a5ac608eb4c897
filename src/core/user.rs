//! User registration, role elevation, and lifecycle operations.
//!
//! Registration always assigns the configured default role - the role a
//! caller asks for is never honored on the self-service path. Elevation
//! to admin (and demotion back) is a separate operation gated on the
//! acting identity already being an admin. Every path that creates or
//! re-roles an identity finishes by dispatching the matching
//! reconciliation event.

use crate::config::AppConfig;
use crate::core::auth;
use crate::core::reconcile::{self, IdentityEvent};
use crate::core::role::Role;
use crate::entities::{
    Budget, TeamSetting, Transaction, UserPermission, UserProfile, budget, team_setting,
    transaction, user_permission, user_profile,
};
use crate::errors::{Error, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::{info, instrument};

/// Input for creating a new identity.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Team to join; the configured default when `None`
    pub team: Option<String>,
    /// Work phone to keep; generated during reconciliation when `None`
    pub work_phone: Option<String>,
}

/// Changes a user may make to their team-setting record.
#[derive(Debug, Clone, Default)]
pub struct TeamSettingChanges {
    /// New preferred currency
    pub currency: Option<String>,
    /// New communication preference
    pub communication_preference: Option<String>,
}

/// Registers a new identity with the configured default role.
///
/// Validates presence and uniqueness of email and username, hashes the
/// password, inserts the profile, and dispatches
/// [`IdentityEvent::Created`] so the team setting and permission grants
/// come into existence. Returns the reconciled profile (with its
/// generated work phone).
#[instrument(skip(db, config, new_user), fields(username = %new_user.username))]
pub async fn register_user(
    db: &DatabaseConnection,
    config: &AppConfig,
    new_user: NewUser,
) -> Result<user_profile::Model> {
    let username = new_user.username.trim().to_string();
    let email = new_user.email.trim().to_lowercase();

    if email.is_empty() {
        return Err(Error::Validation {
            message: "email must be set".to_string(),
        });
    }
    if username.is_empty() {
        return Err(Error::Validation {
            message: "username must be set".to_string(),
        });
    }
    if new_user.password.is_empty() {
        return Err(Error::Validation {
            message: "password must be set".to_string(),
        });
    }

    let team = match new_user.team {
        Some(team) => {
            if !config.is_allowed_team(&team) {
                return Err(Error::Validation {
                    message: format!("unknown team: {team:?}"),
                });
            }
            team
        }
        None => config.default_team.clone(),
    };

    // Self-registration never elevates: the stored role is the fixed
    // configuration constant regardless of caller input.
    let role = config.registration_role()?;

    if get_user_by_email(db, &email).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("email already registered: {email}"),
        });
    }
    if get_user_by_username(db, &username).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("username already taken: {username}"),
        });
    }
    if let Some(phone) = &new_user.work_phone {
        if crate::core::phone::is_work_phone_taken(db, phone).await? {
            return Err(Error::Conflict {
                message: format!("work phone already in use: {phone}"),
            });
        }
    }

    let password_hash = auth::hash_password(&new_user.password)?;
    let now = chrono::Utc::now();
    let profile = user_profile::ActiveModel {
        email: Set(email),
        username: Set(username),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        team: Set(team),
        work_phone: Set(new_user.work_phone),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let inserted = profile.insert(db).await.map_err(Error::from_constraint)?;

    info!(user_id = inserted.id, "registered new user");
    reconcile::reconcile(db, config, inserted.id, IdentityEvent::Created).await
}

/// Provisions an identity with an explicit role, bypassing the
/// self-registration default.
///
/// This is the operator bootstrap path (initial admin creation), not a
/// user-facing operation.
pub async fn provision_user(
    db: &DatabaseConnection,
    config: &AppConfig,
    new_user: NewUser,
    role: Role,
) -> Result<user_profile::Model> {
    let registered = register_user(db, config, new_user).await?;
    let previous = Role::parse(&registered.role)?;
    if previous == role {
        return Ok(registered);
    }

    let user_id = registered.id;
    let mut active = registered.into_active_model();
    active.role = Set(role.as_str().to_string());
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;

    reconcile::reconcile(db, config, user_id, IdentityEvent::RoleChanged { previous }).await
}

/// Changes a user's role. Only an admin actor may do this.
///
/// The two-state machine is fully reversible: admins can be demoted back
/// to regular. Dispatches [`IdentityEvent::RoleChanged`] so permissions
/// and the team-setting snapshot follow the new role.
pub async fn change_role(
    db: &DatabaseConnection,
    config: &AppConfig,
    actor: &user_profile::Model,
    target_id: i64,
    new_role: Role,
) -> Result<user_profile::Model> {
    let actor_role = Role::parse(&actor.role)?;
    if !actor_role.is_manager() {
        return Err(Error::PermissionDenied {
            message: format!("{} is not allowed to change roles", actor.username),
        });
    }

    let target = get_user_by_id(db, target_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user profile",
            id: target_id.to_string(),
        })?;

    let previous = Role::parse(&target.role)?;
    if previous == new_role {
        return Ok(target);
    }

    let mut active = target.into_active_model();
    active.role = Set(new_role.as_str().to_string());
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;

    reconcile::reconcile(db, config, target_id, IdentityEvent::RoleChanged { previous }).await
}

/// Changes a user's password after verifying the old one.
pub async fn change_password(
    db: &DatabaseConnection,
    user_id: i64,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    let user = get_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user profile",
            id: user_id.to_string(),
        })?;

    if !auth::verify_password(old_password, &user.password_hash)? {
        return Err(Error::Credential {
            message: "old password does not match".to_string(),
        });
    }
    if new_password.is_empty() {
        return Err(Error::Validation {
            message: "new password must be set".to_string(),
        });
    }

    let mut active = user.into_active_model();
    active.password_hash = Set(auth::hash_password(new_password)?);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;
    Ok(())
}

/// Applies a user's edits to their team-setting record.
pub async fn update_team_setting(
    db: &DatabaseConnection,
    config: &AppConfig,
    user_id: i64,
    changes: TeamSettingChanges,
) -> Result<team_setting::Model> {
    let setting = TeamSetting::find()
        .filter(team_setting::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "team setting",
            id: user_id.to_string(),
        })?;

    if let Some(currency) = &changes.currency
        && !config.is_allowed_currency(currency)
    {
        return Err(Error::Validation {
            message: format!("unsupported currency: {currency:?}"),
        });
    }

    let mut active = setting.into_active_model();
    if let Some(currency) = changes.currency {
        active.currency = Set(currency);
    }
    if let Some(preference) = changes.communication_preference {
        active.communication_preference = Set(preference);
    }
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Deletes an identity and everything it owns.
///
/// Transactions, budgets, permission grants, and the team-setting record
/// go with the profile in a single database transaction.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let user = UserProfile::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user profile",
            id: user_id.to_string(),
        })?;

    Transaction::delete_many()
        .filter(transaction::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    Budget::delete_many()
        .filter(budget::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    UserPermission::delete_many()
        .filter(user_permission::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    TeamSetting::delete_many()
        .filter(team_setting::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    user.delete(&txn).await?;

    txn.commit().await?;
    info!(user_id, "deleted user and owned records");
    Ok(())
}

/// Finds a profile by its unique ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Option<user_profile::Model>> {
    UserProfile::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a profile by email (stored lowercase).
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user_profile::Model>> {
    UserProfile::find()
        .filter(user_profile::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a profile by username.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user_profile::Model>> {
    UserProfile::find()
        .filter(user_profile::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

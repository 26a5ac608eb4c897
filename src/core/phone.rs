//! Unique work-phone generation.
//!
//! Candidates are fixed-length numeric strings drawn uniformly from the
//! ten-digit range, checked for global uniqueness against both the
//! identity and team-setting stores, and retried a bounded number of
//! times before the collision surfaces as a conflict. This is a
//! uniqueness-seeking retry loop, not a cryptographic mechanism: at the
//! application's expected scale (tens of users against nine billion
//! candidates) a collision is vanishingly rare and a second draw
//! resolves it.

use crate::entities::{TeamSetting, UserProfile, team_setting, user_profile};
use crate::errors::{Error, Result};
use rand::Rng;
use sea_orm::{ConnectionTrait, prelude::*};

/// Number of digits in a generated work phone.
pub const WORK_PHONE_DIGITS: usize = 10;

/// Generation attempts before giving up with a conflict.
const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Draws one candidate from the full ten-digit range.
fn random_candidate() -> String {
    let mut rng = rand::rng();
    rng.random_range(1_000_000_000_u64..=9_999_999_999_u64).to_string()
}

/// Whether any identity or team-setting record already holds `phone`.
pub async fn is_work_phone_taken<C>(conn: &C, phone: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let profile = UserProfile::find()
        .filter(user_profile::Column::WorkPhone.eq(phone))
        .one(conn)
        .await?;
    if profile.is_some() {
        return Ok(true);
    }

    let setting = TeamSetting::find()
        .filter(team_setting::Column::WorkPhone.eq(phone))
        .one(conn)
        .await?;
    Ok(setting.is_some())
}

/// Retry loop over an injectable candidate source.
///
/// Separated from [`generate_unique_work_phone`] so the collision path
/// can be exercised deterministically in tests.
pub(crate) async fn generate_unique_work_phone_with<C, F>(
    conn: &C,
    mut next_candidate: F,
) -> Result<String>
where
    C: ConnectionTrait,
    F: FnMut() -> String,
{
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let candidate = next_candidate();
        if !is_work_phone_taken(conn, &candidate).await? {
            return Ok(candidate);
        }
    }

    Err(Error::Conflict {
        message: format!(
            "could not generate a unique work phone after {MAX_GENERATION_ATTEMPTS} attempts"
        ),
    })
}

/// Generates a work phone that is unique across all identities.
pub async fn generate_unique_work_phone<C>(conn: &C) -> Result<String>
where
    C: ConnectionTrait,
{
    generate_unique_work_phone_with(conn, random_candidate).await
}

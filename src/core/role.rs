//! Role model and derived account attributes.
//!
//! An identity stores only its `role` flag. Account level and manager
//! status are pure functions of the role, computed here and never
//! persisted, so the pair can never drift out of sync with the role:
//! `Admin` maps to (`Manager`, true), `Regular` maps to
//! (`Developer`, false).

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse role flag carried by every identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrative role, maps to the manager account level
    Admin,
    /// Regular role, maps to the developer account level
    Regular,
}

/// Derived coarse classification mirroring [`Role`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountLevel {
    /// Derived from [`Role::Admin`]
    Manager,
    /// Derived from [`Role::Regular`]
    Developer,
}

impl Role {
    /// Parses a stored role string.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for anything other than `"admin"`
    /// or `"regular"`.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "admin" => Ok(Self::Admin),
            "regular" => Ok(Self::Regular),
            other => Err(Error::Validation {
                message: format!("unrecognized role: {other:?}"),
            }),
        }
    }

    /// The stored string form of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Regular => "regular",
        }
    }

    /// Account level derived from the role.
    #[must_use]
    pub const fn account_level(self) -> AccountLevel {
        match self {
            Self::Admin => AccountLevel::Manager,
            Self::Regular => AccountLevel::Developer,
        }
    }

    /// Manager flag derived from the role.
    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl AccountLevel {
    /// The string form of the account level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Developer => "developer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AccountLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_admin_derives_manager() {
        let role = Role::parse("admin").unwrap();
        assert_eq!(role.account_level(), AccountLevel::Manager);
        assert!(role.is_manager());
    }

    #[test]
    fn test_regular_derives_developer() {
        let role = Role::parse("regular").unwrap();
        assert_eq!(role.account_level(), AccountLevel::Developer);
        assert!(!role.is_manager());
    }

    #[test]
    fn test_mapping_is_exhaustive_and_consistent() {
        // role = admin iff account_level = manager iff is_manager
        for role in [Role::Admin, Role::Regular] {
            assert_eq!(role == Role::Admin, role.is_manager());
            assert_eq!(
                role.account_level() == AccountLevel::Manager,
                role.is_manager()
            );
        }
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!(Role::parse("superuser").is_err());
        assert!(Role::parse("Admin").is_err());
        assert!(Role::parse("").is_err());
        let err = Role::parse("root").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_round_trip() {
        for role in [Role::Admin, Role::Regular] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
    }
}

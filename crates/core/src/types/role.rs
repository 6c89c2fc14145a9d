//! Account roles.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a role tag is not one of the known roles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Select a valid choice. {0} is not one of the available choices.")]
pub struct UnknownRole(pub String);

/// The role assigned to an account at creation.
///
/// Roles never change after assignment. Every authorization decision matches
/// on this enum exhaustively, see [`crate::access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "storefront.user_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A customer who shops and checks out.
    EndUser,
    /// A shop owner managing the products they added.
    Owner,
    /// Unrestricted catalog and order access.
    Admin,
}

impl Role {
    /// The stored tag for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EndUser => "enduser",
            Self::Owner => "owner",
            Self::Admin => "admin",
        }
    }

    /// Whether a visitor may choose this role at registration.
    #[must_use]
    pub const fn is_self_selectable(&self) -> bool {
        match self {
            Self::EndUser | Self::Owner => true,
            Self::Admin => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "enduser" => Ok(Self::EndUser),
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_stored_tag() {
        for role in [Role::EndUser, Role::Owner, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_admin_is_not_self_selectable() {
        assert!(!Role::Admin.is_self_selectable());
        assert!(Role::EndUser.is_self_selectable());
        assert!(Role::Owner.is_self_selectable());
    }

    #[test]
    fn test_serde_uses_stored_tag() {
        assert_eq!(serde_json::to_string(&Role::EndUser).unwrap(), "\"enduser\"");
    }

    #[test]
    fn test_unknown_role() {
        assert_eq!("staff".parse::<Role>(), Err(UnknownRole("staff".to_owned())));
    }
}

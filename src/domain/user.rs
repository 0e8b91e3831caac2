//! User domain types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User role in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular user. Sees verified events and their own.
    Member,
    /// Elevated role with unrestricted read access.
    Superuser,
}

impl UserRole {
    /// Check if this role has unrestricted access.
    pub fn is_superuser(&self) -> bool {
        matches!(self, UserRole::Superuser)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Member => write!(f, "member"),
            UserRole::Superuser => write!(f, "superuser"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(UserRole::Member),
            "superuser" => Ok(UserRole::Superuser),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Member
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Member.to_string(), "member");
        assert_eq!(UserRole::Superuser.to_string(), "superuser");
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!("SUPERUSER".parse::<UserRole>().unwrap(), UserRole::Superuser);
        assert_eq!("member".parse::<UserRole>().unwrap(), UserRole::Member);
        assert!("staff".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_default_role_is_member() {
        assert_eq!(UserRole::default(), UserRole::Member);
        assert!(!UserRole::default().is_superuser());
    }
}

//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user can hold inside a firm.
///
/// The session core only carries the role inside the credential; it never
/// evaluates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Firm administrator.
    Admin,
    /// Practicing lawyer.
    Lawyer,
    /// Paralegal or office staff.
    Staff,
}

impl UserRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Lawyer => "lawyer",
            Self::Staff => "staff",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Staff
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = lexdesk_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "lawyer" => Ok(Self::Lawyer),
            "staff" => Ok(Self::Staff),
            _ => Err(lexdesk_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, lawyer, staff"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("LAWYER".parse::<UserRole>().unwrap(), UserRole::Lawyer);
        assert!("partner".parse::<UserRole>().is_err());
    }
}

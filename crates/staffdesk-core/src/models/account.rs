use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Employee,
    /// A role this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Roles allowed to manage companies, departments and employees.
    pub fn can_manage(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }

    /// User accounts are visible to admins only.
    pub fn can_view_accounts(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "manager" => Some(UserRole::Manager),
            "employee" => Some(UserRole::Employee),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserRole::Admin => "Admin",
            UserRole::Manager => "Manager",
            UserRole::Employee => "Employee",
            UserRole::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: UserRole,
}

/// Headline counters from the dashboard endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_companies: i64,
    pub total_departments: i64,
    pub total_employees: i64,
}

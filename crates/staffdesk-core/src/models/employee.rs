use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Related;
use crate::api::ApiError;

/// Phone numbers the server accepts: optional `+`, optional leading `1`,
/// then 8 to 15 digits.
const PHONE_PATTERN: &str = r"^\+?1?\d{8,15}$";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

fn validate_phone(phone: &str) -> Result<(), ApiError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Phone number must be 8 to 15 digits with optional leading +: {}",
            phone
        )))
    }
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

/// Hiring pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    ApplicationReceived,
    InterviewScheduled,
    Hired,
    NotAccepted,
}

impl EmployeeStatus {
    pub const ALL: [EmployeeStatus; 4] = [
        EmployeeStatus::ApplicationReceived,
        EmployeeStatus::InterviewScheduled,
        EmployeeStatus::Hired,
        EmployeeStatus::NotAccepted,
    ];

    /// Wire value, e.g. `interview_scheduled`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::ApplicationReceived => "application_received",
            EmployeeStatus::InterviewScheduled => "interview_scheduled",
            EmployeeStatus::Hired => "hired",
            EmployeeStatus::NotAccepted => "not_accepted",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmployeeStatus::ApplicationReceived => "Application Received",
            EmployeeStatus::InterviewScheduled => "Interview Scheduled",
            EmployeeStatus::Hired => "Hired",
            EmployeeStatus::NotAccepted => "Not Accepted Yet",
        }
    }

    /// Accepts the wire value, with `-` or `_` separators, any case.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|status| status.as_str() == normalized)
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub company: Related,
    pub department: Related,
    #[serde(default)]
    pub status: EmployeeStatus,
    pub employee_name: Option<String>,
    pub employee_email: Option<String>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub designation: String,
    pub hired_date: Option<NaiveDate>,
    #[serde(default)]
    pub day_employee: i64,
}

impl Employee {
    pub fn display_name(&self) -> &str {
        self.employee_name.as_deref().unwrap_or("(unnamed)")
    }

    /// Days since hire as of `today`, 0 when not hired.
    pub fn days_employed(&self, today: NaiveDate) -> i64 {
        self.hired_date
            .map(|hired| (today - hired).num_days().max(0))
            .unwrap_or(0)
    }
}

/// Payload for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_name: String,
    pub employee_email: String,
    pub phone_number: String,
    pub address: String,
    pub company: i64,
    pub department: i64,
    pub designation: String,
}

impl NewEmployee {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("employee_name", &self.employee_name)?;
        require("address", &self.address)?;
        require("designation", &self.designation)?;
        validate_phone(&self.phone_number)
    }
}

/// Partial update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hired_date: Option<NaiveDate>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::Validation("Nothing to update".to_string()));
        }
        if let Some(ref phone) = self.phone_number {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

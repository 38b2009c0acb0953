//! Data models for the employee-management API.
//!
//! - `Company`, `Department`: organization structure
//! - `Employee`, `EmployeeStatus`, `NewEmployee`, `EmployeeUpdate`: staff records
//! - `UserAccount`, `UserRole`: dashboard users
//! - `DashboardStats`: headline counters
//! - `Page`: paginated list payloads

pub mod account;
pub mod employee;
pub mod organization;
pub mod page;

pub use account::{DashboardStats, UserAccount, UserRole};
pub use employee::{Employee, EmployeeStatus, EmployeeUpdate, NewEmployee};
pub use organization::{Company, Department, Related};
pub use page::Page;

//! Command-line definitions.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "staffdesk")]
#[command(version)]
#[command(about = "Manage companies, departments and employees from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (default: config file, then http://localhost:8000/api/v1)
    #[arg(long, global = true, env = "STAFFDESK_API_URL")]
    pub base_url: Option<String>,

    /// Where to keep credentials: keyring, file or memory
    #[arg(long, global = true, value_name = "BACKEND")]
    pub storage: Option<String>,

    /// Also write logs to a daily file in the cache directory
    #[arg(long, global = true)]
    pub log_file: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Status,
    /// Renew the access token now
    Refresh,
    /// Show headline counters
    Dashboard,
    /// Browse companies
    Companies {
        #[command(subcommand)]
        command: Option<ListCommands>,
    },
    /// Browse departments
    Departments {
        #[command(subcommand)]
        command: Option<ListCommands>,
    },
    /// Browse and manage employees
    Employees {
        #[command(subcommand)]
        command: Option<EmployeeCommands>,
    },
    /// List user accounts (admins only)
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand, Clone)]
pub enum ListCommands {
    /// One page of results
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Every record, unpaginated
    All,
    /// A single record
    Show { id: i64 },
}

#[derive(clap::Args, Clone, Default)]
pub struct EmployeeFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub company: Option<i64>,
    #[arg(long)]
    pub department: Option<i64>,
    #[arg(long)]
    pub designation: Option<String>,
}

#[derive(Subcommand, Clone)]
pub enum EmployeeCommands {
    /// One page of employees
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Hired employees only
    Hired {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// A single employee
    Show { id: i64 },
    /// Add an employee
    Create {
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Change an employee's details
    Update {
        id: i64,
        #[command(flatten)]
        fields: EmployeeFields,
        /// New hiring status
        #[arg(long)]
        status: Option<String>,
    },
    /// Remove an employee
    Delete { id: i64 },
    /// Move an employee through the hiring pipeline
    SetStatus {
        id: i64,
        /// application_received, interview_scheduled, hired or not_accepted
        status: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nested_employee_update() {
        let cli = Cli::try_parse_from([
            "staffdesk",
            "--storage",
            "memory",
            "employees",
            "update",
            "7",
            "--designation",
            "Lead",
            "--status",
            "hired",
        ])
        .unwrap();
        assert_eq!(cli.storage.as_deref(), Some("memory"));
        match cli.command {
            Commands::Employees {
                command: Some(EmployeeCommands::Update { id, fields, status }),
            } => {
                assert_eq!(id, 7);
                assert_eq!(fields.designation.as_deref(), Some("Lead"));
                assert_eq!(status.as_deref(), Some("hired"));
            }
            _ => panic!("wrong command parsed"),
        }
    }

    #[test]
    fn test_list_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["staffdesk", "companies", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Companies {
                command: Some(ListCommands::List { page: 1 })
            }
        ));
    }
}

//! Command handlers.

use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use staffdesk_core::models::{EmployeeStatus, EmployeeUpdate, NewEmployee, UserRole};
use staffdesk_core::{ApiClient, Config};
use tracing::warn;

use crate::cli::{Commands, EmployeeCommands, EmployeeFields, ListCommands};
use crate::render;

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

fn prompt_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    Ok(password)
}

fn parse_status(s: &str) -> Result<EmployeeStatus> {
    EmployeeStatus::parse(s).ok_or_else(|| {
        anyhow!(
            "Unknown status '{}' (expected application_received, interview_scheduled, hired or not_accepted)",
            s
        )
    })
}

fn require<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.ok_or_else(|| anyhow!("--{} is required", flag))
}

fn new_employee(fields: EmployeeFields) -> Result<NewEmployee> {
    Ok(NewEmployee {
        employee_name: require(fields.name, "name")?,
        employee_email: require(fields.email, "email")?,
        phone_number: require(fields.phone, "phone")?,
        address: require(fields.address, "address")?,
        company: require(fields.company, "company")?,
        department: require(fields.department, "department")?,
        designation: require(fields.designation, "designation")?,
    })
}

fn employee_update(fields: EmployeeFields, status: Option<&str>) -> Result<EmployeeUpdate> {
    Ok(EmployeeUpdate {
        employee_name: fields.name,
        employee_email: fields.email,
        phone_number: fields.phone,
        address: fields.address,
        company: fields.company,
        department: fields.department,
        designation: fields.designation,
        status: status.map(parse_status).transpose()?,
        hired_date: None,
    })
}

pub async fn run(command: Commands, client: &ApiClient, config: &mut Config) -> Result<()> {
    match command {
        Commands::Login { email } => login(client, config, email).await,
        Commands::Logout => {
            client.auth().logout();
            println!("Logged out.");
            Ok(())
        }
        Commands::Status => {
            let session = client.store().session();
            if !session.is_authenticated() {
                println!("Not logged in.");
            } else {
                let who = session
                    .display_identity()
                    .unwrap_or_else(|| "unknown user".to_string());
                println!("Logged in as {}.", who);
                if !session.can_refresh() {
                    println!("No refresh token stored; the session ends when the access token expires.");
                }
            }
            Ok(())
        }
        Commands::Refresh => {
            let result = client.auth().refresh_token().await;
            if !result.success {
                bail!("Token refresh failed: {}", result.failure_text());
            }
            println!("Access token renewed.");
            Ok(())
        }
        Commands::Dashboard => {
            let stats = client.dashboard().await?;
            println!("{}", render::dashboard(&stats));
            Ok(())
        }
        Commands::Companies { command } => {
            match command.unwrap_or(ListCommands::List { page: 1 }) {
                ListCommands::List { page } => {
                    let results = client.companies(page).await?;
                    println!("{}", render::companies(&results.results));
                    println!("{}", render::page_footer(&results, page));
                }
                ListCommands::All => {
                    println!("{}", render::companies(&client.all_companies().await?));
                }
                ListCommands::Show { id } => {
                    println!("{}", render::companies(&[client.company(id).await?]));
                }
            }
            Ok(())
        }
        Commands::Departments { command } => {
            match command.unwrap_or(ListCommands::List { page: 1 }) {
                ListCommands::List { page } => {
                    let results = client.departments(page).await?;
                    println!("{}", render::departments(&results.results));
                    println!("{}", render::page_footer(&results, page));
                }
                ListCommands::All => {
                    println!("{}", render::departments(&client.all_departments().await?));
                }
                ListCommands::Show { id } => {
                    println!("{}", render::departments(&[client.department(id).await?]));
                }
            }
            Ok(())
        }
        Commands::Employees { command } => {
            employees(client, command.unwrap_or(EmployeeCommands::List { page: 1 })).await
        }
        Commands::Users { page } => {
            let role = client.auth().user_role();
            if let Some(role) = role.as_deref().and_then(UserRole::parse) {
                if !role.can_view_accounts() {
                    warn!(%role, "User accounts are restricted to admins");
                }
            }
            let results = client.user_accounts(page).await?;
            println!("{}", render::users(&results.results));
            println!("{}", render::page_footer(&results, page));
            Ok(())
        }
    }
}

async fn login(client: &ApiClient, config: &mut Config, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| config.last_email.clone()) {
        Some(email) if !email.is_empty() => email,
        _ => prompt_email()?,
    };
    let password = prompt_password()?;
    if email.is_empty() || password.is_empty() {
        bail!("Email and password required");
    }

    let result = client.auth().login(&email, &password).await;
    if !result.success {
        bail!("Login failed: {}", result.failure_text());
    }

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let name = result
        .data
        .and_then(|d| d.name)
        .unwrap_or_else(|| "user".to_string());
    println!("Welcome, {}.", name);
    Ok(())
}

async fn employees(client: &ApiClient, command: EmployeeCommands) -> Result<()> {
    match command {
        EmployeeCommands::List { page } => {
            let results = client.employees(page).await?;
            println!("{}", render::employees(&results.results));
            println!("{}", render::page_footer(&results, page));
        }
        EmployeeCommands::Hired { page } => {
            let results = client.hired_employees(page).await?;
            println!("{}", render::employees(&results.results));
            println!("{}", render::page_footer(&results, page));
        }
        EmployeeCommands::Show { id } => {
            println!("{}", render::employee_detail(&client.employee(id).await?));
        }
        EmployeeCommands::Create { fields } => {
            let employee = new_employee(fields)?;
            let created = client
                .create_employee(&employee)
                .await
                .context("Failed to create employee")?;
            println!("Created employee {}.", created.id);
        }
        EmployeeCommands::Update { id, fields, status } => {
            let update = employee_update(fields, status.as_deref())?;
            let updated = client
                .update_employee(id, &update)
                .await
                .context("Failed to update employee")?;
            println!("{}", render::employee_detail(&updated));
        }
        EmployeeCommands::Delete { id } => {
            client
                .delete_employee(id)
                .await
                .context("Failed to delete employee")?;
            println!("Deleted employee {}.", id);
        }
        EmployeeCommands::SetStatus { id, status } => {
            let status = parse_status(&status)?;
            let updated = client.set_employee_status(id, status).await?;
            println!("{} is now {}.", updated.display_name(), updated.status);
        }
    }
    Ok(())
}

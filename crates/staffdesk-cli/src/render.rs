//! Plain-text tables for command output.

use chrono::Local;
use comfy_table::{ContentArrangement, Table};
use staffdesk_core::models::{
    Company, DashboardStats, Department, Employee, Page, UserAccount,
};

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn page_footer<T>(page: &Page<T>, current: u32) -> String {
    let mut footer = format!("Page {} - {} total", current.max(1), page.count);
    if page.has_previous() {
        let previous = current.saturating_sub(1).max(1);
        footer.push_str(&format!("  [--page {} for previous]", previous));
    }
    if page.has_next() {
        footer.push_str(&format!("  [--page {} for next]", current.saturating_add(1)));
    }
    footer
}

pub fn dashboard(stats: &DashboardStats) -> String {
    let mut t = table(&["Companies", "Departments", "Employees"]);
    t.add_row(vec![
        stats.total_companies.to_string(),
        stats.total_departments.to_string(),
        stats.total_employees.to_string(),
    ]);
    t.to_string()
}

pub fn companies(items: &[Company]) -> String {
    let mut t = table(&["ID", "Name", "Departments", "Employees"]);
    for c in items {
        t.add_row(vec![
            c.id.to_string(),
            c.name.clone(),
            c.number_of_department.to_string(),
            c.number_of_employee.to_string(),
        ]);
    }
    t.to_string()
}

pub fn departments(items: &[Department]) -> String {
    let mut t = table(&["ID", "Name", "Company", "Employees"]);
    for d in items {
        t.add_row(vec![
            d.id.to_string(),
            d.name.clone(),
            d.company.display(),
            d.number_of_employee.to_string(),
        ]);
    }
    t.to_string()
}

pub fn employees(items: &[Employee]) -> String {
    let today = Local::now().date_naive();
    let mut t = table(&[
        "ID",
        "Name",
        "Email",
        "Phone",
        "Company",
        "Department",
        "Designation",
        "Status",
        "Hired",
        "Days",
    ]);
    for e in items {
        t.add_row(vec![
            e.id.to_string(),
            e.display_name().to_string(),
            or_dash(e.employee_email.as_deref()),
            or_dash(Some(e.phone_number.as_str())),
            e.company.display(),
            e.department.display(),
            or_dash(Some(e.designation.as_str())),
            e.status.to_string(),
            e.hired_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            e.days_employed(today).to_string(),
        ]);
    }
    t.to_string()
}

pub fn employee_detail(e: &Employee) -> String {
    let today = Local::now().date_naive();
    let mut t = table(&["Field", "Value"]);
    let rows = [
        ("ID", e.id.to_string()),
        ("Name", e.display_name().to_string()),
        ("Email", or_dash(e.employee_email.as_deref())),
        ("Phone", or_dash(Some(e.phone_number.as_str()))),
        ("Address", or_dash(Some(e.address.as_str()))),
        ("Company", e.company.display()),
        ("Department", e.department.display()),
        ("Designation", or_dash(Some(e.designation.as_str()))),
        ("Status", e.status.to_string()),
        (
            "Hired",
            e.hired_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("Days employed", e.days_employed(today).to_string()),
    ];
    for (field, value) in rows {
        t.add_row(vec![field.to_string(), value]);
    }
    t.to_string()
}

pub fn users(items: &[UserAccount]) -> String {
    let mut t = table(&["ID", "Name", "Email", "Role"]);
    for u in items {
        t.add_row(vec![
            u.id.to_string(),
            or_dash(Some(u.name.as_str())),
            u.email.clone(),
            u.role.to_string(),
        ]);
    }
    t.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_companies_table_contains_rows() {
        let out = companies(&[Company {
            id: 3,
            name: "Acme".to_string(),
            number_of_department: 2,
            number_of_employee: 11,
        }]);
        assert!(out.contains("Acme"));
        assert!(out.contains("Departments"));
        assert!(out.contains("11"));
    }

    #[test]
    fn test_page_footer_navigation_hints() {
        let page: Page<i64> = Page {
            count: 30,
            next: Some("n".to_string()),
            previous: Some("p".to_string()),
            results: vec![],
        };
        let footer = page_footer(&page, 2);
        assert!(footer.starts_with("Page 2 - 30 total"));
        assert!(footer.contains("--page 1 for previous"));
        assert!(footer.contains("--page 3 for next"));
    }

    #[test]
    fn test_page_footer_on_last_representable_page() {
        let page: Page<i64> = Page {
            count: 1,
            next: Some("n".to_string()),
            previous: None,
            results: vec![],
        };
        let footer = page_footer(&page, u32::MAX);
        assert!(footer.contains(&format!("--page {} for next", u32::MAX)));
    }
}

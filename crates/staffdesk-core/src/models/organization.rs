use serde::{Deserialize, Serialize};

/// A foreign key as the API returns it: a bare id or a nested `{id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Related {
    Id(i64),
    Named { id: i64, name: String },
}

impl Related {
    pub fn id(&self) -> i64 {
        match self {
            Related::Id(id) | Related::Named { id, .. } => *id,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Related::Id(id) => format!("#{}", id),
            Related::Named { name, .. } => name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub number_of_department: i64,
    #[serde(default)]
    pub number_of_employee: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub company: Related,
    #[serde(default)]
    pub number_of_employee: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_accepts_id_or_nested_company() {
        let flat: Department = serde_json::from_str(
            r#"{"id": 2, "name": "R&D", "company": 7, "number_of_employee": 4}"#,
        )
        .unwrap();
        assert_eq!(flat.company.id(), 7);
        assert_eq!(flat.company.display(), "#7");

        let nested: Department = serde_json::from_str(
            r#"{"id": 2, "name": "R&D", "company": {"id": 7, "name": "Acme"}}"#,
        )
        .unwrap();
        assert_eq!(nested.company.id(), 7);
        assert_eq!(nested.company.display(), "Acme");
        assert_eq!(nested.number_of_employee, 0);
    }
}

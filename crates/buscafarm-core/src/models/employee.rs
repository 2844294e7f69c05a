use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ordered_fields, str_attribute, RecordId};

/// Field under which the sessions endpoint nests the employee's pharmacy.
pub const PHARMACY_FIELD: &str = "pharmacie";

/// A pharmacy employee as returned by `sessions/employees`, minus the
/// nested pharmacy record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: RecordId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Employee {
    pub fn name(&self) -> Option<&str> {
        str_attribute(&self.attributes, "name")
    }

    pub fn email(&self) -> Option<&str> {
        str_attribute(&self.attributes, "email")
    }

    pub fn display_name(&self) -> String {
        match (self.name(), self.email()) {
            (Some(name), _) if !name.is_empty() => name.to_string(),
            (_, Some(email)) if !email.is_empty() => email.to_string(),
            _ => format!("Employee #{}", self.id),
        }
    }

    /// Field/value pairs in display order: id, name, email, then the rest
    /// sorted by key.
    pub fn fields(&self) -> Vec<(String, String)> {
        ordered_fields(&self.id, &self.attributes, &["name", "email"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_preserves_unknown_fields() {
        let json = r#"{"id":1,"name":"A","role":"pharmacist","active":true}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, RecordId::Number(1));
        assert_eq!(employee.name(), Some("A"));
        assert_eq!(employee.email(), None);
        assert_eq!(employee.attributes.get("role"), Some(&Value::from("pharmacist")));

        let back: Value = serde_json::to_value(&employee).unwrap();
        let original: Value = serde_json::from_str(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_employee_keeps_nulls_and_odd_types() {
        let json = r#"{"id":1,"name":{"first":"A"},"email":null}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.name(), None);
        assert_eq!(employee.email(), None);
        assert_eq!(employee.display_name(), "Employee #1");

        let back: Value = serde_json::to_value(&employee).unwrap();
        let original: Value = serde_json::from_str(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_employee_display_name_fallbacks() {
        let mut employee: Employee = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert_eq!(employee.display_name(), "Employee #7");

        employee.attributes.insert("email".to_string(), Value::from("ana@farm.com"));
        assert_eq!(employee.display_name(), "ana@farm.com");

        employee.attributes.insert("name".to_string(), Value::from("Ana"));
        assert_eq!(employee.display_name(), "Ana");
    }

    #[test]
    fn test_employee_fields_order() {
        let employee: Employee =
            serde_json::from_str(r#"{"id":1,"zeta":1,"name":"A","alpha":null}"#).unwrap();
        let keys: Vec<_> = employee.fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["id", "name", "alpha", "zeta"]);
    }
}

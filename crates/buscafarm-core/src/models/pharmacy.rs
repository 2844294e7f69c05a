use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ordered_fields, str_attribute, RecordId};

/// The pharmacy an employee works for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: RecordId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Pharmacy {
    pub fn name(&self) -> Option<&str> {
        str_attribute(&self.attributes, "name")
    }

    /// Brazilian company registry number
    pub fn cnpj(&self) -> Option<&str> {
        str_attribute(&self.attributes, "cnpj")
    }

    pub fn phone(&self) -> Option<&str> {
        str_attribute(&self.attributes, "phone")
    }

    pub fn display_name(&self) -> String {
        match self.name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Pharmacy #{}", self.id),
        }
    }

    pub fn fields(&self) -> Vec<(String, String)> {
        ordered_fields(&self.id, &self.attributes, &["name", "cnpj", "phone"])
    }
}

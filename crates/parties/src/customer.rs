use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use bookstore_core::criteria::{contains_opt_str, contains_str};
use bookstore_core::{Entity, EntityId};

/// Contact information for a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Customer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: EntityId,
    pub name: String,
    pub contact: ContactInfo,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
            contact: ContactInfo::default(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.contact.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.contact.address = Some(address.into());
        self
    }
}

impl Entity for Customer {
    const KIND: &'static str = "customer";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn field_matches(&self, field: &str, value: &JsonValue) -> Option<bool> {
        match field {
            "name" => Some(contains_str(&self.name, value)),
            "email" => Some(contains_opt_str(self.contact.email.as_deref(), value)),
            "address" => Some(contains_opt_str(self.contact.address.as_deref(), value)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::SearchCriteria;

    #[test]
    fn missing_contact_field_never_matches() {
        let customer = Customer::new("Ada Lovelace");
        assert!(!SearchCriteria::all().with("email", "@").matches(&customer));
        assert!(SearchCriteria::all().with("name", "Ada").matches(&customer));
    }

    #[test]
    fn contact_filters_use_substring() {
        let customer = Customer::new("Ada")
            .with_email("ada@example.org")
            .with_address("12 Analytical Row");
        let c = SearchCriteria::all()
            .with("email", "example")
            .with("address", "Row");
        assert!(c.matches(&customer));
    }

    #[test]
    fn contact_defaults_when_omitted() {
        let customer: Customer = serde_json::from_str(r#"{"name":"Grace"}"#).unwrap();
        assert_eq!(customer.contact, ContactInfo::default());
    }
}

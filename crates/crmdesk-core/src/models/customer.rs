use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

super::wire_enum! {
    /// Pipeline status of a customer
    pub enum CustomerStatus {
        New => ("new", "New"),
        Contacted => ("contacted", "Contacted"),
        Qualified => ("qualified", "Qualified"),
    }
}

impl Default for CustomerStatus {
    fn default() -> Self {
        CustomerStatus::New
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_status", deserialize_with = "super::wire_or_default::<_, CustomerStatus>")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

fn default_status() -> String {
    CustomerStatus::New.as_str().to_string()
}

impl Customer {
    pub fn status_label(&self) -> &str {
        CustomerStatus::label_for(&self.status)
    }

    /// Label used when a customer is offered as a choice, e.g. for tasks
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.company)
    }
}

/// Payload for `POST customers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewCustomer {
    pub name: String,
    pub company: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: CustomerStatus,
    #[serde(default)]
    pub notes: String,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, company: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            email: email.into(),
            phone: String::new(),
            status: CustomerStatus::default(),
            notes: String::new(),
        }
    }
}

/// Payload for `PUT customers/{id}`; only the fields that are set are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CustomerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_customer_from_api() {
        let value = json!({
            "id": 7,
            "name": "Ana Torres",
            "company": "Acme",
            "email": "ana@acme.test",
            "phone": null,
            "status": "contacted",
            "notes": "",
            "created_at": "2024-03-05T14:22:01.123456"
        });
        let customer: Customer = serde_json::from_value(value).unwrap();
        assert_eq!(customer.id, 7);
        assert_eq!(customer.phone, None);
        assert_eq!(customer.status_label(), "Contacted");
        assert_eq!(customer.option_label(), "Ana Torres (Acme)");
    }

    #[test]
    fn test_unknown_status_shown_verbatim() {
        let value = json!({
            "id": 1, "name": "B", "company": "C", "email": "e",
            "status": "archived", "created_at": "2024-03-05T14:22:01"
        });
        let customer: Customer = serde_json::from_value(value).unwrap();
        assert_eq!(customer.status_label(), "archived");
    }

    #[test]
    fn test_null_status_reads_as_new() {
        let value = json!({
            "id": 2, "name": "B", "company": "C", "email": "e",
            "status": null, "created_at": "2024-03-05T14:22:01"
        });
        let customer: Customer = serde_json::from_value(value).unwrap();
        assert_eq!(customer.status, "new");
        assert_eq!(customer.status_label(), "New");
    }

    #[test]
    fn test_new_customer_payload() {
        let mut new = NewCustomer::new("Ana", "Acme", "ana@acme.test");
        new.status = CustomerStatus::Qualified;
        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(value["status"], "qualified");
        assert_eq!(value["phone"], "");
    }

    #[test]
    fn test_update_sends_only_set_fields() {
        let update = CustomerUpdate {
            phone: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"phone": ""}));
        assert!(CustomerUpdate::default().is_empty());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("QUALIFIED".parse::<CustomerStatus>(), Ok(CustomerStatus::Qualified));
        assert!("lost".parse::<CustomerStatus>().is_err());
    }
}

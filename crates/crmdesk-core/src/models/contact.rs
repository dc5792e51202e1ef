use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A person working at one of the user's customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Contact {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub customer_id: i64,
    #[serde(default)]
    pub customer_name: String,
    pub created_at: NaiveDateTime,
}

impl Contact {
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.customer_name)
    }
}

/// Payload for `POST contacts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub customer_id: i64,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl NewContact {
    pub fn new(name: impl Into<String>, email: impl Into<String>, customer_id: i64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            customer_id,
            position: String::new(),
            phone: String::new(),
            notes: String::new(),
        }
    }
}

/// Payload for `PUT contacts/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_contact_from_api() {
        let value = json!({
            "id": 3,
            "name": "Luis",
            "position": "CTO",
            "email": "luis@acme.test",
            "phone": "",
            "notes": null,
            "customer_id": 7,
            "customer_name": "Ana Torres",
            "created_at": "2024-03-05T14:22:01.5"
        });
        let contact: Contact = serde_json::from_value(value).unwrap();
        assert_eq!(contact.customer_id, 7);
        assert_eq!(contact.position.as_deref(), Some("CTO"));
        assert_eq!(contact.option_label(), "Luis (Ana Torres)");
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

super::wire_enum! {
    /// Sales stage of a deal
    pub enum DealStage {
        Prospect => ("prospect", "Prospect"),
        Negotiation => ("negotiation", "Negotiation"),
        Proposal => ("proposal", "Proposal"),
        Won => ("won", "Won"),
        Lost => ("lost", "Lost"),
    }
}

impl Default for DealStage {
    fn default() -> Self {
        DealStage::Prospect
    }
}

impl DealStage {
    /// Stages counted as open deals on the dashboard
    pub fn is_open(&self) -> bool {
        matches!(self, DealStage::Prospect | DealStage::Negotiation | DealStage::Proposal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Deal {
    pub id: i64,
    pub title: String,
    pub value: f64,
    #[serde(default = "default_stage", deserialize_with = "super::wire_or_default::<_, DealStage>")]
    pub stage: String,
    #[serde(default)]
    pub close_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    pub customer_id: i64,
    #[serde(default)]
    pub customer_name: String,
    pub created_at: NaiveDateTime,
}

fn default_stage() -> String {
    DealStage::Prospect.as_str().to_string()
}

impl Deal {
    pub fn stage_label(&self) -> &str {
        DealStage::label_for(&self.stage)
    }

    pub fn is_open(&self) -> bool {
        DealStage::parse(&self.stage).is_some_and(|s| s.is_open())
    }

    pub fn option_label(&self) -> String {
        format!("{} ({})", self.title, self.customer_name)
    }
}

/// Payload for `POST deals`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewDeal {
    pub title: String,
    pub value: f64,
    pub customer_id: i64,
    #[serde(default)]
    pub stage: DealStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl NewDeal {
    pub fn new(title: impl Into<String>, value: f64, customer_id: i64) -> Self {
        Self {
            title: title.into(),
            value,
            customer_id,
            stage: DealStage::default(),
            close_date: None,
            notes: String::new(),
        }
    }
}

/// Payload for `PUT deals/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct DealUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<DealStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
}

impl DealUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_deal_without_close_date() {
        let value = json!({
            "id": 4,
            "title": "Renewal",
            "value": 1200,
            "stage": "negotiation",
            "close_date": null,
            "notes": "",
            "customer_id": 7,
            "customer_name": "Ana Torres",
            "created_at": "2024-03-05T14:22:01.123456"
        });
        let deal: Deal = serde_json::from_value(value).unwrap();
        assert_eq!(deal.value, 1200.0);
        assert_eq!(deal.close_date, None);
        assert_eq!(deal.stage_label(), "Negotiation");
        assert!(deal.is_open());
    }

    #[test]
    fn test_null_stage_reads_as_prospect() {
        let value = json!({
            "id": 5, "title": "Pilot", "value": 0, "stage": null,
            "customer_id": 7, "created_at": "2024-03-05T14:22:01"
        });
        let deal: Deal = serde_json::from_value(value).unwrap();
        assert_eq!(deal.stage_label(), "Prospect");
        assert!(deal.is_open());
    }

    #[test]
    fn test_closed_stages_are_not_open() {
        assert!(!DealStage::Won.is_open());
        assert!(!DealStage::Lost.is_open());
        assert!(DealStage::Proposal.is_open());
    }

    #[test]
    fn test_new_deal_serializes_date() {
        let mut deal = NewDeal::new("Renewal", 99.5, 7);
        deal.close_date = NaiveDate::from_ymd_opt(2024, 6, 30);
        let value = serde_json::to_value(&deal).unwrap();
        assert_eq!(value["close_date"], "2024-06-30");
        assert_eq!(value["stage"], "prospect");
    }
}

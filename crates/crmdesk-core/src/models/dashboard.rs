use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

super::wire_enum! {
    /// What a dashboard activity entry is about
    pub enum ActivityKind {
        Customer => ("customer", "Customer"),
        Contact => ("contact", "Contact"),
        Deal => ("deal", "Deal"),
        Task => ("task", "Task"),
    }
}

/// Summary returned by `GET dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Dashboard {
    pub customer_count: u64,
    pub open_deals: u64,
    /// Value of deals won with a close date in the current month
    pub month_revenue: f64,
    pub pending_tasks: u64,
    #[serde(default)]
    pub recent_activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub time: NaiveDateTime,
}

impl Activity {
    pub fn kind(&self) -> Option<ActivityKind> {
        ActivityKind::parse(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_dashboard() {
        let value = json!({
            "customer_count": 4,
            "open_deals": 2,
            "month_revenue": 0,
            "pending_tasks": 3,
            "recent_activities": [
                {"type": "deal", "message": "Deal created", "time": "2024-03-05T14:22:01.123456"},
                {"type": "note", "message": "Something", "time": "2024-03-04T09:00:00"}
            ]
        });
        let dashboard: Dashboard = serde_json::from_value(value).unwrap();
        assert_eq!(dashboard.customer_count, 4);
        assert_eq!(dashboard.month_revenue, 0.0);
        assert_eq!(dashboard.recent_activities[0].kind(), Some(ActivityKind::Deal));
        assert_eq!(dashboard.recent_activities[1].kind(), None);
    }
}

//! `key=value` arguments for add and update commands.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;

use crmdesk_core::models::{
    ContactUpdate, CustomerUpdate, DealUpdate, NewContact, NewCustomer, NewDeal, NewTask,
    RelatedType, TaskUpdate,
};

/// Parsed `key=value` pairs. Every key must be consumed.
#[derive(Debug, Default)]
pub struct Fields {
    values: BTreeMap<String, String>,
}

impl Fields {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut values = BTreeMap::new();
        for arg in args {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected key=value, got '{}'", arg))?;
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                bail!("Missing field name in '{}'", arg);
            }
            if values.insert(key.clone(), value.to_string()).is_some() {
                bail!("Field '{}' given more than once", key);
            }
        }
        Ok(Self { values })
    }

    pub fn take(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn require(&mut self, key: &str) -> Result<String> {
        self.take(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("Missing required field '{}'", key))
    }

    pub fn parse_opt<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.take(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| anyhow!("Invalid value for '{}': {}", key, e)),
        }
    }

    pub fn parse_required<T>(&mut self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.parse_opt(key)?
            .ok_or_else(|| anyhow!("Missing required field '{}'", key))
    }

    fn date_opt(&mut self, key: &str) -> Result<Option<NaiveDate>> {
        match self.take(key) {
            None => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(Some)
                .with_context(|| format!("Invalid date for '{}', expected YYYY-MM-DD", key)),
        }
    }

    /// `related=customer:3`
    fn related_opt(&mut self) -> Result<Option<(RelatedType, i64)>> {
        let Some(raw) = self.take("related") else {
            return Ok(None);
        };
        let (kind, id) = raw
            .split_once(':')
            .ok_or_else(|| anyhow!("Expected related=<customer|contact|deal>:<id>"))?;
        let kind: RelatedType = kind.parse().map_err(|e: String| anyhow!(e))?;
        let id: i64 = id.trim().parse().context("Invalid related id")?;
        Ok(Some((kind, id)))
    }

    /// Fail on fields nobody asked for
    pub fn finish(self) -> Result<()> {
        if self.values.is_empty() {
            return Ok(());
        }
        let unknown: Vec<&str> = self.values.keys().map(String::as_str).collect();
        bail!("Unknown field(s): {}", unknown.join(", "))
    }
}

pub fn new_customer(mut f: Fields) -> Result<NewCustomer> {
    let mut customer = NewCustomer::new(f.require("name")?, f.require("company")?, f.require("email")?);
    customer.phone = f.take("phone").unwrap_or_default();
    customer.status = f.parse_opt("status")?.unwrap_or_default();
    customer.notes = f.take("notes").unwrap_or_default();
    f.finish()?;
    Ok(customer)
}

pub fn customer_update(mut f: Fields) -> Result<CustomerUpdate> {
    let update = CustomerUpdate {
        name: f.take("name"),
        company: f.take("company"),
        email: f.take("email"),
        phone: f.take("phone"),
        status: f.parse_opt("status")?,
        notes: f.take("notes"),
    };
    f.finish()?;
    non_empty(update, CustomerUpdate::is_empty)
}

pub fn new_contact(mut f: Fields) -> Result<NewContact> {
    let mut contact = NewContact::new(f.require("name")?, f.require("email")?, f.parse_required("customer")?);
    contact.position = f.take("position").unwrap_or_default();
    contact.phone = f.take("phone").unwrap_or_default();
    contact.notes = f.take("notes").unwrap_or_default();
    f.finish()?;
    Ok(contact)
}

pub fn contact_update(mut f: Fields) -> Result<ContactUpdate> {
    let update = ContactUpdate {
        name: f.take("name"),
        position: f.take("position"),
        email: f.take("email"),
        phone: f.take("phone"),
        notes: f.take("notes"),
        customer_id: f.parse_opt("customer")?,
    };
    f.finish()?;
    non_empty(update, ContactUpdate::is_empty)
}

pub fn new_deal(mut f: Fields) -> Result<NewDeal> {
    let mut deal = NewDeal::new(f.require("title")?, f.parse_required("value")?, f.parse_required("customer")?);
    deal.stage = f.parse_opt("stage")?.unwrap_or_default();
    deal.close_date = f.date_opt("close")?;
    deal.notes = f.take("notes").unwrap_or_default();
    f.finish()?;
    Ok(deal)
}

pub fn deal_update(mut f: Fields) -> Result<DealUpdate> {
    let update = DealUpdate {
        title: f.take("title"),
        value: f.parse_opt("value")?,
        stage: f.parse_opt("stage")?,
        close_date: f.date_opt("close")?,
        notes: f.take("notes"),
        customer_id: f.parse_opt("customer")?,
    };
    f.finish()?;
    non_empty(update, DealUpdate::is_empty)
}

pub fn new_task(mut f: Fields, today: NaiveDate) -> Result<NewTask> {
    let due = f.date_opt("due")?.unwrap_or(today);
    let mut task = NewTask::new(f.require("title")?, due);
    if let Some((kind, id)) = f.related_opt()? {
        task = task.related_to(kind, id);
    }
    task.priority = f.parse_opt("priority")?.unwrap_or_default();
    task.status = f.parse_opt("status")?.unwrap_or_default();
    task.description = f.take("description").unwrap_or_default();
    f.finish()?;
    Ok(task)
}

pub fn task_update(mut f: Fields) -> Result<TaskUpdate> {
    let related = f.related_opt()?;
    let update = TaskUpdate {
        title: f.take("title"),
        related_type: related.map(|(kind, _)| kind),
        related_id: related.map(|(_, id)| id),
        due_date: f.date_opt("due")?,
        priority: f.parse_opt("priority")?,
        status: f.parse_opt("status")?,
        description: f.take("description"),
    };
    f.finish()?;
    non_empty(update, TaskUpdate::is_empty)
}

fn non_empty<T>(update: T, is_empty: fn(&T) -> bool) -> Result<T> {
    if is_empty(&update) {
        bail!("Nothing to update; pass at least one key=value field");
    }
    Ok(update)
}

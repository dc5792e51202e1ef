//! Plain-text output for command results.

use crmdesk_core::models::{
    Activity, ActivityKind, Contact, Customer, Dashboard, Deal, RelatedOption, Task,
};
use crmdesk_core::utils::{format_currency, format_optional, time_ago, truncate_string};

/// Maximum pending tasks listed under the dashboard
const DASHBOARD_TASK_LIMIT: usize = 5;

/// Column width for names and titles
const WIDE: usize = 24;

/// Column width for short values (status, phone, dates)
const NARROW: usize = 14;

fn cell(value: &str, width: usize) -> String {
    format!("{:<width$}", truncate_string(value, width), width = width)
}

pub fn customers(customers: &[Customer]) {
    if customers.is_empty() {
        println!("No customers yet. Add your first customer!");
        return;
    }
    println!(
        "{:>5}  {}  {}  {}  {}  {}",
        "ID",
        cell("Name", WIDE),
        cell("Company", WIDE),
        cell("Email", WIDE),
        cell("Phone", NARROW),
        "Status"
    );
    for c in customers {
        println!(
            "{:>5}  {}  {}  {}  {}  {}",
            c.id,
            cell(&c.name, WIDE),
            cell(&c.company, WIDE),
            cell(&c.email, WIDE),
            cell(&format_optional(c.phone.as_deref()), NARROW),
            c.status_label()
        );
    }
}

pub fn contacts(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("No contacts yet. Add your first contact!");
        return;
    }
    println!(
        "{:>5}  {}  {}  {}  {}  {}",
        "ID",
        cell("Name", WIDE),
        cell("Customer", WIDE),
        cell("Position", NARROW),
        cell("Email", WIDE),
        "Phone"
    );
    for c in contacts {
        println!(
            "{:>5}  {}  {}  {}  {}  {}",
            c.id,
            cell(&c.name, WIDE),
            cell(&c.customer_name, WIDE),
            cell(&format_optional(c.position.as_deref()), NARROW),
            cell(&c.email, WIDE),
            format_optional(c.phone.as_deref())
        );
    }
}

pub fn deals(deals: &[Deal]) {
    if deals.is_empty() {
        println!("No deals yet. Add your first deal!");
        return;
    }
    println!(
        "{:>5}  {}  {}  {:>12}  {}  {}",
        "ID",
        cell("Title", WIDE),
        cell("Customer", WIDE),
        "Value",
        cell("Stage", NARROW),
        "Close date"
    );
    for d in deals {
        let close = d
            .close_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {}  {}  {:>12}  {}  {}",
            d.id,
            cell(&d.title, WIDE),
            cell(&d.customer_name, WIDE),
            format_currency(d.value),
            cell(d.stage_label(), NARROW),
            close
        );
    }
}

pub fn tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks yet. Add your first task!");
        return;
    }
    println!(
        "{:>5}  {}  {}  {}  {}  {}",
        "ID",
        cell("Title", WIDE),
        cell("Related to", WIDE),
        cell("Due", NARROW),
        cell("Priority", NARROW),
        "Status"
    );
    for t in tasks {
        println!(
            "{:>5}  {}  {}  {}  {}  {}",
            t.id,
            cell(&t.title, WIDE),
            cell(t.related_label(), WIDE),
            cell(&t.due_date.format("%Y-%m-%d").to_string(), NARROW),
            cell(t.priority_label(), NARROW),
            t.status_label()
        );
    }
}

fn activity_marker(activity: &Activity) -> &'static str {
    match activity.kind() {
        Some(ActivityKind::Customer) => "[customer]",
        Some(ActivityKind::Contact) => "[contact] ",
        Some(ActivityKind::Deal) => "[deal]    ",
        Some(ActivityKind::Task) => "[task]    ",
        None => "[note]    ",
    }
}

pub fn dashboard(dashboard: &Dashboard, tasks: &[Task]) {
    println!("Customers        {}", dashboard.customer_count);
    println!("Open deals       {}", dashboard.open_deals);
    println!("Revenue (month)  {}", format_currency(dashboard.month_revenue));
    println!("Pending tasks    {}", dashboard.pending_tasks);

    println!();
    println!("Recent activity");
    if dashboard.recent_activities.is_empty() {
        println!("  Welcome to your CRM! Start by adding customers.");
    }
    for activity in &dashboard.recent_activities {
        println!(
            "  {} {} ({})",
            activity_marker(activity),
            activity.message,
            time_ago(activity.time)
        );
    }

    let mut pending: Vec<&Task> = tasks.iter().filter(|t| t.is_pending()).collect();
    if pending.is_empty() {
        return;
    }
    pending.sort_by_key(|t| t.due_date);

    println!();
    println!("Upcoming tasks");
    for t in pending.into_iter().take(DASHBOARD_TASK_LIMIT) {
        println!(
            "  {}  {}  {} ({})",
            t.due_date.format("%Y-%m-%d"),
            cell(t.priority_label(), 6),
            t.title,
            t.related_label()
        );
    }
}

pub fn related(options: &[RelatedOption]) {
    if options.is_empty() {
        println!("Nothing to relate to yet.");
        return;
    }
    for option in options {
        println!("{:>5}  {}", option.id, option.label);
    }
}

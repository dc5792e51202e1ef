//! Command dispatch.
//!
//! Each command mirrors one screen of the CRM: login and registration, the
//! dashboard, and the four record sections. Commands that need a session
//! check for one first, like a page load does.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _, Result};
use chrono::Local;
use tracing::{debug, warn};

use crmdesk_core::models::RelatedType;
use crmdesk_core::{ApiClient, Config, LoginRedirect};

use crate::fields::{self, Fields};
use crate::render;

/// Environment variable supplying the login e-mail
const EMAIL_ENV: &str = "CRMDESK_EMAIL";

/// Environment variable supplying the login password
const PASSWORD_ENV: &str = "CRMDESK_PASSWORD";

const USAGE: &str = "\
Usage: crmdesk <command> [args]

Session:
  login [email]                 Log in and remember the session
  register <name> <email>       Create an account
  logout                        Forget the session
  whoami [--remote]             Show who is logged in

Records:
  dashboard                     Summary, recent activity and upcoming tasks
  customers|contacts|deals|tasks [list]
  customers|contacts|deals|tasks add key=value...
  customers|contacts|deals|tasks update <id> key=value...
  customers|contacts|deals|tasks delete <id>
  related <customer|contact|deal>  Records a task can be attached to

Fields:
  customers  name company email [phone status=new|contacted|qualified notes]
  contacts   name email customer=<id> [position phone notes]
  deals      title value customer=<id> [stage=prospect|negotiation|proposal|won|lost
             close=YYYY-MM-DD notes]
  tasks      title [due=YYYY-MM-DD related=<customer|contact|deal>:<id>
             priority=low|medium|high status=pending|in_progress|completed description]
";

pub struct Context {
    pub config: Config,
    pub api: ApiClient,
    pub navigator: Arc<LoginRedirect>,
}

/// The four record sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Customers,
    Contacts,
    Deals,
    Tasks,
}

impl FromStr for Section {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customers" | "customer" => Ok(Section::Customers),
            "contacts" | "contact" => Ok(Section::Contacts),
            "deals" | "deal" => Ok(Section::Deals),
            "tasks" | "task" => Ok(Section::Tasks),
            _ => Err(()),
        }
    }
}

impl Section {
    fn singular(&self) -> &'static str {
        match self {
            Section::Customers => "customer",
            Section::Contacts => "contact",
            Section::Deals => "deal",
            Section::Tasks => "task",
        }
    }
}

pub async fn run(ctx: &mut Context, args: &[String]) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        print!("{}", USAGE);
        return Ok(());
    };
    debug!(command = %command, "Running command");

    match command.as_str() {
        "login" => login(ctx, rest.first().cloned()).await,
        "register" => register(ctx, rest).await,
        "logout" => logout(ctx),
        "whoami" => whoami(ctx, rest.iter().any(|a| a == "--remote")).await,
        "dashboard" => dashboard(ctx).await,
        "related" => related(ctx, rest).await,
        "help" | "--help" | "-h" => {
            print!("{}", USAGE);
            Ok(())
        }
        other => match other.parse::<Section>() {
            Ok(section) => records(ctx, section, rest).await,
            Err(()) => bail!("Unknown command '{}'. Run `crmdesk help` for usage.", other),
        },
    }
}

// ===== Session =====

fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(d) => print!("{} [{}]: ", label, d),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    match (input.is_empty(), default) {
        (true, Some(d)) => Ok(d.to_string()),
        _ => Ok(input.to_string()),
    }
}

fn read_password() -> Result<String> {
    match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => Ok(password),
        _ => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}

async fn login(ctx: &mut Context, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| std::env::var(EMAIL_ENV).ok()) {
        Some(e) if !e.trim().is_empty() => e.trim().to_string(),
        _ => prompt("Email", ctx.config.last_email.as_deref())?,
    };
    if email.is_empty() {
        bail!("Email and password required");
    }
    let password = read_password()?;
    if password.is_empty() {
        bail!("Email and password required");
    }

    let user = ctx.api.login(&email, &password).await?;

    ctx.config.last_email = Some(email);
    if let Err(e) = ctx.config.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Welcome, {}!", user.name);
    Ok(())
}

async fn register(ctx: &Context, args: &[String]) -> Result<()> {
    let [name, email] = args else {
        bail!("Usage: crmdesk register <name> <email>");
    };
    let password = read_password()?;
    if password.is_empty() {
        bail!("Password required");
    }

    let message = ctx.api.register(name, email, &password).await?;
    if !message.is_empty() {
        println!("{}", message);
    }
    println!("Run `crmdesk login {}` to sign in.", email);
    Ok(())
}

fn logout(ctx: &Context) -> Result<()> {
    ctx.api.logout()?;
    // Logging out is the requested outcome, not a prompt to log in again
    ctx.navigator.take_pending();
    println!("Logged out.");
    Ok(())
}

async fn whoami(ctx: &Context, remote: bool) -> Result<()> {
    let Some(session) = ctx.api.check_auth() else {
        return Ok(());
    };
    if remote {
        let user = ctx.api.current_user().await?;
        println!("{} <{}>", user.name, user.email);
    } else {
        println!("{}", session.display_name.as_deref().unwrap_or("(unknown user)"));
    }
    Ok(())
}

// ===== Records =====

async fn dashboard(ctx: &Context) -> Result<()> {
    if ctx.api.check_auth().is_none() {
        return Ok(());
    }
    let (summary, tasks) = futures::try_join!(ctx.api.fetch_dashboard(), ctx.api.fetch_tasks())?;
    render::dashboard(&summary, &tasks);
    Ok(())
}

async fn related(ctx: &Context, args: &[String]) -> Result<()> {
    let kind: RelatedType = args
        .first()
        .ok_or_else(|| anyhow!("Usage: crmdesk related <customer|contact|deal>"))?
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let options = ctx.api.related_options(kind).await?;
    render::related(&options);
    Ok(())
}

fn parse_id(args: &[String]) -> Result<(i64, &[String])> {
    let (id, rest) = args.split_first().ok_or_else(|| anyhow!("Missing record id"))?;
    let id = id
        .parse()
        .with_context(|| format!("Invalid record id '{}'", id))?;
    Ok((id, rest))
}

async fn records(ctx: &Context, section: Section, args: &[String]) -> Result<()> {
    let (action, rest) = match args.split_first() {
        Some((action, rest)) => (action.as_str(), rest),
        None => ("list", args),
    };

    match action {
        "list" | "ls" => list(ctx, section).await,
        "add" | "new" => add(ctx, section, Fields::parse(rest)?).await,
        "update" | "edit" => {
            let (id, rest) = parse_id(rest)?;
            update(ctx, section, id, Fields::parse(rest)?).await
        }
        "delete" | "rm" => {
            let (id, rest) = parse_id(rest)?;
            if !rest.is_empty() {
                bail!("Unexpected arguments after id");
            }
            delete(ctx, section, id).await
        }
        other => bail!("Unknown action '{}' for {}", other, section.singular()),
    }
}

async fn list(ctx: &Context, section: Section) -> Result<()> {
    match section {
        Section::Customers => render::customers(&ctx.api.fetch_customers().await?),
        Section::Contacts => render::contacts(&ctx.api.fetch_contacts().await?),
        Section::Deals => render::deals(&ctx.api.fetch_deals().await?),
        Section::Tasks => render::tasks(&ctx.api.fetch_tasks().await?),
    }
    Ok(())
}

async fn add(ctx: &Context, section: Section, fields: Fields) -> Result<()> {
    let id = match section {
        Section::Customers => ctx.api.create_customer(&fields::new_customer(fields)?).await?.id,
        Section::Contacts => ctx.api.create_contact(&fields::new_contact(fields)?).await?.id,
        Section::Deals => ctx.api.create_deal(&fields::new_deal(fields)?).await?.id,
        Section::Tasks => {
            let today = Local::now().date_naive();
            ctx.api.create_task(&fields::new_task(fields, today)?).await?.id
        }
    };
    println!("Created {} {}.", section.singular(), id);
    Ok(())
}

async fn update(ctx: &Context, section: Section, id: i64, fields: Fields) -> Result<()> {
    match section {
        Section::Customers => {
            ctx.api.update_customer(id, &fields::customer_update(fields)?).await?;
        }
        Section::Contacts => {
            ctx.api.update_contact(id, &fields::contact_update(fields)?).await?;
        }
        Section::Deals => {
            ctx.api.update_deal(id, &fields::deal_update(fields)?).await?;
        }
        Section::Tasks => {
            ctx.api.update_task(id, &fields::task_update(fields)?).await?;
        }
    }
    println!("Updated {} {}.", section.singular(), id);
    Ok(())
}

async fn delete(ctx: &Context, section: Section, id: i64) -> Result<()> {
    let message = match section {
        Section::Customers => ctx.api.delete_customer(id).await?,
        Section::Contacts => ctx.api.delete_contact(id).await?,
        Section::Deals => ctx.api.delete_deal(id).await?,
        Section::Tasks => ctx.api.delete_task(id).await?,
    };
    if message.is_empty() {
        println!("Deleted {} {}.", section.singular(), id);
    } else {
        println!("{}", message);
    }
    Ok(())
}

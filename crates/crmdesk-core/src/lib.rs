//! Core library for crmdesk.
//!
//! Provides the authenticated API client for the CRM backend, the session
//! store that keeps the bearer token between runs, typed models for
//! customers, contacts, deals, tasks and the dashboard, plus configuration
//! and display helpers shared by front ends.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiRequest, Method};
pub use auth::{LoginRedirect, Navigator, Session, SessionStore};
pub use config::Config;

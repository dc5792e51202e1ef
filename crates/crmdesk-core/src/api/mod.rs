//! REST API client module for the CRM backend.
//!
//! This module provides the `ApiClient` for talking to the JSON API that
//! owns customers, contacts, deals, tasks and the dashboard summary.
//!
//! Every resource call carries the stored bearer token. A missing token
//! short-circuits before the network is touched, and an HTTP 401 ends the
//! session and redirects to login.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ApiClient, ApiRequest};
pub use error::ApiError;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};

//! Authentication module for the current user's session.
//!
//! This module provides:
//! - `Session`: the stored bearer token and display name
//! - `SessionStore`: save/current/clear over a durable backend
//!   (`FileSessionStore`, `KeyringSessionStore`) or memory
//! - `Navigator`: the redirect-to-login side effect
//!
//! Tokens carry no client-side expiry. An expired token is discovered when
//! the backend answers 401, at which point the session is cleared.

pub mod credentials;
pub mod navigator;
pub mod session;

pub use credentials::KeyringSessionStore;
pub use navigator::{LoginRedirect, Navigator};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

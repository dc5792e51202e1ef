use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

/// Sends the user back to the login entry point.
///
/// Called when a request finds no credential, when the backend rejects the
/// credential, and on explicit logout.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Navigator that records redirects for the front end to act on.
#[derive(Debug, Default)]
pub struct LoginRedirect {
    total: AtomicUsize,
    pending: AtomicUsize,
}

impl LoginRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of redirects since creation
    pub fn count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Returns true once per batch of redirects not yet handled
    pub fn take_pending(&self) -> bool {
        self.pending.swap(0, Ordering::SeqCst) > 0
    }
}

impl Navigator for LoginRedirect {
    fn redirect_to_login(&self) {
        info!("Redirecting to login");
        self.total.fetch_add(1, Ordering::SeqCst);
        self.pending.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_pending_consumes_redirects() {
        let nav = LoginRedirect::new();
        assert!(!nav.take_pending());

        nav.redirect_to_login();
        nav.redirect_to_login();
        assert_eq!(nav.count(), 2);
        assert!(nav.take_pending());
        assert!(!nav.take_pending());
        assert_eq!(nav.count(), 2);
    }
}

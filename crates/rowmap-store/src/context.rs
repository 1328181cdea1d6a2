//! Caller-owned cancellation and deadlines
//!
//! A `Context` is checked before every statement a repository issues. The
//! store never imposes a timeout of its own: without a deadline or a cancel
//! handle, statements run until the driver returns.

use std::time::{Duration, Instant};

use rowmap_core::errors::OrmError;
use tokio_util::sync::CancellationToken;

use crate::errors::Result;

/// Cancellation token plus optional deadline
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    token: Option<CancellationToken>,
}

/// Cancels the context that created it and every context derived from it
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Context {
    /// No deadline, never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that expires `timeout` from now
    ///
    /// An earlier deadline already on `self` is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derive a cancellable context
    ///
    /// The derived context is cancelled by its own handle or by any handle
    /// of the context it was derived from.
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let token = self.child_token();
        self.token = Some(token.clone());
        (self, CancelHandle { token })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }

    /// Fail if the context is cancelled or past its deadline
    ///
    /// # Errors
    /// * `Cancelled` - the cancel handle fired
    /// * `DeadlineExceeded` - the deadline has passed
    pub fn check(&self, table: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(OrmError::Cancelled {
                table: table.to_string(),
            });
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(OrmError::DeadlineExceeded {
                    table: table.to_string(),
                });
            }
        }
        Ok(())
    }

    fn child_token(&self) -> CancellationToken {
        match &self.token {
            Some(token) => token.child_token(),
            None => CancellationToken::new(),
        }
    }
}

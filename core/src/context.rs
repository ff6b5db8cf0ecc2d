//! Execution context carrying an optional deadline.

use std::time::{Duration, Instant};

/// Bounds how long a call to [`execute`](crate::execute) may take.
///
/// The remaining time is applied as the request's total timeout; when it
/// runs out mid-flight the transport aborts and the error is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// No deadline; only the client timeout applies.
    pub fn background() -> Self {
        Self::default()
    }

    /// A timeout too large to represent as an `Instant` means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Combine the remaining time with a client timeout, keeping the shorter.
    pub(crate) fn effective_timeout(&self, client_timeout: Option<Duration>) -> Option<Duration> {
        match (self.remaining(), client_timeout) {
            (Some(remaining), Some(timeout)) => Some(remaining.min(timeout)),
            (remaining, timeout) => remaining.or(timeout),
        }
    }
}

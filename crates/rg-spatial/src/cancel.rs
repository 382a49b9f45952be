//! Cooperative cancellation for long-running searches.
//!
//! A [`CancelToken`] is cheap to clone; all clones share one flag, so a
//! caller can hand a clone to a route request and flip it from another
//! thread.  An optional deadline cancels the search once `Instant::now()`
//! passes it.  Searches poll the token at coarse intervals (every few hundred
//! Dijkstra pops, and between gateway candidates), so cancellation is
//! prompt but not instantaneous.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::{SpatialError, SpatialResult};

#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag:     Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that never fires unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also fire once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Also fire `timeout` from now.  A timeout too large to represent is
    /// treated as no deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Request cancellation.  Visible to every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `Err(SpatialError::Cancelled)` once the token has fired.
    #[inline]
    pub fn check(&self) -> SpatialResult<()> {
        if self.is_cancelled() {
            Err(SpatialError::Cancelled)
        } else {
            Ok(())
        }
    }
}

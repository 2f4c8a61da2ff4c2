//! Memoized thunks: the lazy-evaluation primitive.
//!
//! A [`Suspension`] holds either a deferred computation or its memoized
//! outcome. The first force runs the computation exactly once, also under
//! concurrent force from several threads, and every later force returns
//! the stored result. Failures are sticky: an error produced by the
//! computation is stored and handed back, identical, on every subsequent
//! force. This one primitive carries the entire laziness discipline of the
//! crate; nodes and operations are just suspensions wired together.

use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;

use crate::error::{Error, Result};

type Thunk<T> = Box<dyn FnOnce() -> Result<T> + Send>;

struct Inner<T> {
    /// Memoized outcome. Initialized exactly once.
    slot: OnceCell<Result<T>>,
    /// The deferred computation. Taken (and dropped) by the first force so
    /// captured state is released as soon as it has run.
    thunk: Mutex<Option<Thunk<T>>>,
}

/// A single-fire memoized computation producing a `T`.
///
/// Handles are shared: cloning a `Suspension` clones the handle, not the
/// computation, so every copy observes the same memoized slot. There is no
/// way to detach a forced slot from its once-flag, which rules out the
/// classic moved-promise hazard.
pub struct Suspension<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Suspension<T> {
    fn clone(&self) -> Self {
        Suspension {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Suspension<T> {
    /// Defer `computation` until the first [`force`](Suspension::force).
    pub fn new<F>(computation: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        Suspension {
            inner: Arc::new(Inner {
                slot: OnceCell::new(),
                thunk: Mutex::new(Some(Box::new(computation))),
            }),
        }
    }

    /// Wrap an already-realized value; forcing returns immediately.
    pub fn ready(value: T) -> Self {
        Suspension {
            inner: Arc::new(Inner {
                slot: OnceCell::with_value(Ok(value)),
                thunk: Mutex::new(None),
            }),
        }
    }

    /// Force the suspension.
    ///
    /// The first call runs the computation; concurrent first callers block
    /// until it finishes and all observe the same outcome. Later calls
    /// return the memoized value or re-surface the stored error.
    ///
    /// # Errors
    /// Whatever the computation returned, every time. If the computation
    /// panicked on an earlier force, a [`Error::Callback`] is reported
    /// instead of re-running it.
    pub fn force(&self) -> Result<&T> {
        let outcome = self.inner.slot.get_or_init(|| {
            let thunk = self
                .inner
                .thunk
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            match thunk {
                Some(run) => run(),
                // The thunk was consumed but the slot never filled: a
                // previous force panicked mid-computation.
                None => Err(Error::callback("suspension computation panicked")),
            }
        });
        outcome.as_ref().map_err(Error::clone)
    }

    /// Whether the computation has already run (successfully or not).
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.inner.slot.get().is_some()
    }
}

impl<T> fmt::Debug for Suspension<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.inner.slot.get() {
            None => "pending",
            Some(Ok(_)) => "forced",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("Suspension").field("state", &state).finish()
    }
}

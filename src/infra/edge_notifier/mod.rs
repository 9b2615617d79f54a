//! Input edge notifier: turns button interrupts into a single pending flag.
//!
//! [`EdgeNotifier::notify`] is the whole interrupt-side API: it sets the flag
//! and wakes the event loop, nothing more (no logging, no allocation). Edges
//! arriving before the loop consumes the flag coalesce into one notification.
use core::cell::Cell;
use core::future::Future;
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_sync::waitqueue::AtomicWaker;
use futures_util::future::poll_fn;

/// Binary pending-input flag with a waker for the event loop.
pub struct EdgeNotifier {
    pending: Mutex<CriticalSectionRawMutex, Cell<bool>>,
    waker: AtomicWaker,
}

impl Default for EdgeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeNotifier {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(false)),
            waker: AtomicWaker::new(),
        }
    }

    /// Records an edge. Idempotent while the flag is set.
    pub fn notify(&self) {
        self.pending.lock(|pending| pending.set(true));
        self.waker.wake();
    }

    /// Atomically tests and clears the flag. Returns whether it was set.
    pub fn take(&self) -> bool {
        self.pending.lock(|pending| pending.replace(false))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock(Cell::get)
    }

    /// Ready once an edge is pending. Does not clear the flag.
    pub fn poll_pending(&self, cx: &mut Context<'_>) -> Poll<()> {
        self.waker.register(cx.waker());
        if self.is_pending() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }

    /// Waits until an edge is pending. Does not clear the flag.
    pub fn wait_pending(&self) -> impl Future<Output = ()> + '_ {
        poll_fn(move |cx| self.poll_pending(cx))
    }
}

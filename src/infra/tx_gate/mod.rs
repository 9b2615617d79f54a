//! Transmit admission gate: a counting permit pool bounding the number of
//! frames handed to the CAN driver and not yet completed.
//!
//! A successful [`TxGate::try_acquire`] yields a [`TxPermit`]. The permit is a
//! move-only token: it returns to the pool exactly once, when it is released
//! or dropped. Ownership therefore rules out both leaks (a rejected submission
//! drops its permit) and double releases.
use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Counting permit pool. Never blocks: an empty pool simply refuses.
pub struct TxGate {
    capacity: usize,
    available: Mutex<CriticalSectionRawMutex, Cell<usize>>,
}

impl TxGate {
    /// Creates a gate holding `capacity` permits, all available.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: Mutex::new(Cell::new(capacity)),
        }
    }

    /// Takes one permit if any is left. Safe to call from interrupt context.
    pub fn try_acquire(&'static self) -> Option<TxPermit> {
        let acquired = self.available.lock(|available| {
            let count = available.get();
            if count == 0 {
                false
            } else {
                available.set(count - 1);
                true
            }
        });
        // `then`, not `then_some`: a permit built eagerly would release on drop.
        acquired.then(|| TxPermit { gate: self })
    }

    /// Returns `permit` to its pool. Equivalent to dropping it.
    pub fn release(&self, permit: TxPermit) {
        debug_assert!(
            core::ptr::eq(permit.gate, self),
            "permit released to a foreign gate"
        );
        drop(permit);
    }

    /// Permits currently available.
    pub fn available(&self) -> usize {
        self.available.lock(Cell::get)
    }

    /// Permits currently held by in-flight transmissions.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }

    /// Total number of permits (`MAX_IN_FLIGHT`).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn give_back(&self) {
        self.available.lock(|available| {
            let count = available.get();
            debug_assert!(count < self.capacity, "permit count above capacity");
            available.set((count + 1).min(self.capacity));
        });
    }
}

/// Proof of admission for one transmission.
#[must_use = "dropping a permit releases it immediately"]
pub struct TxPermit {
    gate: &'static TxGate,
}

impl TxPermit {
    /// Returns the permit to its gate.
    pub fn release(self) {
        drop(self);
    }

    /// Gate this permit belongs to.
    pub fn gate(&self) -> &'static TxGate {
        self.gate
    }
}

impl Drop for TxPermit {
    fn drop(&mut self) {
        self.gate.give_back();
    }
}

impl core::fmt::Debug for TxPermit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TxPermit")
            .field("available", &self.gate.available())
            .field("capacity", &self.gate.capacity)
            .finish()
    }
}

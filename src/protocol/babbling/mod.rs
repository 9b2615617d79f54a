//! Babbling service: every button press queues one fixed CAN frame (bounded
//! by the admission gate), and every frame accepted by the receive filter is
//! logged.
//!
//! Interrupt handlers and driver callbacks talk to the event loop only through
//! the three primitives grouped in [`BabblerResources`]:
//!
//! * the button ISR calls [`EdgeNotifier::notify`];
//! * the driver's filter-match path pushes into the [`RxQueue`];
//! * the driver's TX-done path calls
//!   [`TxCompletion::complete`](completion::TxCompletion::complete), which
//!   returns a permit to the [`TxGate`].
//!
//! No allocation is performed by the library; firmware places the resources
//! in a `static` or a `StaticCell`.
pub mod completion;
pub mod config;
pub mod event_loop;

use crate::infra::{edge_notifier::EdgeNotifier, rx_queue::RxQueue, tx_gate::TxGate};

pub use config::{BabblerConfig, DEFAULT_MAX_IN_FLIGHT, RX_QUEUE_DEPTH};
pub use event_loop::{Babbler, DispatchReport, LoopStats, Readiness, TxOutcome};

/// Shared state between interrupt context and the event loop.
pub struct BabblerResources<const RX_DEPTH: usize = RX_QUEUE_DEPTH> {
    gate: TxGate,
    notifier: EdgeNotifier,
    queue: RxQueue<RX_DEPTH>,
}

impl<const RX_DEPTH: usize> BabblerResources<RX_DEPTH> {
    /// `max_in_flight` permits, no pending edge, empty queue.
    pub const fn new(max_in_flight: usize) -> Self {
        Self {
            gate: TxGate::new(max_in_flight),
            notifier: EdgeNotifier::new(),
            queue: RxQueue::new(),
        }
    }

    pub fn gate(&self) -> &TxGate {
        &self.gate
    }

    pub fn notifier(&self) -> &EdgeNotifier {
        &self.notifier
    }

    pub fn queue(&self) -> &RxQueue<RX_DEPTH> {
        &self.queue
    }
}

//! CAN transport model: tagged identifiers, classic/FD frames, acceptance
//! filters, and the driver abstraction traits.

pub mod can_frame;
pub mod can_id;
pub mod filter;
pub mod traits;

/// Default submission timeout: do not wait for a free driver TX mailbox.
///
/// A busy driver is a steady-state failure; the press is logged and dropped
/// rather than stalling the event loop.
pub const CAN_SEND_TIMEOUT_MS: u64 = 0;

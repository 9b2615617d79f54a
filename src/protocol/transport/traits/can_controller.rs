//! Minimal abstraction of a CAN controller driver. Lets the babbling service
//! plug into any HAL (embassy, Zephyr-style C drivers behind FFI, simulators).
use embassy_time::Duration;

use crate::infra::rx_queue::FrameSink;
use crate::protocol::babbling::completion::TxCompletion;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::filter::RxFilter;

/// Handle of an installed receive filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterId(pub usize);

/// Contract with the CAN controller driver.
pub trait CanController {
    type Error: core::fmt::Debug;

    /// Device name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the controller finished its own initialization.
    fn is_ready(&self) -> bool;

    /// Installs `filter`; every matching frame is pushed into `sink` from the
    /// driver's receive context. A rejected push drops the frame.
    fn add_rx_filter(
        &mut self,
        filter: &RxFilter,
        sink: &'static dyn FrameSink,
    ) -> Result<FilterId, Self::Error>;

    /// Leaves configuration mode and joins the bus. Drivers that start
    /// implicitly when a filter is added keep this default.
    fn start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Queues `frame` for transmission without blocking longer than `timeout`.
    ///
    /// On `Ok`, the driver owns `completion` and must call
    /// [`TxCompletion::complete`] exactly once when the transmission finishes
    /// or fails, from whatever context it likes. On `Err`, the driver simply
    /// drops `completion`, which returns the admission permit.
    fn send(
        &mut self,
        frame: &CanFrame,
        timeout: Duration,
        completion: TxCompletion,
    ) -> Result<(), Self::Error>;
}

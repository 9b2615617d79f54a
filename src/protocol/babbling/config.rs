//! Build-time configuration of the babbling service.
use embassy_time::Duration;

use crate::error::FrameError;
use crate::protocol::transport::can_frame::{CanFrame, FrameKind};
use crate::protocol::transport::can_id::{standard_const, CanId};
use crate::protocol::transport::filter::RxFilter;
use crate::protocol::transport::CAN_SEND_TIMEOUT_MS;

/// Identifier of the babbling frame.
pub const TX_ID: u16 = 0x7c9;
/// Receive filter identifier.
pub const RX_FILTER_ID: u16 = 0x7cd;
/// Receive filter mask.
pub const RX_FILTER_MASK: u16 = 0x7cd;
/// Default receive queue depth.
pub const RX_QUEUE_DEPTH: usize = 100;
/// Default number of transmissions allowed in flight.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 5;

/// Immutable service configuration, built once and passed by reference.
#[derive(Clone, Copy, Debug)]
pub struct BabblerConfig {
    /// Identifier of the outbound frame.
    pub tx_id: CanId,
    /// Data or remote frame.
    pub tx_kind: FrameKind,
    /// Send as CAN FD.
    pub fd: bool,
    /// Bit-rate switch (CAN FD only).
    pub brs: bool,
    /// Data length code of the outbound frame.
    pub tx_dlc: u8,
    /// Outbound payload; must fit in `tx_dlc`.
    pub tx_payload: &'static [u8],
    /// Filter selecting which frames are queued for logging.
    pub rx_filter: RxFilter,
    /// How long the driver may wait for a free TX slot.
    pub tx_timeout: Duration,
}

impl BabblerConfig {
    /// Standard 0x7c9, empty data frame, filter 0x7cd/0x7cd, no TX wait.
    pub const DEFAULT: Self = Self {
        tx_id: standard_const(TX_ID),
        tx_kind: FrameKind::Data,
        fd: false,
        brs: false,
        tx_dlc: 0,
        tx_payload: &[],
        rx_filter: RxFilter::standard(RX_FILTER_ID, RX_FILTER_MASK),
        tx_timeout: Duration::from_millis(CAN_SEND_TIMEOUT_MS),
    };

    /// Builds the outbound frame, validating the configured flags.
    pub fn outbound_frame(&self) -> Result<CanFrame, FrameError> {
        CanFrame::from_parts(
            self.tx_id,
            self.tx_kind,
            self.fd,
            self.brs,
            self.tx_dlc,
            self.tx_payload,
        )
    }
}

impl Default for BabblerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

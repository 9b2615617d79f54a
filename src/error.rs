//! Error definitions shared across library modules.
//! Startup failures are fatal and surface to the firmware entry point;
//! steady-state failures are logged by the event loop and never propagate.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while building a CAN identifier from a raw value.
pub enum CanIdError {
    /// Value does not fit in 11 bits.
    #[error("Standard identifier out of range: {raw:#x}")]
    StandardOutOfRange { raw: u16 },
    /// Value does not fit in 29 bits.
    #[error("Extended identifier out of range: {raw:#x}")]
    ExtendedOutOfRange { raw: u32 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Violations of the frame invariants (payload ≤ DLC ≤ capacity).
pub enum FrameError {
    /// DLC exceeds 8 on classic CAN or 15 on CAN FD.
    #[error("DLC {dlc} out of range")]
    DlcOutOfRange { dlc: u8 },
    /// Payload does not fit in the space announced by the DLC.
    #[error("Payload of {len} bytes exceeds capacity {capacity}")]
    PayloadTooLong { len: usize, capacity: usize },
    /// Bit-rate switch requested on a classic frame.
    #[error("Bit-rate switch requires a CAN FD frame")]
    BrsWithoutFd,
    /// CAN FD has no remote frames.
    #[error("Remote frames are not allowed on CAN FD")]
    RemoteFd,
}

#[derive(Error, Debug)]
/// Fatal errors of the one-time startup sequence.
///
/// `B` is the CAN controller error type, `I` the button error type.
pub enum StartupError<B: core::fmt::Debug, I: core::fmt::Debug> {
    /// CAN controller reports it is not ready.
    #[error("CAN device not ready")]
    BusNotReady,
    /// Receive filter could not be attached.
    #[error("Failed to add filter: {0:?}")]
    FilterRegistration(B),
    /// CAN controller refused to start.
    #[error("Error starting CAN controller: {0:?}")]
    BusStart(B),
    /// Button port reports it is not ready.
    #[error("Button device not ready")]
    InputNotReady,
    /// Button pin could not be configured as an interrupt input.
    #[error("Failed to configure button GPIO: {0:?}")]
    InputConfig(I),
    /// Edge callback could not be installed.
    #[error("Failed to register button callback: {0:?}")]
    InputCallback(I),
    /// Configured outbound frame violates the frame invariants.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Outcome reported by the driver when a queued transmission fails.
pub enum TxError {
    /// Transmission did not complete within the driver's deadline.
    #[error("Transmission timed out")]
    Timeout,
    /// Frame lost arbitration or was not acknowledged too many times.
    #[error("Transmission aborted")]
    Aborted,
    /// Controller entered an error state (bus-off, error passive).
    #[error("Bus error")]
    Bus,
    /// Driver-specific error code.
    #[error("Driver error {0}")]
    Other(i32),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Returned to the receive path when the queue is full; the frame is dropped.
#[error("Receive queue full: frame dropped")]
pub struct RxQueueFull;

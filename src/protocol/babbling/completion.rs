//! Transmit completion handler handed to the CAN driver with every frame.
use crate::error::TxError;
use crate::infra::tx_gate::TxPermit;
use crate::protocol::transport::can_id::CanId;

/// One-shot completion for a submitted frame.
///
/// Owns the admission permit of the transmission. [`complete`](Self::complete)
/// consumes the handler, so it runs at most once; the permit goes back to the
/// gate whether the transmission succeeded, failed, or the handler was dropped
/// by a driver that rejected the submission.
#[derive(Debug)]
pub struct TxCompletion {
    permit: TxPermit,
    id: CanId,
}

impl TxCompletion {
    pub(crate) fn new(permit: TxPermit, id: CanId) -> Self {
        Self { permit, id }
    }

    /// Identifier of the frame this completion belongs to.
    pub fn id(&self) -> CanId {
        self.id
    }

    /// Reports the outcome and releases the permit. Non-blocking; safe from
    /// interrupt context.
    pub fn complete(self, result: Result<(), TxError>) {
        match result {
            Ok(()) => info!("CAN frame {} sent", self.id),
            Err(err) => warn!("CAN frame {} failed: {}", self.id, err),
        }
        self.permit.release();
    }
}

//! In-memory representation of a classic CAN or CAN FD frame, used for both
//! the outbound babbling frame and the frames drained from the receive queue.
use crate::core::{
    dlc_to_len, len_to_dlc, CLASSIC_MAX_DATA_LEN, CLASSIC_MAX_DLC, FD_MAX_DATA_LEN, MAX_DLC,
};
use crate::error::FrameError;
use crate::protocol::transport::can_id::CanId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Data frame or remote transmission request.
pub enum FrameKind {
    Data,
    Remote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// CAN frame with its control flags.
///
/// Fields are private: every constructor validates
/// `payload length ≤ DLC length ≤ capacity`, and a built frame is never mutated.
pub struct CanFrame {
    id: CanId,
    kind: FrameKind,
    fd: bool,
    brs: bool,
    dlc: u8,
    data: [u8; FD_MAX_DATA_LEN],
}

impl CanFrame {
    /// Classic data frame. The DLC equals the payload length.
    pub fn new(id: CanId, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > CLASSIC_MAX_DATA_LEN {
            return Err(FrameError::PayloadTooLong {
                len: payload.len(),
                capacity: CLASSIC_MAX_DATA_LEN,
            });
        }
        Self::from_parts(id, FrameKind::Data, false, false, payload.len() as u8, payload)
    }

    /// Classic remote frame requesting `dlc` bytes.
    pub fn new_remote(id: CanId, dlc: u8) -> Result<Self, FrameError> {
        Self::from_parts(id, FrameKind::Remote, false, false, dlc, &[])
    }

    /// CAN FD data frame. The DLC is the smallest one covering the payload;
    /// unused tail bytes are zero.
    pub fn new_fd(id: CanId, payload: &[u8], brs: bool) -> Result<Self, FrameError> {
        let dlc = len_to_dlc(payload.len()).ok_or(FrameError::PayloadTooLong {
            len: payload.len(),
            capacity: FD_MAX_DATA_LEN,
        })?;
        Self::from_parts(id, FrameKind::Data, true, brs, dlc, payload)
    }

    /// Builds a frame from every control field, checking all invariants.
    ///
    /// `payload` may be shorter than the DLC length; the rest is zero-filled.
    /// Remote frames carry no payload.
    pub fn from_parts(
        id: CanId,
        kind: FrameKind,
        fd: bool,
        brs: bool,
        dlc: u8,
        payload: &[u8],
    ) -> Result<Self, FrameError> {
        let max_dlc = if fd { MAX_DLC } else { CLASSIC_MAX_DLC };
        if dlc > max_dlc {
            return Err(FrameError::DlcOutOfRange { dlc });
        }
        if brs && !fd {
            return Err(FrameError::BrsWithoutFd);
        }
        if fd && kind == FrameKind::Remote {
            return Err(FrameError::RemoteFd);
        }

        let capacity = match kind {
            FrameKind::Remote => 0,
            FrameKind::Data => dlc_to_len(dlc, fd),
        };
        if payload.len() > capacity {
            return Err(FrameError::PayloadTooLong {
                len: payload.len(),
                capacity,
            });
        }

        let mut data = [0u8; FD_MAX_DATA_LEN];
        data[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            id,
            kind,
            fd,
            brs,
            dlc,
            data,
        })
    }

    pub fn id(&self) -> CanId {
        self.id
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn is_remote(&self) -> bool {
        self.kind == FrameKind::Remote
    }

    /// Flexible data rate frame.
    pub fn is_fd(&self) -> bool {
        self.fd
    }

    /// Bit-rate switch requested for the data phase (FD only).
    pub fn brs(&self) -> bool {
        self.brs
    }

    /// Raw data length code (0..=15).
    pub fn dlc(&self) -> u8 {
        self.dlc
    }

    /// Payload bytes announced by the DLC; empty for remote frames.
    pub fn data(&self) -> &[u8] {
        match self.kind {
            FrameKind::Remote => &[],
            FrameKind::Data => &self.data[..dlc_to_len(self.dlc, self.fd)],
        }
    }

    /// Length of [`data`](Self::data).
    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CanFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "CanFrame {{ id: {}, kind: {}, fd: {}, brs: {}, dlc: {}, data: {=[u8]:x} }}",
            self.id,
            self.kind,
            self.fd,
            self.brs,
            self.dlc,
            self.data()
        )
    }
}

/// Lets HAL-side code build and inspect classic frames through the
/// `embedded_can` vocabulary.
impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<embedded_can::Id>, data: &[u8]) -> Option<Self> {
        CanFrame::new(CanId::from(id.into()), data).ok()
    }

    fn new_remote(id: impl Into<embedded_can::Id>, dlc: usize) -> Option<Self> {
        let dlc = u8::try_from(dlc).ok()?;
        CanFrame::new_remote(CanId::from(id.into()), dlc).ok()
    }

    fn is_extended(&self) -> bool {
        self.id.is_extended()
    }

    fn is_remote_frame(&self) -> bool {
        self.is_remote()
    }

    fn id(&self) -> embedded_can::Id {
        self.id.as_id()
    }

    fn dlc(&self) -> usize {
        self.dlc as usize
    }

    fn data(&self) -> &[u8] {
        CanFrame::data(self)
    }
}

//! Acceptance filter: identifier/mask pair with a type tag. A frame passes
//! when the identifier type matches and `frame_id & mask == id & mask`.
use crate::protocol::transport::can_frame::{CanFrame, FrameKind};
use crate::protocol::transport::can_id::CanId;

const STANDARD_MASK: u32 = 0x7ff;
const EXTENDED_MASK: u32 = 0x1fff_ffff;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Receive filter registered once with the CAN controller.
pub struct RxFilter {
    id: u32,
    mask: u32,
    extended: bool,
    /// `None` accepts data and remote frames alike.
    kind: Option<FrameKind>,
}

impl RxFilter {
    /// Filter on 11-bit identifiers. Bits above 11 are ignored.
    pub const fn standard(id: u16, mask: u16) -> Self {
        Self {
            id: id as u32 & STANDARD_MASK,
            mask: mask as u32 & STANDARD_MASK,
            extended: false,
            kind: None,
        }
    }

    /// Filter on 29-bit identifiers. Bits above 29 are ignored.
    pub const fn extended(id: u32, mask: u32) -> Self {
        Self {
            id: id & EXTENDED_MASK,
            mask: mask & EXTENDED_MASK,
            extended: true,
            kind: None,
        }
    }

    /// Restricts the filter to data or remote frames.
    pub const fn with_kind(mut self, kind: FrameKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn kind(&self) -> Option<FrameKind> {
        self.kind
    }

    /// Identifier-only check.
    pub fn accepts_id(&self, id: CanId) -> bool {
        id.is_extended() == self.extended && (id.raw() & self.mask) == (self.id & self.mask)
    }

    /// Full check: identifier, identifier type, and frame kind.
    pub fn matches(&self, frame: &CanFrame) -> bool {
        if let Some(kind) = self.kind {
            if frame.kind() != kind {
                return false;
            }
        }
        self.accepts_id(frame.id())
    }
}

//! Tagged CAN identifiers: 11-bit standard or 29-bit extended, backed by
//! `embedded_can::Id` so frames interoperate with HAL drivers.
use embedded_can::{ExtendedId, Id, StandardId};

use crate::error::CanIdError;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Standard (11-bit) or extended (29-bit) identifier.
pub struct CanId(Id);

impl CanId {
    /// Builds an 11-bit identifier.
    pub const fn standard(raw: u16) -> Result<Self, CanIdError> {
        match StandardId::new(raw) {
            Some(id) => Ok(Self(Id::Standard(id))),
            None => Err(CanIdError::StandardOutOfRange { raw }),
        }
    }

    /// Builds a 29-bit identifier.
    pub const fn extended(raw: u32) -> Result<Self, CanIdError> {
        match ExtendedId::new(raw) {
            Some(id) => Ok(Self(Id::Extended(id))),
            None => Err(CanIdError::ExtendedOutOfRange { raw }),
        }
    }

    /// Raw numeric identifier, without the type tag.
    pub fn raw(&self) -> u32 {
        match self.0 {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }

    /// `true` for 29-bit identifiers.
    pub fn is_extended(&self) -> bool {
        matches!(self.0, Id::Extended(_))
    }

    /// Identifier width in bits (11 or 29).
    pub fn bits(&self) -> u8 {
        if self.is_extended() {
            29
        } else {
            11
        }
    }

    /// Hex digits needed to print the identifier (3 or 8).
    pub fn hex_width(&self) -> usize {
        if self.is_extended() {
            8
        } else {
            3
        }
    }

    /// "standard" or "extended", as printed in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        if self.is_extended() {
            "extended"
        } else {
            "standard"
        }
    }

    /// Underlying `embedded_can` identifier.
    pub fn as_id(&self) -> Id {
        self.0
    }
}

impl From<Id> for CanId {
    fn from(id: Id) -> Self {
        Self(id)
    }
}

impl From<StandardId> for CanId {
    fn from(id: StandardId) -> Self {
        Self(Id::Standard(id))
    }
}

impl From<ExtendedId> for CanId {
    fn from(id: ExtendedId) -> Self {
        Self(Id::Extended(id))
    }
}

impl From<CanId> for Id {
    fn from(id: CanId) -> Self {
        id.0
    }
}

impl core::fmt::Display for CanId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:0width$x}", self.raw(), width = self.hex_width())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CanId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u32:#x}", self.raw())
    }
}

/// Compile-time helper for identifiers known to be valid.
pub(crate) const fn standard_const(raw: u16) -> CanId {
    match CanId::standard(raw) {
        Ok(id) => id,
        Err(_) => panic!("standard CAN identifier out of range"),
    }
}

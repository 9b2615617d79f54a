//! Size limits and data length code (DLC) tables shared by the frame model,
//! the receive queue, and the driver traits.

/// Payload capacity of a classic CAN 2.0 frame.
pub const CLASSIC_MAX_DATA_LEN: usize = 8;

/// Payload capacity of a CAN FD frame.
pub const FD_MAX_DATA_LEN: usize = 64;

/// Largest encodable data length code (4 bits).
pub const MAX_DLC: u8 = 15;

/// Largest DLC accepted on a classic frame.
pub const CLASSIC_MAX_DLC: u8 = 8;

/// Byte count for every DLC value on CAN FD. Values 0..=8 are identical on
/// classic CAN; 9..=15 only have a meaning on FD.
const FD_DLC_TO_LEN: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 12, 16, 20, 24, 32, 48, 64];

/// Number of payload bytes carried by `dlc`.
///
/// On classic CAN a DLC above 8 still means eight bytes (ISO 11898-1).
/// Values above [`MAX_DLC`] are clamped to the largest size.
#[inline]
pub const fn dlc_to_len(dlc: u8, fd: bool) -> usize {
    let dlc = if dlc > MAX_DLC { MAX_DLC } else { dlc };
    if fd {
        FD_DLC_TO_LEN[dlc as usize] as usize
    } else if dlc as usize > CLASSIC_MAX_DATA_LEN {
        CLASSIC_MAX_DATA_LEN
    } else {
        dlc as usize
    }
}

/// Smallest DLC able to carry `len` bytes on CAN FD, or `None` above 64 bytes.
#[inline]
pub const fn len_to_dlc(len: usize) -> Option<u8> {
    let mut dlc = 0;
    while dlc < FD_DLC_TO_LEN.len() {
        if FD_DLC_TO_LEN[dlc] as usize >= len {
            return Some(dlc as u8);
        }
        dlc += 1;
    }
    None
}

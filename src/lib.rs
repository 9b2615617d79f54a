//! `can-babbler` library: a `no_std` service that turns button presses into
//! CAN transmissions and logs the frames accepted by a receive filter. The
//! crate exposes the interrupt-safe primitives (admission gate, edge notifier,
//! receive queue), the CAN transport model (identifiers, frames, filters,
//! driver traits), and the event loop tying them together.
#![no_std]
//==================================================================================
// Must stay first: the logging macros are textually scoped.
mod fmt;
//==================================================================================
/// Frame size constants and data length code tables.
pub mod core;
/// Startup, frame construction, and transmission errors.
pub mod error;
/// Interrupt-safe building blocks shared between ISRs and the event loop.
pub mod infra;
/// CAN transport model and the babbling service built on top of it.
pub mod protocol;
//==================================================================================

//! CAN transport model and the babbling service: frame, identifier and filter
//! types, driver traits, and the event loop driving them.
pub mod babbling;
pub mod transport;

//! Interrupt-safe primitives shared between interrupt handlers, driver
//! callbacks, and the event loop. All of them are `const`-constructible so
//! they can live in a `static` or a `StaticCell`, and none of them blocks.
pub mod edge_notifier;
pub mod rx_queue;
pub mod tx_gate;

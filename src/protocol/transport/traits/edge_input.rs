//! Button abstraction: a GPIO input whose active edges raise an interrupt.
use core::convert::Infallible;

use crate::infra::edge_notifier::EdgeNotifier;

/// Contract with the GPIO driver for the trigger button.
pub trait EdgeInput {
    type Error: core::fmt::Debug;

    /// Button label used in diagnostics (e.g. `"sw0"`).
    fn name(&self) -> &str;

    /// Whether the GPIO port is ready.
    fn is_ready(&self) -> bool;

    /// Configures the pin as an input interrupting on the edge to active.
    fn configure_as_interrupt_input(&mut self) -> Result<(), Self::Error>;

    /// Installs the edge handler. The handler must only call
    /// [`EdgeNotifier::notify`].
    fn register_edge_callback(&mut self, notifier: &'static EdgeNotifier)
        -> Result<(), Self::Error>;
}

/// Boards without a trigger button. Uninhabited: pass `None::<NoButton>`.
#[derive(Debug)]
pub enum NoButton {}

impl EdgeInput for NoButton {
    type Error = Infallible;

    fn name(&self) -> &str {
        match *self {}
    }

    fn is_ready(&self) -> bool {
        match *self {}
    }

    fn configure_as_interrupt_input(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    fn register_edge_callback(&mut self, _: &'static EdgeNotifier) -> Result<(), Self::Error> {
        match *self {}
    }
}

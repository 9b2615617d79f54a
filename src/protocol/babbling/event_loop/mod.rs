//! Event multiplexer: the only place where the service blocks.
//!
//! The loop alternates between two states:
//!
//! * **Idle-Waiting**: [`Babbler::wait_ready`] suspends until an edge is
//!   pending or the receive queue is non-empty;
//! * **Dispatching**: [`Babbler::dispatch`] services every source that was
//!   ready: the pending edge is tested-and-cleared and turned into at most one
//!   transmission, and at most one received frame is popped and logged.
//!
//! The receive source is level-triggered: frames left in the queue make the
//! next wait return immediately, so the loop never re-checks the queue
//! itself. Steady-state failures are logged and counted, never returned.
use core::convert::Infallible;

use embassy_time::Duration;
use futures_util::{future::select, pin_mut};

use crate::error::StartupError;
use crate::fmt::Debug2Format;
use crate::protocol::babbling::completion::TxCompletion;
use crate::protocol::babbling::config::{BabblerConfig, RX_QUEUE_DEPTH};
use crate::protocol::babbling::BabblerResources;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_controller::{CanController, FilterId};
use crate::protocol::transport::traits::edge_input::EdgeInput;

/// Sources found ready after a wakeup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Readiness {
    /// An edge is pending.
    pub input: bool,
    /// The receive queue holds at least one frame.
    pub rx: bool,
}

impl Readiness {
    pub fn any(&self) -> bool {
        self.input || self.rx
    }
}

/// What happened to a consumed button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxOutcome {
    /// Frame handed to the driver; a permit is now in flight.
    Enqueued,
    /// Every permit was in flight; the press was dropped.
    NoPermit,
    /// The driver refused the frame; the press was dropped and the permit
    /// returned.
    Rejected,
}

/// Result of one dispatching pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Set when a pending edge was consumed.
    pub tx: Option<TxOutcome>,
    /// Frame popped and logged during this pass.
    pub rx: Option<CanFrame>,
    /// Frames the receive queue rejected since the previous pass.
    pub rx_overflows: u32,
}

/// Counters kept across passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopStats {
    pub passes: u32,
    pub input_events: u32,
    pub tx_enqueued: u32,
    pub tx_no_permit: u32,
    pub tx_rejected: u32,
    pub rx_frames: u32,
    pub rx_overflows: u32,
}

/// The babbling service: owns the drivers and the outbound frame, and shares
/// [`BabblerResources`] with interrupt context.
pub struct Babbler<C, I, const RX_DEPTH: usize = RX_QUEUE_DEPTH>
where
    C: CanController,
    I: EdgeInput,
{
    bus: C,
    input: Option<I>,
    resources: &'static BabblerResources<RX_DEPTH>,
    frame: CanFrame,
    tx_timeout: Duration,
    filter_id: FilterId,
    stats: LoopStats,
}

impl<C, I, const RX_DEPTH: usize> Babbler<C, I, RX_DEPTH>
where
    C: CanController,
    I: EdgeInput,
{
    /// One-time startup sequence. Any failure is fatal: the error is logged
    /// and returned, and the caller is expected to halt.
    ///
    /// Order: build the outbound frame, check the controller, install the
    /// receive filter, start the controller, then (if a button is present)
    /// check, configure, and hook the button.
    pub fn start(
        mut bus: C,
        mut input: Option<I>,
        config: &BabblerConfig,
        resources: &'static BabblerResources<RX_DEPTH>,
    ) -> Result<Self, StartupError<C::Error, I::Error>> {
        let frame = config.outbound_frame().map_err(|err| {
            error!("Invalid outbound frame: {}", err);
            err
        })?;

        if !bus.is_ready() {
            error!("CAN device not ready");
            return Err(StartupError::BusNotReady);
        }

        let filter_id = bus
            .add_rx_filter(&config.rx_filter, resources.queue())
            .map_err(|err| {
                error!("Failed to add filter: {}", Debug2Format(&err));
                StartupError::FilterRegistration(err)
            })?;

        bus.start().map_err(|err| {
            error!("Error starting CAN controller: {}", Debug2Format(&err));
            StartupError::BusStart(err)
        })?;

        if let Some(button) = input.as_mut() {
            if !button.is_ready() {
                error!("Button device not ready");
                return Err(StartupError::InputNotReady);
            }
            button.configure_as_interrupt_input().map_err(|err| {
                error!("Failed to configure button GPIO: {}", Debug2Format(&err));
                StartupError::InputConfig(err)
            })?;
            button
                .register_edge_callback(resources.notifier())
                .map_err(|err| {
                    error!("Failed to register button callback: {}", Debug2Format(&err));
                    StartupError::InputCallback(err)
                })?;
        }

        info!(
            "babbling on {} with {} ({}-bit) CAN ID {}, RTR {}, CAN-FD {}",
            bus.name(),
            frame.id().kind_name(),
            frame.id().bits(),
            frame.id(),
            frame.is_remote(),
            frame.is_fd()
        );
        if let Some(button) = input.as_ref() {
            info!("Send by pressing {} button", button.name());
        }

        Ok(Self {
            bus,
            input,
            resources,
            frame,
            tx_timeout: config.tx_timeout,
            filter_id,
            stats: LoopStats::default(),
        })
    }

    /// Runs the service forever.
    pub async fn run(&mut self) -> Infallible {
        loop {
            self.step().await;
        }
    }

    /// One Idle-Waiting → Dispatching cycle.
    pub async fn step(&mut self) -> DispatchReport {
        let ready = self.wait_ready().await;
        self.dispatch(ready)
    }

    /// Suspends until an edge is pending or a frame is queued, then returns a
    /// snapshot of every ready source. Consumes nothing.
    pub async fn wait_ready(&self) -> Readiness {
        {
            let input = self.resources.notifier().wait_pending();
            let rx = self.resources.queue().wait_non_empty();
            pin_mut!(input);
            pin_mut!(rx);
            select(input, rx).await;
        }
        // Only this loop consumes either source, so what woke us is still set.
        self.readiness()
    }

    /// Non-blocking snapshot of the event sources.
    pub fn readiness(&self) -> Readiness {
        Readiness {
            input: self.resources.notifier().is_pending(),
            rx: !self.resources.queue().is_empty(),
        }
    }

    /// Services the sources flagged in `ready`, once each.
    pub fn dispatch(&mut self, ready: Readiness) -> DispatchReport {
        self.stats.passes = self.stats.passes.saturating_add(1);
        let mut report = DispatchReport::default();

        if ready.input && self.resources.notifier().take() {
            report.tx = Some(self.transmit());
        }

        if ready.rx {
            if let Some(frame) = self.resources.queue().pop() {
                log_frame(&frame);
                self.stats.rx_frames = self.stats.rx_frames.saturating_add(1);
                report.rx = Some(frame);
            }
        }

        let overflows = self.resources.queue().take_overflows();
        if overflows > 0 {
            warn!("Receive queue full: {} frame(s) dropped", overflows);
            self.stats.rx_overflows = self.stats.rx_overflows.saturating_add(overflows);
            report.rx_overflows = overflows;
        }

        report
    }

    fn transmit(&mut self) -> TxOutcome {
        self.stats.input_events = self.stats.input_events.saturating_add(1);

        let gate = self.resources.gate();
        let Some(permit) = gate.try_acquire() else {
            warn!(
                "No TX slot free ({} in flight), button press dropped",
                gate.in_flight()
            );
            self.stats.tx_no_permit = self.stats.tx_no_permit.saturating_add(1);
            return TxOutcome::NoPermit;
        };

        let completion = TxCompletion::new(permit, self.frame.id());
        match self.bus.send(&self.frame, self.tx_timeout, completion) {
            Ok(()) => {
                info!("CAN frame enqueued");
                self.stats.tx_enqueued = self.stats.tx_enqueued.saturating_add(1);
                TxOutcome::Enqueued
            }
            Err(err) => {
                warn!("Failed to enqueue CAN frame: {}", Debug2Format(&err));
                self.stats.tx_rejected = self.stats.tx_rejected.saturating_add(1);
                TxOutcome::Rejected
            }
        }
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// Outbound frame built at startup.
    pub fn frame(&self) -> &CanFrame {
        &self.frame
    }

    pub fn filter_id(&self) -> FilterId {
        self.filter_id
    }

    pub fn resources(&self) -> &'static BabblerResources<RX_DEPTH> {
        self.resources
    }

    pub fn bus(&self) -> &C {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut C {
        &mut self.bus
    }

    pub fn input(&self) -> Option<&I> {
        self.input.as_ref()
    }
}

fn log_frame(frame: &CanFrame) {
    info!(
        "received CAN frame ID {} ({}-bit), RTR {}, FD {}, DLC {}, data {=[u8]:x}",
        frame.id(),
        frame.id().bits(),
        frame.is_remote(),
        frame.is_fd(),
        frame.dlc(),
        frame.data()
    );
}

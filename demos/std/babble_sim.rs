//! Host simulation of the babbling service.
//!
//! A simulated controller completes every transmission a few milliseconds
//! after it is queued, a simulated button is pressed in bursts, and a peer
//! node sends a mix of frames, only some of which pass the receive filter.
//!
//! Run with `cargo run --example babble_sim`.
use std::sync::{Arc, Mutex};

use can_babbler::infra::edge_notifier::EdgeNotifier;
use can_babbler::infra::rx_queue::FrameSink;
use can_babbler::protocol::babbling::completion::TxCompletion;
use can_babbler::protocol::babbling::{
    Babbler, BabblerConfig, BabblerResources, DEFAULT_MAX_IN_FLIGHT,
};
use can_babbler::protocol::transport::can_frame::CanFrame;
use can_babbler::protocol::transport::can_id::CanId;
use can_babbler::protocol::transport::filter::RxFilter;
use can_babbler::protocol::transport::traits::can_controller::{CanController, FilterId};
use can_babbler::protocol::transport::traits::edge_input::EdgeInput;
use static_cell::StaticCell;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

static RESOURCES: StaticCell<BabblerResources> = StaticCell::new();

/// Transmission latency of the simulated controller.
const TX_LATENCY: Duration = Duration::from_millis(4);

#[derive(Debug)]
enum SimError {
    TxQueueClosed,
}

#[derive(Clone)]
struct SimBus {
    filters: Arc<Mutex<Vec<(RxFilter, &'static dyn FrameSink)>>>,
    tx_done: Option<mpsc::UnboundedSender<TxCompletion>>,
}

impl SimBus {
    fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<TxCompletion>();
        tokio::spawn(async move {
            while let Some(completion) = rx.recv().await {
                sleep(TX_LATENCY).await;
                completion.complete(Ok(()));
            }
        });
        Self {
            filters: Arc::default(),
            tx_done: Some(tx),
        }
    }

    /// A frame seen on the wire.
    fn inject(&self, frame: CanFrame) {
        let sinks: Vec<_> = match self.filters.lock() {
            Ok(filters) => filters
                .iter()
                .filter(|(filter, _)| filter.matches(&frame))
                .map(|(_, sink)| *sink)
                .collect(),
            Err(_) => return,
        };
        for sink in sinks {
            let _ = sink.push(frame);
        }
    }
}

impl CanController for SimBus {
    type Error = SimError;

    fn name(&self) -> &str {
        "sim-can0"
    }

    fn is_ready(&self) -> bool {
        self.tx_done.is_some()
    }

    fn add_rx_filter(
        &mut self,
        filter: &RxFilter,
        sink: &'static dyn FrameSink,
    ) -> Result<FilterId, Self::Error> {
        let mut filters = self.filters.lock().map_err(|_| SimError::TxQueueClosed)?;
        filters.push((*filter, sink));
        Ok(FilterId(filters.len() - 1))
    }

    fn send(
        &mut self,
        _frame: &CanFrame,
        _timeout: embassy_time::Duration,
        completion: TxCompletion,
    ) -> Result<(), Self::Error> {
        self.tx_done
            .as_ref()
            .ok_or(SimError::TxQueueClosed)?
            .send(completion)
            .map_err(|_| SimError::TxQueueClosed)
    }
}

#[derive(Clone, Default)]
struct SimButton {
    notifier: Arc<Mutex<Option<&'static EdgeNotifier>>>,
}

impl SimButton {
    fn press(&self) {
        if let Ok(Some(notifier)) = self.notifier.lock().map(|n| *n) {
            notifier.notify();
        }
    }
}

impl EdgeInput for SimButton {
    type Error = SimError;

    fn name(&self) -> &str {
        "sw0"
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn configure_as_interrupt_input(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn register_edge_callback(
        &mut self,
        notifier: &'static EdgeNotifier,
    ) -> Result<(), Self::Error> {
        if let Ok(mut slot) = self.notifier.lock() {
            *slot = Some(notifier);
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let resources = RESOURCES.init(BabblerResources::new(DEFAULT_MAX_IN_FLIGHT));
    let bus = SimBus::new();
    let button = SimButton::default();

    let mut babbler = match Babbler::start(
        bus.clone(),
        Some(button.clone()),
        &BabblerConfig::DEFAULT,
        resources,
    ) {
        Ok(babbler) => babbler,
        Err(err) => {
            eprintln!("startup failed: {err}");
            return;
        }
    };

    // Bursts of presses faster than the controller drains them.
    let presser = tokio::spawn(async move {
        for _ in 0..6 {
            for _ in 0..8 {
                button.press();
                sleep(Duration::from_millis(1)).await;
            }
            sleep(Duration::from_millis(30)).await;
        }
    });

    // Peer traffic: 0x7cd passes the filter, 0x7c9 and 0x123 do not.
    let peer = tokio::spawn(async move {
        for seq in 0..30u8 {
            for raw in [0x7cd, 0x7c9, 0x123] {
                let frame = CanId::standard(raw)
                    .ok()
                    .and_then(|id| CanFrame::new(id, &[seq, 0xab]).ok());
                if let Some(frame) = frame {
                    bus.inject(frame);
                }
            }
            sleep(Duration::from_millis(5)).await;
        }
    });

    tokio::select! {
        _ = babbler.run() => {}
        _ = async {
            let _ = presser.await;
            let _ = peer.await;
            sleep(Duration::from_millis(50)).await;
        } => {}
    }

    let stats = babbler.stats();
    println!("passes:            {}", stats.passes);
    println!("button events:     {}", stats.input_events);
    println!("frames enqueued:   {}", stats.tx_enqueued);
    println!("presses dropped:   {}", stats.tx_no_permit);
    println!("driver rejections: {}", stats.tx_rejected);
    println!("frames received:   {}", stats.rx_frames);
    println!("rx overflows:      {}", stats.rx_overflows);
    println!(
        "permits available: {}/{}",
        resources.gate().available(),
        resources.gate().capacity()
    );
}

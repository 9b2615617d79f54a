/// Test doubles simulating the CAN controller and the button during
/// integration tests.
use can_babbler::{
    error::TxError,
    infra::{edge_notifier::EdgeNotifier, rx_queue::FrameSink},
    protocol::{
        babbling::{completion::TxCompletion, BabblerResources},
        transport::{
            can_frame::CanFrame,
            can_id::CanId,
            filter::RxFilter,
            traits::{
                can_controller::{CanController, FilterId},
                edge_input::EdgeInput,
            },
        },
    },
};
use embassy_time::Duration;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
/// Failures the mocks can be told to report.
pub enum MockError {
    FilterTableFull,
    StartFailed,
    Busy,
    Pin,
}

#[allow(dead_code)]
/// Observable state of [`MockCanController`].
pub struct MockCanState {
    pub ready: bool,
    pub fail_filter: bool,
    pub fail_start: bool,
    /// Number of upcoming `send` calls to reject.
    pub reject_sends: usize,
    /// Deliver our own transmissions back through the filters.
    pub loopback: bool,
    pub started: bool,
    pub filters: Vec<(RxFilter, &'static dyn FrameSink)>,
    pub sent: Vec<CanFrame>,
    pub last_timeout: Option<Duration>,
    pub pending: VecDeque<TxCompletion>,
}

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory CAN controller reproducing the `CanController` contract.
pub struct MockCanController {
    state: Arc<Mutex<MockCanState>>,
}

#[allow(dead_code)]
impl MockCanController {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockCanState {
                ready: true,
                fail_filter: false,
                fail_start: false,
                reject_sends: 0,
                loopback: false,
                started: false,
                filters: Vec::new(),
                sent: Vec::new(),
                last_timeout: None,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Run `f` with the state locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut MockCanState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Frame arriving from the bus: pushed into every sink whose filter
    /// matches. Returns how many sinks accepted it.
    pub fn deliver(&self, frame: CanFrame) -> usize {
        let sinks: Vec<&'static dyn FrameSink> = self.with(|state| {
            state
                .filters
                .iter()
                .filter(|(filter, _)| filter.matches(&frame))
                .map(|(_, sink)| *sink)
                .collect()
        });
        sinks
            .into_iter()
            .filter(|sink| sink.push(frame).is_ok())
            .count()
    }

    /// Finish the oldest in-flight transmission, as the TX-done interrupt would.
    pub fn complete_next(&self, result: Result<(), TxError>) -> bool {
        // Called outside the lock: completion handlers may run anywhere.
        let completion = self.with(|state| state.pending.pop_front());
        match completion {
            Some(completion) => {
                completion.complete(result);
                true
            }
            None => false,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.with(|state| state.sent.len())
    }

    pub fn pending_count(&self) -> usize {
        self.with(|state| state.pending.len())
    }
}

impl CanController for MockCanController {
    type Error = MockError;

    fn name(&self) -> &str {
        "can1"
    }

    fn is_ready(&self) -> bool {
        self.with(|state| state.ready)
    }

    fn add_rx_filter(
        &mut self,
        filter: &RxFilter,
        sink: &'static dyn FrameSink,
    ) -> Result<FilterId, Self::Error> {
        self.with(|state| {
            if state.fail_filter {
                return Err(MockError::FilterTableFull);
            }
            state.filters.push((*filter, sink));
            Ok(FilterId(state.filters.len() - 1))
        })
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        self.with(|state| {
            if state.fail_start {
                return Err(MockError::StartFailed);
            }
            state.started = true;
            Ok(())
        })
    }

    fn send(
        &mut self,
        frame: &CanFrame,
        timeout: Duration,
        completion: TxCompletion,
    ) -> Result<(), Self::Error> {
        let loopback = self.with(|state| {
            state.last_timeout = Some(timeout);
            if state.reject_sends > 0 {
                state.reject_sends -= 1;
                return Err(MockError::Busy);
            }
            state.sent.push(*frame);
            state.pending.push_back(completion);
            Ok(state.loopback)
        })?;
        if loopback {
            self.deliver(*frame);
        }
        Ok(())
    }
}

#[allow(dead_code)]
/// Observable state of [`MockButton`].
pub struct MockButtonState {
    pub ready: bool,
    pub fail_configure: bool,
    pub fail_callback: bool,
    pub configured: bool,
    pub notifier: Option<&'static EdgeNotifier>,
}

#[derive(Clone)]
#[allow(dead_code)]
/// GPIO button whose `press` plays the role of the edge interrupt.
pub struct MockButton {
    state: Arc<Mutex<MockButtonState>>,
}

#[allow(dead_code)]
impl MockButton {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockButtonState {
                ready: true,
                fail_configure: false,
                fail_callback: false,
                configured: false,
                notifier: None,
            })),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockButtonState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// One active edge. Does nothing until the callback is registered.
    pub fn press(&self) {
        if let Some(notifier) = self.with(|state| state.notifier) {
            notifier.notify();
        }
    }
}

impl EdgeInput for MockButton {
    type Error = MockError;

    fn name(&self) -> &str {
        "sw0"
    }

    fn is_ready(&self) -> bool {
        self.with(|state| state.ready)
    }

    fn configure_as_interrupt_input(&mut self) -> Result<(), Self::Error> {
        self.with(|state| {
            if state.fail_configure {
                return Err(MockError::Pin);
            }
            state.configured = true;
            Ok(())
        })
    }

    fn register_edge_callback(
        &mut self,
        notifier: &'static EdgeNotifier,
    ) -> Result<(), Self::Error> {
        self.with(|state| {
            if state.fail_callback {
                return Err(MockError::Pin);
            }
            state.notifier = Some(notifier);
            Ok(())
        })
    }
}

#[allow(dead_code)]
/// Fresh `'static` resources for one test.
pub fn leak_resources<const N: usize>(max_in_flight: usize) -> &'static BabblerResources<N> {
    Box::leak(Box::new(BabblerResources::new(max_in_flight)))
}

#[allow(dead_code)]
/// Standard-id frame whose first payload byte tags it.
pub fn std_frame(raw: u16, tag: u8) -> CanFrame {
    CanFrame::new(CanId::standard(raw).unwrap(), &[tag]).unwrap()
}

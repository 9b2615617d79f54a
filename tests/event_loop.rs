//! Event multiplexing: edge coalescing, receive ordering, overflow policy,
//! filter isolation, and the never-ending loop driven under tokio.
mod helpers;

use can_babbler::protocol::babbling::{
    Babbler, BabblerConfig, BabblerResources, Readiness, TxOutcome,
};
use can_babbler::protocol::transport::traits::edge_input::NoButton;
use helpers::{leak_resources, std_frame, MockButton, MockCanController};
use static_cell::StaticCell;
use tokio::time::Duration;

fn setup<const N: usize>(
    max_in_flight: usize,
) -> (
    Babbler<MockCanController, MockButton, N>,
    MockCanController,
    MockButton,
) {
    let bus = MockCanController::new();
    let button = MockButton::new();
    let babbler = Babbler::start(
        bus.clone(),
        Some(button.clone()),
        &BabblerConfig::DEFAULT,
        leak_resources::<N>(max_in_flight),
    )
    .expect("startup must succeed");
    (babbler, bus, button)
}

#[tokio::test]
/// N presses before the loop drains input produce one transmission.
async fn edges_coalesce_into_one_attempt() {
    let (mut babbler, bus, button) = setup::<8>(4);

    for _ in 0..5 {
        button.press();
    }
    let report = babbler.step().await;
    assert_eq!(report.tx, Some(TxOutcome::Enqueued));
    assert_eq!(bus.sent_count(), 1);
    assert!(!babbler.readiness().any());
    assert_eq!(babbler.stats().input_events, 1);
}

#[tokio::test]
/// Frames come out of the loop in arrival order, one per pass.
async fn received_frames_keep_fifo_order() {
    let (mut babbler, bus, _button) = setup::<16>(1);

    for tag in 0..10u8 {
        assert_eq!(bus.deliver(std_frame(0x7cd, tag)), 1);
    }

    for tag in 0..10u8 {
        let report = babbler.step().await;
        assert_eq!(report.tx, None);
        let frame = report.rx.expect("one frame per pass");
        assert_eq!(frame.data(), &[tag]);
    }
    assert!(!babbler.readiness().rx);
    assert_eq!(babbler.stats().rx_frames, 10);
}

#[tokio::test]
/// Depth 2, three frames: the third is rejected and reported; the first two
/// are drained in order.
async fn full_queue_rejects_newest_frame() {
    let (mut babbler, bus, _button) = setup::<2>(1);

    assert_eq!(bus.deliver(std_frame(0x7cd, 1)), 1);
    assert_eq!(bus.deliver(std_frame(0x7cd, 2)), 1);
    assert_eq!(bus.deliver(std_frame(0x7cd, 3)), 0);

    let first = babbler.step().await;
    assert_eq!(first.rx.map(|f| f.data()[0]), Some(1));
    assert_eq!(first.rx_overflows, 1);

    let second = babbler.step().await;
    assert_eq!(second.rx.map(|f| f.data()[0]), Some(2));
    assert_eq!(second.rx_overflows, 0);

    assert!(!babbler.readiness().rx);
    assert_eq!(babbler.stats().rx_overflows, 1);
}

#[tokio::test]
/// Our own 0x7c9 transmissions, looped back by the controller, never match
/// the 0x7cd/0x7cd filter.
async fn own_frames_are_filtered_out() {
    let (mut babbler, bus, button) = setup::<8>(4);
    bus.with(|state| state.loopback = true);

    button.press();
    let report = babbler.step().await;
    assert_eq!(report.tx, Some(TxOutcome::Enqueued));
    assert_eq!(bus.sent_count(), 1);

    assert!(!babbler.readiness().rx);
    assert_eq!(bus.deliver(std_frame(0x7c9, 0)), 0);
    assert!(babbler.resources().queue().is_empty());
}

#[tokio::test]
/// An edge and a frame ready together are both serviced in one pass.
async fn simultaneous_sources_share_one_pass() {
    let (mut babbler, bus, button) = setup::<8>(1);

    button.press();
    bus.deliver(std_frame(0x7cd, 9));

    let report = babbler.step().await;
    assert_eq!(report.tx, Some(TxOutcome::Enqueued));
    assert_eq!(report.rx.map(|f| f.data()[0]), Some(9));
    assert_eq!(babbler.readiness(), Readiness::default());
}

#[tokio::test]
/// A pass only services what it was told was ready.
async fn dispatch_ignores_sources_not_flagged() {
    let (mut babbler, bus, button) = setup::<8>(1);
    button.press();
    bus.deliver(std_frame(0x7cd, 1));

    let report = babbler.dispatch(Readiness {
        input: false,
        rx: true,
    });
    assert_eq!(report.tx, None);
    assert!(report.rx.is_some());
    assert!(babbler.readiness().input);
}

static RESOURCES: StaticCell<BabblerResources<4>> = StaticCell::new();

#[tokio::test]
/// The loop wakes for edges and frames raised from outside while it waits.
async fn run_services_events_as_they_arrive() {
    let resources: &'static BabblerResources<4> = RESOURCES.init(BabblerResources::new(1));
    let bus = MockCanController::new();
    let button = MockButton::new();
    let mut babbler = Babbler::start(
        bus.clone(),
        Some(button.clone()),
        &BabblerConfig::DEFAULT,
        resources,
    )
    .expect("startup must succeed");

    tokio::select! {
        _ = babbler.run() => unreachable!("the loop never returns"),
        _ = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(bus.sent_count(), 0);

            button.press();
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(bus.sent_count(), 1);

            // Saturated until the driver reports completion.
            button.press();
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(bus.sent_count(), 1);

            bus.complete_next(Ok(()));
            button.press();
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(bus.sent_count(), 2);

            bus.deliver(std_frame(0x7cd, 1));
            bus.deliver(std_frame(0x7cd, 2));
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(resources.queue().is_empty());
        } => {}
    }

    let stats = babbler.stats();
    assert_eq!(stats.tx_enqueued, 2);
    assert_eq!(stats.tx_no_permit, 1);
    assert_eq!(stats.rx_frames, 2);
}

#[tokio::test]
/// Without a button the loop only drains the receive queue.
async fn loop_without_button_only_receives() {
    let bus = MockCanController::new();
    let mut babbler = Babbler::<_, NoButton, 4>::start(
        bus.clone(),
        None,
        &BabblerConfig::DEFAULT,
        leak_resources::<4>(1),
    )
    .unwrap();

    bus.deliver(std_frame(0x7cd, 5));
    let report = babbler.step().await;
    assert_eq!(report.tx, None);
    assert_eq!(report.rx.map(|f| f.data()[0]), Some(5));
    assert_eq!(bus.sent_count(), 0);
}

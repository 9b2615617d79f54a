//! Bounded receive queue between the CAN driver's filter-match path and the
//! event loop.
//!
//! Overflow policy is **reject-new**: pushing onto a full queue fails
//! immediately, the incoming frame is dropped, and an overflow counter is
//! bumped. Frames already queued are never evicted, so what the loop drains
//! is always a FIFO prefix of what the driver delivered.
use core::cell::Cell;
use core::future::Future;
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_sync::channel::Channel;
use futures_util::future::poll_fn;

use crate::error::RxQueueFull;
use crate::protocol::transport::can_frame::CanFrame;

/// Producer side of a receive queue, as seen by a CAN driver.
///
/// Implementations must never block: they are called from interrupt or
/// driver-callback context.
pub trait FrameSink: Sync {
    /// Enqueues `frame`, or rejects it when there is no room.
    fn push(&self, frame: CanFrame) -> Result<(), RxQueueFull>;
}

/// FIFO of received frames with capacity `N`.
pub struct RxQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, CanFrame, N>,
    overflows: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl<const N: usize> Default for RxQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            overflows: Mutex::new(Cell::new(0)),
        }
    }

    /// Enqueues without blocking; a full queue rejects the frame.
    pub fn push(&self, frame: CanFrame) -> Result<(), RxQueueFull> {
        self.channel.try_send(frame).map_err(|_| {
            self.overflows
                .lock(|count| count.set(count.get().saturating_add(1)));
            RxQueueFull
        })
    }

    /// Dequeues the oldest frame, if any.
    pub fn pop(&self) -> Option<CanFrame> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Frames rejected since the last call; resets the counter.
    pub fn take_overflows(&self) -> u32 {
        self.overflows.lock(|count| count.replace(0))
    }

    /// Frames rejected since the counter was last taken.
    pub fn overflows(&self) -> u32 {
        self.overflows.lock(Cell::get)
    }

    /// Ready while at least one frame is queued (level-triggered).
    pub fn poll_non_empty(&self, cx: &mut Context<'_>) -> Poll<()> {
        self.channel.poll_ready_to_receive(cx)
    }

    /// Waits until the queue holds a frame. Does not dequeue.
    pub fn wait_non_empty(&self) -> impl Future<Output = ()> + '_ {
        poll_fn(move |cx| self.poll_non_empty(cx))
    }
}

impl<const N: usize> FrameSink for RxQueue<N> {
    fn push(&self, frame: CanFrame) -> Result<(), RxQueueFull> {
        RxQueue::push(self, frame)
    }
}

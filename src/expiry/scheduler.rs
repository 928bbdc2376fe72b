//! Expiration Scheduler Module
//!
//! A concurrency-safe queue of expiration tickets ordered by due time,
//! with a blocking "take next due ticket" operation for the worker.

use std::cmp::{Ordering, Reverse};
use std::collections::binary_heap::PeekMut;
use std::collections::BinaryHeap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{self, Instant};
use tracing::debug;

// == Scheduled Ticket ==
/// A ticket with its scheduler-side ordering pair.
///
/// Ordered by due time ascending, tie-broken by insertion sequence so
/// tickets with equal deadlines come out first-in-first-out.
#[derive(Debug)]
struct Scheduled<T> {
    due: Instant,
    seq: u64,
    ticket: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

// == Scheduler State ==
#[derive(Debug)]
struct SchedulerState<T> {
    /// Pending tickets, min-ordered by (due, seq)
    queue: BinaryHeap<Reverse<Scheduled<T>>>,
    /// Next insertion sequence number
    seq: u64,
    /// Once set, enqueue and take are refused
    closed: bool,
}

// == Expiration Scheduler ==
/// A thread-safe minimum-ordered collection of tickets by due time.
///
/// The scheduler has its own lock and wake condition, separate from
/// any shard lock: enqueue and take never touch a shard, which keeps
/// the two lock domains free of ordering cycles.
#[derive(Debug)]
pub struct ExpirationScheduler<T> {
    state: Mutex<SchedulerState<T>>,
    /// Wakes the blocked consumer on a nearer deadline or disposal
    notify: Notify,
}

impl<T> ExpirationScheduler<T> {
    // == Constructor ==
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState {
                queue: BinaryHeap::new(),
                seq: 0,
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    // == Enqueue ==
    /// Schedules a ticket to come due after `delay`.
    ///
    /// If the new ticket becomes the earliest due, the blocked consumer
    /// is woken so its waiting time is re-evaluated against the nearer
    /// deadline; otherwise the consumer's current wait already covers
    /// it. Tickets enqueued after disposal are dropped.
    pub fn enqueue(&self, ticket: T, delay: Duration) {
        let due = Instant::now() + delay;

        let preempts = {
            let mut state = self.state.lock();
            if state.closed {
                debug!("scheduler disposed, dropping ticket");
                return;
            }

            let seq = state.seq;
            state.seq += 1;

            let preempts = state
                .queue
                .peek()
                .map_or(true, |Reverse(head)| due < head.due);
            state.queue.push(Reverse(Scheduled { due, seq, ticket }));
            preempts
        };

        if preempts {
            self.notify.notify_one();
        }
    }

    // == Take ==
    /// Waits until the earliest ticket's due time has elapsed, then
    /// removes and returns it.
    ///
    /// With no ticket pending, waits indefinitely for an enqueue.
    /// Returns `None` once the scheduler has been disposed, which is
    /// the consumer's cancellation signal.
    pub async fn take(&self) -> Option<T> {
        loop {
            // Register for wakeups before inspecting state, so an
            // enqueue or dispose between the check and the wait below
            // is not lost.
            let notified = self.notify.notified();

            let deadline = {
                let mut state = self.state.lock();
                if state.closed {
                    return None;
                }
                let due = match state.queue.peek_mut() {
                    Some(head) if head.0.due <= Instant::now() => {
                        let Reverse(fired) = PeekMut::pop(head);
                        return Some(fired.ticket);
                    }
                    Some(head) => Some(head.0.due),
                    None => None,
                };
                due
            };

            match deadline {
                Some(due) => {
                    tokio::select! {
                        _ = time::sleep_until(due) => {}
                        _ = notified => {}
                    }
                }
                None => notified.await,
            }
        }
    }

    // == Dispose ==
    /// Wakes the blocked consumer with the cancellation signal and
    /// refuses any further enqueue/take activity. Idempotent.
    pub fn dispose(&self) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.queue.clear();
        }
        self.notify.notify_one();
    }

    /// Returns the number of pending tickets.
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }
}

impl<T> Default for ExpirationScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

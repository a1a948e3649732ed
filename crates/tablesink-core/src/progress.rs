// Copyright 2026 Table Sink Core Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The progress tracker (C1): accounts for in-flight events and
//! resolved-ts markers, and computes the largest checkpoint that is safe to
//! report given which acks have fired so far.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use tablesink_common::ResolvedTs;
use tracing::{debug, info};

/// Number of pending items per queue segment. Bounds pop-time cache
/// pressure and lets [`ProgressTracker::wait_closed`] free segments
/// progressively as they drain, instead of holding one giant growing
/// buffer for the life of the sink.
const DEFAULT_BUFFER_SIZE: usize = 512;

enum PendingItem {
    EventPending { ack_id: u64 },
    ResolvedMarker { resolved_ts: ResolvedTs },
}

struct Segment {
    items: Vec<PendingItem>,
    front: usize,
}

impl Segment {
    fn new() -> Self {
        Self {
            items: Vec::with_capacity(DEFAULT_BUFFER_SIZE),
            front: 0,
        }
    }

    fn is_drained(&self) -> bool {
        self.front == self.items.len()
    }

    fn is_full(&self) -> bool {
        self.items.len() == DEFAULT_BUFFER_SIZE
    }
}

struct Inner {
    segments: VecDeque<Segment>,
    pending_len: usize,
    acked: HashSet<u64>,
    next_ack_id: u64,
    frontier: ResolvedTs,
    last_enqueued_marker: Option<ResolvedTs>,
    frozen: bool,
}

impl Inner {
    fn new() -> Self {
        Self {
            segments: VecDeque::new(),
            pending_len: 0,
            acked: HashSet::new(),
            next_ack_id: 0,
            frontier: ResolvedTs::default(),
            last_enqueued_marker: None,
            frozen: false,
        }
    }

    fn enqueue(&mut self, item: PendingItem) {
        if self.segments.back().map_or(true, Segment::is_full) {
            self.segments.push_back(Segment::new());
        }
        self.segments.back_mut().unwrap().items.push(item);
        self.pending_len += 1;
    }

    /// Pops from the head of the queue while the head is either an acked
    /// `EventPending` or a `ResolvedMarker`, advancing `frontier` on each
    /// marker consumed. Stops at an unacked `EventPending` or an empty
    /// queue.
    fn advance(&mut self) -> ResolvedTs {
        loop {
            let Some(seg) = self.segments.front_mut() else {
                break;
            };
            if seg.is_drained() {
                self.segments.pop_front();
                continue;
            }
            match &seg.items[seg.front] {
                PendingItem::EventPending { ack_id } => {
                    if self.acked.remove(ack_id) {
                        seg.front += 1;
                        self.pending_len -= 1;
                    } else {
                        break;
                    }
                }
                PendingItem::ResolvedMarker { resolved_ts } => {
                    self.frontier = *resolved_ts;
                    seg.front += 1;
                    self.pending_len -= 1;
                }
            }
        }
        self.frontier
    }

    fn check_closed(&mut self, backend_dead: bool) -> bool {
        if backend_dead {
            if let Some(last) = self.last_enqueued_marker {
                if last > self.frontier {
                    info!(
                        frontier = ?self.frontier,
                        last_marker = ?last,
                        "backend declared dead, advancing checkpoint to last enqueued resolved-ts"
                    );
                    self.frontier = last;
                }
            }
            return true;
        }
        self.pending_len == 0
    }
}

/// A single-use capability that marks one in-flight event as durable when
/// invoked. Invoking it more than once is a no-op (P5).
#[derive(Clone)]
pub struct AckHandle {
    tracker: Arc<Mutex<Inner>>,
    condvar: Arc<Condvar>,
    ack_id: u64,
}

impl AckHandle {
    pub fn ack(&self) {
        let mut inner = self.tracker.lock();
        inner.acked.insert(self.ack_id);
        drop(inner);
        self.condvar.notify_all();
    }
}

/// Accounts for in-flight events and resolved-ts markers; computes the
/// largest safe checkpoint.
pub struct ProgressTracker {
    inner: Arc<Mutex<Inner>>,
    condvar: Arc<Condvar>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::new())),
            condvar: Arc::new(Condvar::new()),
        }
    }

    /// Allocates a fresh ack id and returns a handle for it.
    pub fn add_event(&self) -> AckHandle {
        let mut inner = self.inner.lock();
        let ack_id = inner.next_ack_id;
        inner.next_ack_id += 1;
        inner.enqueue(PendingItem::EventPending { ack_id });
        AckHandle {
            tracker: self.inner.clone(),
            condvar: self.condvar.clone(),
            ack_id,
        }
    }

    /// Enqueues a resolved-ts marker, provided `freeze_process` has not been
    /// called and `r` is strictly greater than the last marker enqueued.
    /// Otherwise it is silently dropped (this is what lets I6 hold: markers
    /// added while frozen never let the checkpoint advance further).
    pub fn add_resolved_ts(&self, r: ResolvedTs) {
        let mut inner = self.inner.lock();
        if inner.frozen {
            debug!(resolved_ts = ?r, "dropping resolved-ts marker, tracker is frozen");
            return;
        }
        if let Some(last) = inner.last_enqueued_marker {
            if r <= last {
                return;
            }
        }
        inner.last_enqueued_marker = Some(r);
        inner.enqueue(PendingItem::ResolvedMarker { resolved_ts: r });
    }

    /// Pops everything the head of the queue will currently allow and
    /// returns the resulting frontier. Leaves the frontier unchanged if the
    /// queue is empty.
    pub fn advance(&self) -> ResolvedTs {
        self.inner.lock().advance()
    }

    /// Stops further resolved-ts markers from being enqueued (supports
    /// I6). Does not itself touch the queue.
    pub fn freeze_process(&self) {
        let mut inner = self.inner.lock();
        if !inner.frozen {
            info!("progress tracker frozen, no further resolved-ts markers will be accepted");
        }
        inner.frozen = true;
    }

    /// `true` iff the queue is empty or the backend has been declared dead.
    /// When dead, also optimistically advances the frontier to the last
    /// enqueued resolved marker (see design notes on this tradeoff).
    pub fn check_closed(&self, backend_dead: bool) -> bool {
        self.inner.lock().check_closed(backend_dead)
    }

    /// Blocks until [`Self::check_closed`] would return `true`, draining
    /// the queue as acks arrive in the meantime.
    pub fn wait_closed(&self, backend_dead: bool) {
        let mut inner = self.inner.lock();
        loop {
            inner.advance();
            if inner.check_closed(backend_dead) {
                return;
            }
            self.condvar.wait(&mut inner);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_advance() {
        let tracker = ProgressTracker::new();
        let ack3 = tracker.add_event();
        let ack5 = tracker.add_event();
        let ack7 = tracker.add_event();

        tracker.add_resolved_ts(ResolvedTs::new(6));
        ack3.ack();
        ack5.ack();
        assert_eq!(tracker.advance(), ResolvedTs::new(6));

        tracker.add_resolved_ts(ResolvedTs::new(10));
        ack7.ack();
        assert_eq!(tracker.advance(), ResolvedTs::new(10));
    }

    #[test]
    fn out_of_order_acks() {
        let tracker = ProgressTracker::new();
        let ack3 = tracker.add_event();
        let ack5 = tracker.add_event();
        let ack7 = tracker.add_event();
        tracker.add_resolved_ts(ResolvedTs::new(10));

        ack7.ack();
        assert_eq!(tracker.advance(), ResolvedTs::default());

        ack3.ack();
        assert_eq!(tracker.advance(), ResolvedTs::default());

        ack5.ack();
        assert_eq!(tracker.advance(), ResolvedTs::new(10));
    }

    #[test]
    fn advance_with_no_events() {
        let tracker = ProgressTracker::new();
        tracker.add_resolved_ts(ResolvedTs::new(100));
        assert_eq!(tracker.advance(), ResolvedTs::new(100));
    }

    #[test]
    fn duplicate_ack_is_idempotent() {
        let tracker = ProgressTracker::new();
        let ack = tracker.add_event();
        tracker.add_resolved_ts(ResolvedTs::new(1));
        ack.ack();
        ack.ack();
        assert_eq!(tracker.advance(), ResolvedTs::new(1));
    }

    #[test]
    fn close_with_backend_dead_is_optimistic() {
        let tracker = ProgressTracker::new();
        let _ack = tracker.add_event();
        tracker.add_resolved_ts(ResolvedTs::new(50));
        tracker.freeze_process();

        // marker added after freeze is dropped
        tracker.add_resolved_ts(ResolvedTs::new(60));

        assert!(!tracker.check_closed(false));
        assert!(tracker.check_closed(true));
        assert_eq!(tracker.advance(), ResolvedTs::new(50));
    }

    #[test]
    fn wait_closed_returns_once_drained() {
        let tracker = Arc::new(ProgressTracker::new());
        let ack = tracker.add_event();
        tracker.add_resolved_ts(ResolvedTs::new(1));

        let t2 = tracker.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            ack.ack();
        });
        tracker.wait_closed(false);
        handle.join().unwrap();
        assert_eq!(tracker.advance(), ResolvedTs::new(1));
    }

    #[test]
    fn segments_roll_over_past_default_buffer_size() {
        let tracker = ProgressTracker::new();
        let mut acks = Vec::new();
        for _ in 0..(DEFAULT_BUFFER_SIZE * 3) {
            acks.push(tracker.add_event());
        }
        tracker.add_resolved_ts(ResolvedTs::new(1));
        for ack in acks {
            ack.ack();
        }
        assert_eq!(tracker.advance(), ResolvedTs::new(1));
    }
}

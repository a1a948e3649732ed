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

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tablesink_common::{ChangefeedId, Error, Result, ResolvedTs, SpanId, Ts};
use tracing::warn;

use crate::backend::BackendSink;
use crate::buffer::EventBuffer;
use crate::event::{Appender, CallbackableEvent, Event};
use crate::progress::ProgressTracker;
use crate::state::{SinkState, StateCell, StateHandle};

/// The public facade for a per-`(changefeed, span)` sink: append, advance,
/// checkpoint, close. Glues the event buffer (C2), progress tracker (C1)
/// and lifecycle state machine (C3) to a pluggable backend.
///
/// `append`/`update_resolved_ts` take `&self`, not `&mut self`: the facade
/// is shared (behind an `Arc`) between the producer thread and the
/// scheduler thread that polls `checkpoint_ts`/`close`, so interior
/// mutability is required even though each piece of state has a single
/// logical writer.
pub struct TableSink<E: Event, A: Appender<E>> {
    changefeed_id: ChangefeedId,
    span_id: SpanId,
    start_ts: Ts,
    max_resolved_ts: AtomicU64,
    buffer: Mutex<EventBuffer<E, A>>,
    progress: ProgressTracker,
    state: Arc<StateCell>,
    backend: Arc<dyn BackendSink<E>>,
    rows_appended: AtomicU64,
}

impl<E: Event, A: Appender<E>> TableSink<E, A> {
    pub fn new(
        changefeed_id: ChangefeedId,
        span_id: SpanId,
        start_ts: Ts,
        appender: A,
        backend: Arc<dyn BackendSink<E>>,
    ) -> Self {
        Self {
            changefeed_id,
            span_id,
            start_ts,
            max_resolved_ts: AtomicU64::new(start_ts),
            buffer: Mutex::new(EventBuffer::new(appender)),
            progress: ProgressTracker::new(),
            state: Arc::new(StateCell::new()),
            backend,
            rows_appended: AtomicU64::new(0),
        }
    }

    pub fn start_ts(&self) -> Ts {
        self.start_ts
    }

    pub fn max_resolved_ts(&self) -> Ts {
        self.max_resolved_ts.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SinkState {
        self.state.get()
    }

    pub fn rows_appended(&self) -> u64 {
        self.rows_appended.load(Ordering::Relaxed)
    }

    /// The gap between `max_resolved_ts` and the current checkpoint, in `Ts`
    /// units. Exposed so a producer can rate-limit itself per §5's
    /// backpressure note; this core does no rate-limiting itself.
    pub fn checkpoint_lag(&self) -> u64 {
        self.max_resolved_ts()
            .saturating_sub(self.progress.advance().ts)
    }

    /// Appends events in insertion order. Never blocks, never fails.
    /// Rejected (a no-op, logged) if the sink is no longer `Sinking`.
    pub fn append(&self, events: Vec<E>) {
        if self.state.get() != SinkState::Sinking {
            warn!(
                changefeed = %self.changefeed_id,
                span = %self.span_id,
                state = ?self.state.get(),
                "rejecting append: sink is no longer sinking"
            );
            return;
        }
        if events.is_empty() {
            return;
        }
        self.rows_appended
            .fetch_add(events.len() as u64, Ordering::Relaxed);
        self.buffer.lock().append(events);
    }

    /// Slices the buffer up to `r`, wraps each drained event with an ack
    /// handle, enqueues the resolved-ts marker, and hands the batch to the
    /// backend. The marker is enqueued *before* the backend is called so a
    /// synchronous backend cannot ack its way past the marker before it is
    /// in place (I2).
    pub fn update_resolved_ts(&self, r: ResolvedTs) -> Result<()> {
        if r.ts <= self.max_resolved_ts() {
            return Ok(());
        }
        self.max_resolved_ts.store(r.ts, Ordering::Release);

        let drained = self.buffer.lock().drain_up_to(r);
        let batch: Vec<_> = drained
            .into_iter()
            .map(|event| {
                let ack = self.progress.add_event();
                CallbackableEvent::new(event, ack, StateHandle::new(self.state.clone()))
            })
            .collect();

        self.progress.add_resolved_ts(r);

        self.backend
            .write_events(batch)
            .map_err(Error::SinkInternalError)
    }

    /// Opportunistic close probe: if `Stopping`, checks whether the tracker
    /// has drained (or the backend has died) and transitions to `Stopped`
    /// if so. Always returns the tracker's current frontier.
    pub fn checkpoint_ts(&self) -> ResolvedTs {
        if self.state.get() == SinkState::Stopping && self.progress.check_closed(self.backend.dead())
        {
            self.state.mark_stopped();
        }
        self.progress.advance()
    }

    /// Synchronous close: freezes, blocks until every outstanding ack has
    /// fired (or the backend is dead), then marks the sink stopped.
    /// Idempotent.
    pub fn close(&self) {
        self.freeze();
        let dead = self.backend.dead();
        self.progress.wait_closed(dead);
        self.state.mark_stopped();
    }

    /// Non-blocking close: freezes and probes once. Returns `true` (and
    /// transitions to `Stopped`) if the tracker was already drained or the
    /// backend is dead, `false` if the caller should poll again.
    pub fn async_close(&self) -> bool {
        self.freeze();
        if self.progress.check_closed(self.backend.dead()) {
            self.state.mark_stopped();
            true
        } else {
            false
        }
    }

    fn freeze(&self) {
        self.progress.freeze_process();
        self.state.freeze();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BlackholeSink;
    use crate::event::{RowChangeEvent, SingleRowAppender};

    fn sink() -> TableSink<RowChangeEvent, SingleRowAppender> {
        TableSink::new(
            ChangefeedId(1),
            SpanId::from("span-a"),
            0,
            SingleRowAppender,
            Arc::new(BlackholeSink::new()),
        )
    }

    fn row(commit_ts: u64) -> RowChangeEvent {
        RowChangeEvent {
            commit_ts,
            key: vec![],
            value: vec![],
        }
    }

    #[test]
    fn advances_past_drained_batches() {
        let sink = sink();
        sink.append(vec![row(3), row(5), row(7)]);
        sink.update_resolved_ts(ResolvedTs::new(6)).unwrap();
        assert_eq!(sink.checkpoint_ts(), ResolvedTs::new(6));

        sink.update_resolved_ts(ResolvedTs::new(10)).unwrap();
        assert_eq!(sink.checkpoint_ts(), ResolvedTs::new(10));
        assert_eq!(sink.rows_appended(), 3);
    }

    #[test]
    fn checkpoint_lag_narrows_as_acks_land() {
        let sink = sink();
        sink.append(vec![row(3), row(5)]);
        sink.update_resolved_ts(ResolvedTs::new(10)).unwrap();
        // BlackholeSink acks synchronously, so the gap closes immediately.
        assert_eq!(sink.checkpoint_lag(), 0);
    }

    #[test]
    fn duplicate_resolved_ts_is_a_no_op() {
        let sink = sink();
        sink.update_resolved_ts(ResolvedTs::new(50)).unwrap();
        assert_eq!(sink.max_resolved_ts(), 50);
        sink.update_resolved_ts(ResolvedTs::new(30)).unwrap();
        assert_eq!(sink.max_resolved_ts(), 50);
    }

    #[test]
    fn close_drains_and_stops() {
        let sink = sink();
        sink.append(vec![row(1)]);
        sink.update_resolved_ts(ResolvedTs::new(1)).unwrap();
        sink.close();
        assert_eq!(sink.state(), SinkState::Stopped);
        assert_eq!(sink.checkpoint_ts(), ResolvedTs::new(1));
    }

    #[test]
    fn append_after_freeze_is_rejected() {
        let sink = sink();
        sink.close();
        sink.append(vec![row(1)]);
        assert_eq!(sink.rows_appended(), 0);
    }

    /// A backend that accepts events into an internal queue but never acks
    /// them, until told it is dead. Used to exercise scenario 5 (close with
    /// the backend dead): the only way `wait_closed` unblocks otherwise is
    /// every ack firing.
    #[derive(Default)]
    struct NeverAckingSink {
        dead: std::sync::atomic::AtomicBool,
    }

    impl NeverAckingSink {
        fn kill(&self) {
            self.dead.store(true, Ordering::Release);
        }
    }

    impl<E: crate::event::Event> BackendSink<E> for NeverAckingSink {
        fn write_events(&self, _batch: Vec<CallbackableEvent<E>>) -> anyhow::Result<()> {
            Ok(())
        }

        fn dead(&self) -> bool {
            self.dead.load(Ordering::Acquire)
        }
    }

    #[test]
    fn close_with_backend_dead_unblocks_and_reports_last_marker() {
        let backend = Arc::new(NeverAckingSink::default());
        let sink = TableSink::new(
            ChangefeedId(1),
            SpanId::from("span-a"),
            0,
            SingleRowAppender,
            backend.clone() as Arc<dyn BackendSink<RowChangeEvent>>,
        );
        sink.append(vec![row(1)]);
        sink.update_resolved_ts(ResolvedTs::new(1)).unwrap();
        backend.kill();

        sink.close();
        assert_eq!(sink.state(), SinkState::Stopped);
        assert_eq!(sink.checkpoint_ts(), ResolvedTs::new(1));
    }

    #[test]
    fn checkpoint_lag_is_positive_while_acks_are_outstanding() {
        let backend = Arc::new(NeverAckingSink::default());
        let sink = TableSink::new(
            ChangefeedId(1),
            SpanId::from("span-a"),
            0,
            SingleRowAppender,
            backend as Arc<dyn BackendSink<RowChangeEvent>>,
        );
        sink.append(vec![row(1)]);
        sink.update_resolved_ts(ResolvedTs::new(5)).unwrap();
        assert_eq!(sink.checkpoint_lag(), 5);
    }

    #[test]
    fn async_close_polls_until_backend_is_dead() {
        let backend = Arc::new(NeverAckingSink::default());
        let sink = TableSink::new(
            ChangefeedId(1),
            SpanId::from("span-a"),
            0,
            SingleRowAppender,
            backend.clone() as Arc<dyn BackendSink<RowChangeEvent>>,
        );
        sink.append(vec![row(1)]);
        sink.update_resolved_ts(ResolvedTs::new(1)).unwrap();

        assert!(!sink.async_close());
        assert_eq!(sink.state(), SinkState::Stopping);

        backend.kill();
        assert!(sink.async_close());
        assert_eq!(sink.state(), SinkState::Stopped);
    }
}

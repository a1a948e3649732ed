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

use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::{CallbackableEvent, Event};

/// The pluggable downstream target (MQ, object store, SQL, ...). Concrete
/// backends live outside this crate; only the contract and a no-op test
/// double ([`BlackholeSink`]) live here.
///
/// Errors are reported as `anyhow::Error`: the concrete backend crate (out
/// of scope here) owns its own error type and just needs an escape hatch,
/// the same role `anyhow` plays for `SinkError::Config` in the teacher's own
/// sink error enum. The facade (`TableSink::update_resolved_ts`) wraps
/// whatever comes back as `Error::SinkInternalError`.
pub trait BackendSink<E: Event>: Send + Sync {
    /// Non-blocking enqueue into the backend's own internal queue. The
    /// batch may be empty, used as a liveness probe. For every event
    /// accepted, the backend must invoke `event.ack()` exactly once unless
    /// it becomes dead first.
    fn write_events(&self, batch: Vec<CallbackableEvent<E>>) -> anyhow::Result<()>;

    /// Terminal liveness flag. Once `true`, must stay `true`.
    fn dead(&self) -> bool;
}

/// A backend that immediately acks everything and never dies. Used for
/// tests and for callers that want a durable no-op sink, mirroring
/// `risingwave_connector`'s `BlackHoleSink` / the `blackhole` URI scheme.
#[derive(Debug, Default)]
pub struct BlackholeSink {
    dead: AtomicBool,
}

impl BlackholeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test/debug hook: flip the liveness flag without going through a real
    /// failure path.
    pub fn kill(&self) {
        self.dead.store(true, Ordering::Release);
    }
}

impl<E: Event> BackendSink<E> for BlackholeSink {
    fn write_events(&self, batch: Vec<CallbackableEvent<E>>) -> anyhow::Result<()> {
        for event in &batch {
            event.ack();
        }
        Ok(())
    }

    fn dead(&self) -> bool {
        self.dead.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressTracker;
    use crate::state::StateCell;
    use crate::RowChangeEvent;
    use std::sync::Arc;

    #[test]
    fn blackhole_acks_everything_immediately() {
        let tracker = ProgressTracker::new();
        let state = Arc::new(StateCell::new());
        let ack = tracker.add_event();
        let event = CallbackableEvent::new(
            RowChangeEvent {
                commit_ts: 1,
                key: vec![],
                value: vec![],
            },
            ack,
            crate::state::StateHandle::new(state),
        );

        let sink = BlackholeSink::new();
        sink.write_events(vec![event]).unwrap();
        assert_eq!(tracker.advance(), Default::default());
        tracker.add_resolved_ts(tablesink_common::ResolvedTs::new(1));
        assert_eq!(
            tracker.advance(),
            tablesink_common::ResolvedTs::new(1)
        );
        assert!(!sink.dead());
    }
}

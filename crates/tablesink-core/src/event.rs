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

use tablesink_common::Ts;

use crate::progress::AckHandle;
use crate::state::StateHandle;

/// A change event with a commit timestamp. The two shipped variants are
/// [`RowChangeEvent`] (a single row mutation) and [`TxnEvent`] (a bundle of
/// rows sharing one `commit_ts`, i.e. a single-table transaction).
pub trait Event: Send + 'static {
    fn commit_ts(&self) -> Ts;
}

/// A single row mutation.
#[derive(Debug, Clone)]
pub struct RowChangeEvent {
    pub commit_ts: Ts,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Event for RowChangeEvent {
    fn commit_ts(&self) -> Ts {
        self.commit_ts
    }
}

/// A bundle of row mutations sharing one `commit_ts`: a single-table
/// transaction.
#[derive(Debug, Clone)]
pub struct TxnEvent {
    pub commit_ts: Ts,
    pub rows: Vec<RowChangeEvent>,
}

impl Event for TxnEvent {
    fn commit_ts(&self) -> Ts {
        self.commit_ts
    }
}

/// An event decorated with the capabilities the backend needs to report
/// durability and to observe (but not mutate) the sink's lifecycle state.
/// The backend must invoke `ack()` exactly once, unless it becomes dead
/// first.
pub struct CallbackableEvent<E> {
    pub event: E,
    ack: AckHandle,
    pub sink_state: StateHandle,
}

impl<E: Event> CallbackableEvent<E> {
    pub(crate) fn new(event: E, ack: AckHandle, sink_state: StateHandle) -> Self {
        Self {
            event,
            ack,
            sink_state,
        }
    }

    pub fn commit_ts(&self) -> Ts {
        self.event.commit_ts()
    }

    /// Marks the event durable. Idempotent: invoking it more than once has
    /// no additional effect (P5).
    pub fn ack(&self) {
        self.ack.ack();
    }
}

/// Strategy for appending newly-arrived events into the buffer's backing
/// store. Generalizes the teacher's generic-`P`-over-`E` sink parameter
/// (see design notes) into a plain trait with two concrete implementations.
pub trait Appender<E: Event>: Send + Sync + 'static {
    fn append(&self, buffer: &mut Vec<E>, events: Vec<E>);
}

/// Appends each event as-is, one by one. Used for [`RowChangeEvent`]
/// streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleRowAppender;

impl Appender<RowChangeEvent> for SingleRowAppender {
    fn append(&self, buffer: &mut Vec<RowChangeEvent>, events: Vec<RowChangeEvent>) {
        buffer.extend(events);
    }
}

/// Appends whole transaction bundles. Used for [`TxnEvent`] streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionAppender;

impl Appender<TxnEvent> for TransactionAppender {
    fn append(&self, buffer: &mut Vec<TxnEvent>, events: Vec<TxnEvent>) {
        buffer.extend(events);
    }
}

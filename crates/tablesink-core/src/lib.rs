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

//! The per-table sink core: event buffering, ack-aware progress tracking,
//! lifecycle state machine, and the public `TableSink` facade that glues
//! them to a pluggable [`backend::BackendSink`].

pub mod backend;
pub mod buffer;
pub mod event;
pub mod progress;
pub mod sink;
pub mod state;

pub use backend::{BackendSink, BlackholeSink};
pub use event::{Appender, CallbackableEvent, Event, RowChangeEvent, SingleRowAppender,
    TransactionAppender, TxnEvent};
pub use progress::{AckHandle, ProgressTracker};
pub use sink::TableSink;
pub use state::SinkState;

pub use tablesink_common::{ChangefeedId, Error, Result, ResolvedTs, ResolvedTsMode, SpanId, Ts};

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

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle state of a `TableSink`. Transitions are monotone: `Sinking ->
/// Stopping -> Stopped`. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Sinking,
    Stopping,
    Stopped,
}

impl SinkState {
    fn tag(self) -> u8 {
        match self {
            SinkState::Sinking => 0,
            SinkState::Stopping => 1,
            SinkState::Stopped => 2,
        }
    }

    fn from_tag(tag: u8) -> Self {
        match tag {
            0 => SinkState::Sinking,
            1 => SinkState::Stopping,
            _ => SinkState::Stopped,
        }
    }
}

/// A shared, atomically-mutated state cell. Handed to the backend as a
/// read-only handle (see [`StateHandle`]) so outstanding callbacks can
/// observe the current lifecycle phase without holding a lock or a mutable
/// reference into the sink — this keeps the ack callback path free of the
/// tracker/backend ownership cycle called out in the design notes.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(SinkState::Sinking.tag()))
    }

    pub fn get(&self) -> SinkState {
        SinkState::from_tag(self.0.load(Ordering::Acquire))
    }

    /// Bumps `Sinking -> Stopping`. No-op (and returns `false`) if the state
    /// has already moved past `Sinking`.
    pub fn freeze(&self) -> bool {
        self.0
            .compare_exchange(
                SinkState::Sinking.tag(),
                SinkState::Stopping.tag(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Bumps `Stopping -> Stopped`. No-op if not currently `Stopping`.
    pub fn mark_stopped(&self) -> bool {
        self.0
            .compare_exchange(
                SinkState::Stopping.tag(),
                SinkState::Stopped.tag(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only capability over a [`StateCell`], passed into the backend
/// alongside each [`crate::CallbackableEvent`] so it can skip redundant work
/// once the sink is no longer `Sinking`, without granting write access.
#[derive(Clone)]
pub struct StateHandle(Arc<StateCell>);

impl StateHandle {
    pub(crate) fn new(cell: Arc<StateCell>) -> Self {
        Self(cell)
    }

    pub fn get(&self) -> SinkState {
        self.0.get()
    }

    pub fn is_sinking(&self) -> bool {
        self.get() == SinkState::Sinking
    }
}

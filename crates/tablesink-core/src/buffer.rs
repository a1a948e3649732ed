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

use tablesink_common::ResolvedTs;

use crate::event::{Appender, Event};

/// Insertion-ordered staging area for events not yet handed to the backend.
/// Touched only by the producer thread (I1: non-decreasing in `commit_ts`).
pub struct EventBuffer<E: Event, A: Appender<E>> {
    items: Vec<E>,
    appender: A,
}

impl<E: Event, A: Appender<E>> EventBuffer<E, A> {
    pub fn new(appender: A) -> Self {
        Self {
            items: Vec::new(),
            appender,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn append(&mut self, events: Vec<E>) {
        self.appender.append(&mut self.items, events);
    }

    /// Returns the prefix of events with `commit_ts <= resolved_ts.ts`,
    /// draining them from the buffer. The smallest such prefix index is
    /// found by binary search over the monotone `commit_ts` field. Retains
    /// the remainder in a freshly allocated backing store so the drained
    /// prefix becomes collectable. Returns an empty `Vec` without
    /// allocating a new backing store if the prefix is empty.
    pub fn drain_up_to(&mut self, resolved_ts: ResolvedTs) -> Vec<E> {
        let idx = self
            .items
            .partition_point(|e| e.commit_ts() <= resolved_ts.ts);
        if idx == 0 {
            return Vec::new();
        }
        let remainder = self.items.split_off(idx);
        std::mem::replace(&mut self.items, remainder)
    }
}

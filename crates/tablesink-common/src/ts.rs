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

use std::cmp::Ordering;

/// A monotonic, unsigned, 64-bit logical clock value.
///
/// Used both as a commit timestamp on events and as the scalar inside a
/// [`ResolvedTs`] watermark.
pub type Ts = u64;

/// Whether a [`ResolvedTs`] represents an ordinary watermark or one produced
/// while replaying a batch of already-committed history (e.g. during a
/// changefeed resync). `BatchResolved` markers of the same `ts` rank below
/// `Normal` markers so that a batch replay can never be mistaken for having
/// caught up to the live stream at the same timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolvedTsMode {
    BatchResolved,
    Normal,
}

/// A resolved-timestamp watermark: no further events with `commit_ts <= ts`
/// will ever arrive. Totally ordered by `(ts, mode, batch_id)`; only
/// non-decreasing values are meaningful to a single consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedTs {
    pub ts: Ts,
    pub mode: ResolvedTsMode,
    pub batch_id: u64,
}

impl ResolvedTs {
    pub fn new(ts: Ts) -> Self {
        Self {
            ts,
            mode: ResolvedTsMode::Normal,
            batch_id: 0,
        }
    }

    pub fn batch(ts: Ts, batch_id: u64) -> Self {
        Self {
            ts,
            mode: ResolvedTsMode::BatchResolved,
            batch_id,
        }
    }
}

impl Default for ResolvedTs {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PartialOrd for ResolvedTs {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResolvedTs {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.ts, self.mode, self.batch_id).cmp(&(other.ts, other.mode, other.batch_id))
    }
}

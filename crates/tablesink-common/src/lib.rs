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

//! Shared types used by `tablesink-core` and `tablesink-config`: the
//! logical-clock timestamp types, span/changefeed identifiers, and the
//! crate-wide error taxonomy.

pub mod error;
pub mod ids;
pub mod ts;

pub use error::{Error, Result};
pub use ids::{ChangefeedId, SpanId};
pub use ts::{ResolvedTs, ResolvedTsMode, Ts};

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

//! Sink configuration model, URI reconciliation (C5), and the CSV /
//! large-message sub-configs (C6).

pub mod config;
pub mod csv;
pub mod dispatch;
pub mod large_message;
pub mod protocol;
pub mod uri;

pub use config::{DateSeparator, SinkConfig, TransactionAtomicity};
pub use csv::{BinaryEncodingMethod, CsvConfig};
pub use dispatch::DispatchRule;
pub use large_message::{ClaimCheckCompression, LargeMessageHandleConfig, LargeMessageHandleOption};
pub use protocol::Protocol;
pub use uri::{SchemeFamily, SinkUri};

pub use tablesink_common::{Error, Result};

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

use std::collections::BTreeMap;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The crate-wide error taxonomy. Every variant carries a stable kind (the
/// variant itself) plus a human-readable message naming the offending
/// field(s).
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid sink URI: {0}")]
    SinkUriInvalid(String),

    #[error("invalid sink config: {0}")]
    SinkInvalidConfig(String),

    #[error(
        "sink URI and sink config disagree on shared parameters: \
         in URI = {in_uri:?}, in config = {in_file:?}"
    )]
    IncompatibleSinkConfig {
        in_uri: BTreeMap<String, String>,
        in_file: BTreeMap<String, String>,
    },

    #[error("invalid replica config: {0}")]
    InvalidReplicaConfig(String),

    #[error("invalid date-separator: {0}")]
    StorageSinkInvalidDateSeparator(String),

    #[error("sink internal error: {0}")]
    SinkInternalError(#[from] anyhow::Error),
}

impl Error {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::SinkInvalidConfig(msg.into())
    }

    pub fn invalid_uri(msg: impl Into<String>) -> Self {
        Error::SinkUriInvalid(msg.into())
    }

    pub fn invalid_replica_config(msg: impl Into<String>) -> Self {
        Error::InvalidReplicaConfig(msg.into())
    }
}

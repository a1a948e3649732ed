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
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tablesink_common::Error;
use tracing::warn;

use crate::csv::CsvConfig;
use crate::dispatch::DispatchRule;
use crate::large_message::LargeMessageHandleConfig;
use crate::protocol::Protocol;
use crate::uri::{SchemeFamily, SinkUri};

const MIN_FILE_INDEX_WIDTH: u32 = 6;
const MAX_FILE_INDEX_WIDTH: u32 = 20;
const DEFAULT_FILE_INDEX_WIDTH: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TransactionAtomicity {
    None,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum DateSeparator {
    None,
    Year,
    Month,
    Day,
}

/// Validated, reconciled sink configuration. Field-level defaults mirror
/// what an unset query parameter / missing config key means; reconciliation
/// against a [`SinkUri`] happens through [`SinkConfig::apply_parameter_by_sink_uri`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SinkConfig {
    #[serde(default)]
    pub transaction_atomicity: Option<TransactionAtomicity>,
    #[serde(default)]
    pub protocol: Option<Protocol>,
    #[serde(default)]
    pub encoder_concurrency: Option<i64>,
    #[serde(default)]
    pub terminator: Option<String>,
    /// Raw wire value (e.g. `"Day"`, `"DAY"`, `"day"`); [`Self::validate`]
    /// parses it case-insensitively into a canonical [`DateSeparator`]
    /// string, or rejects it with [`Error::StorageSinkInvalidDateSeparator`].
    #[serde(default)]
    pub date_separator: Option<String>,
    #[serde(default, alias = "file-index-digit")]
    pub file_index_width: Option<u32>,
    #[serde(default)]
    pub csv: Option<CsvConfig>,
    #[serde(default)]
    pub delete_only_output_handle_key_columns: bool,
    #[serde(default)]
    pub large_message_handle: Option<LargeMessageHandleConfig>,
    #[serde(default)]
    pub enable_tidb_extension: bool,
    #[serde(default)]
    pub dispatchers: Vec<DispatchRule>,
}

impl SinkConfig {
    /// Reconciles `transaction-atomicity` and `protocol` against the URI's
    /// query parameters (URI wins), then runs every cross-field validation
    /// rule. On success, `self` is mutated in place to the reconciled state.
    pub fn apply_parameter_by_sink_uri(&mut self, uri: &SinkUri) -> Result<(), Error> {
        let mut in_uri = BTreeMap::new();
        let mut in_file = BTreeMap::new();

        let winning_atomicity = reconcile_field(
            "transaction-atomicity",
            uri.query_param("transaction-atomicity"),
            self.transaction_atomicity.map(|v| v.to_string()),
            &mut in_uri,
            &mut in_file,
        )?;
        if let Some(raw) = winning_atomicity {
            self.transaction_atomicity = Some(
                TransactionAtomicity::from_str(&raw)
                    .map_err(|_| Error::invalid_config(format!("unknown transaction-atomicity: {raw}")))?,
            );
        }

        let winning_protocol = reconcile_field(
            "protocol",
            uri.query_param("protocol"),
            self.protocol.map(|v| v.to_string()),
            &mut in_uri,
            &mut in_file,
        )?;
        if let Some(raw) = winning_protocol {
            self.protocol = Some(
                Protocol::from_str(&raw)
                    .map_err(|_| Error::invalid_config(format!("unknown protocol: {raw}")))?,
            );
        }

        assert_eq!(
            in_uri.len(),
            in_file.len(),
            "sink config reconciliation diagnostic maps diverged in size: in_uri={in_uri:?} in_file={in_file:?}"
        );

        if !in_uri.is_empty() {
            warn!(
                in_uri = ?in_uri,
                in_file = ?in_file,
                "sink URI and sink config disagree on shared parameters"
            );
            return Err(Error::IncompatibleSinkConfig { in_uri, in_file });
        }

        self.validate(uri)
    }

    /// Checks whether `self` (presumably already reconciled against some
    /// earlier URI) remains compatible with a freshly supplied `uri_str`.
    /// Suppresses an `IncompatibleSinkConfig` that the *old* config would
    /// have produced against the same URI too, since in that case the
    /// change originated in the URI and the config is just catching up.
    pub fn check_compatibility(&self, old: &SinkConfig, uri_str: &str) -> Result<(), Error> {
        let uri = SinkUri::parse(uri_str)?;
        let mut next = self.clone();
        match next.apply_parameter_by_sink_uri(&uri) {
            Ok(()) => Ok(()),
            Err(Error::IncompatibleSinkConfig { in_uri, in_file }) => {
                let mut old = old.clone();
                match old.apply_parameter_by_sink_uri(&uri) {
                    Err(Error::IncompatibleSinkConfig { .. }) => Ok(()),
                    _ => Err(Error::IncompatibleSinkConfig { in_uri, in_file }),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn validate(&mut self, uri: &SinkUri) -> Result<(), Error> {
        if let Some(atomicity) = self.transaction_atomicity {
            if atomicity == TransactionAtomicity::Table
                && uri.scheme_family() == SchemeFamily::Mq
            {
                return Err(Error::invalid_config(
                    "transaction-atomicity=table is not supported on an MQ sink URI",
                ));
            }
        }

        match uri.scheme_family() {
            SchemeFamily::Mq | SchemeFamily::Storage => {
                if self.protocol.is_none() {
                    return Err(Error::invalid_config(
                        "protocol is required for mq and storage sink URIs",
                    ));
                }
            }
            SchemeFamily::MysqlCompatible => {
                if self.protocol.is_some() {
                    return Err(Error::invalid_config(
                        "protocol must not be set for a mysql-compatible sink URI",
                    ));
                }
            }
            SchemeFamily::Blackhole => {}
        }

        if let Some(concurrency) = self.encoder_concurrency {
            if concurrency < 0 {
                return Err(Error::invalid_config(
                    "encoder-concurrency must be >= 0",
                ));
            }
        }

        if self.terminator.is_none() {
            self.terminator = Some("CRLF".to_owned());
        }

        if uri.scheme_family() == SchemeFamily::Storage {
            let canonical = match &self.date_separator {
                None => DateSeparator::None,
                Some(raw) => DateSeparator::from_str(raw).map_err(|_| {
                    Error::StorageSinkInvalidDateSeparator(format!(
                        "expected one of none, year, month, day (case-insensitive), got {raw:?}"
                    ))
                })?,
            };
            self.date_separator = Some(canonical.to_string());
            match self.file_index_width {
                Some(w) if (MIN_FILE_INDEX_WIDTH..=MAX_FILE_INDEX_WIDTH).contains(&w) => {}
                _ => self.file_index_width = Some(DEFAULT_FILE_INDEX_WIDTH),
            }
            if let Some(csv) = &self.csv {
                csv.validate()?;
            }
        }

        if self.delete_only_output_handle_key_columns && self.protocol == Some(Protocol::Csv) {
            return Err(Error::invalid_replica_config(
                "delete-only-output-handle-key-columns=true is incompatible with protocol csv",
            ));
        }

        if let (Some(handle), Some(protocol)) = (&self.large_message_handle, self.protocol) {
            handle.validate(protocol, self.enable_tidb_extension)?;
        }

        let mut reconciled_dispatchers = Vec::with_capacity(self.dispatchers.len());
        for rule in self.dispatchers.drain(..) {
            reconciled_dispatchers.push(rule.reconcile()?);
        }
        self.dispatchers = reconciled_dispatchers;

        Ok(())
    }

    /// The typed date separator, valid to call after a successful
    /// [`Self::apply_parameter_by_sink_uri`] has normalized the raw wire
    /// value. Defaults to [`DateSeparator::None`] if never set.
    pub fn effective_date_separator(&self) -> DateSeparator {
        self.date_separator
            .as_deref()
            .and_then(|raw| DateSeparator::from_str(raw).ok())
            .unwrap_or(DateSeparator::None)
    }
}

/// Compares a URI-supplied value against a config-supplied value for one
/// shared parameter. Returns the winning raw string (URI wins ties and
/// conflicts); records a conflict into the two diagnostic maps when both
/// are non-empty and differ.
fn reconcile_field(
    key: &str,
    in_uri_value: Option<String>,
    in_file_value: Option<String>,
    in_uri: &mut BTreeMap<String, String>,
    in_file: &mut BTreeMap<String, String>,
) -> Result<Option<String>, Error> {
    match (in_uri_value, in_file_value) {
        (Some(u), Some(f)) if !u.is_empty() && !f.is_empty() && u != f => {
            in_uri.insert(key.to_owned(), u.clone());
            in_file.insert(key.to_owned(), f);
            Ok(Some(u))
        }
        (Some(u), _) if !u.is_empty() => Ok(Some(u)),
        (_, Some(f)) if !f.is_empty() => Ok(Some(f)),
        _ => Ok(None),
    }
}

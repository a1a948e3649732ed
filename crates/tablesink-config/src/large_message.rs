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

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tablesink_common::Error;

use crate::protocol::Protocol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LargeMessageHandleOption {
    #[default]
    None,
    ClaimCheck,
    HandleKeyOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ClaimCheckCompression {
    None,
    Snappy,
    Lz4,
}

/// Offloads oversized messages to secondary storage and sends a reference
/// instead (the "claim check" pattern), or drops all but the key columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LargeMessageHandleConfig {
    #[serde(default)]
    pub large_message_handle_option: LargeMessageHandleOption,
    #[serde(default)]
    pub claim_check_storage_uri: Option<String>,
    #[serde(default)]
    pub claim_check_compression: Option<ClaimCheckCompression>,
}

impl LargeMessageHandleConfig {
    /// `enable_tidb_extension` only matters for `canal-json`; pass `false`
    /// for any other protocol.
    pub fn validate(&self, protocol: Protocol, enable_tidb_extension: bool) -> Result<(), Error> {
        use LargeMessageHandleOption::*;

        if self.large_message_handle_option == None {
            return Ok(());
        }

        match protocol {
            Protocol::Open => {}
            Protocol::CanalJson => {
                if !enable_tidb_extension {
                    return Err(Error::invalid_replica_config(
                        "large-message-handle on canal-json requires enable-tidb-extension=true",
                    ));
                }
            }
            other => {
                return Err(Error::invalid_replica_config(format!(
                    "large-message-handle is not supported for protocol {other}"
                )));
            }
        }

        if self.large_message_handle_option == ClaimCheck {
            let uri = self.claim_check_storage_uri.as_deref().unwrap_or("");
            if uri.is_empty() {
                return Err(Error::invalid_replica_config(
                    "claim-check requires a non-empty claim-check-storage-uri",
                ));
            }
            if let Some(compression) = self.claim_check_compression {
                if !matches!(
                    compression,
                    ClaimCheckCompression::Snappy | ClaimCheckCompression::Lz4
                ) {
                    return Err(Error::invalid_replica_config(
                        "claim-check-compression must be snappy or lz4",
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_always_allowed() {
        LargeMessageHandleConfig::default()
            .validate(Protocol::Csv, false)
            .unwrap();
    }

    #[test]
    fn open_allows_any_option() {
        let cfg = LargeMessageHandleConfig {
            large_message_handle_option: LargeMessageHandleOption::HandleKeyOnly,
            ..Default::default()
        };
        cfg.validate(Protocol::Open, false).unwrap();
    }

    #[test]
    fn canal_json_requires_tidb_extension() {
        let cfg = LargeMessageHandleConfig {
            large_message_handle_option: LargeMessageHandleOption::HandleKeyOnly,
            ..Default::default()
        };
        assert!(cfg.validate(Protocol::CanalJson, false).is_err());
        cfg.validate(Protocol::CanalJson, true).unwrap();
    }

    #[test]
    fn other_protocols_reject_non_none() {
        let cfg = LargeMessageHandleConfig {
            large_message_handle_option: LargeMessageHandleOption::HandleKeyOnly,
            ..Default::default()
        };
        assert!(cfg.validate(Protocol::Avro, false).is_err());
    }

    #[test]
    fn claim_check_requires_storage_uri() {
        let cfg = LargeMessageHandleConfig {
            large_message_handle_option: LargeMessageHandleOption::ClaimCheck,
            ..Default::default()
        };
        assert!(cfg.validate(Protocol::Open, false).is_err());

        let cfg = LargeMessageHandleConfig {
            large_message_handle_option: LargeMessageHandleOption::ClaimCheck,
            claim_check_storage_uri: Some("s3://bucket/prefix".to_owned()),
            claim_check_compression: Some(ClaimCheckCompression::Snappy),
        };
        cfg.validate(Protocol::Open, false).unwrap();
    }
}

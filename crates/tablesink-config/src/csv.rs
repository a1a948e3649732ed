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

/// How binary columns are rendered in CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BinaryEncodingMethod {
    Hex,
    Base64,
}

/// Codec-specific validation rules for the `csv` protocol. A pure value
/// validator: no I/O, grounded in the same shape as the teacher's file-sink
/// config structs (plain fields, one `validate` entry point).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CsvConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_quote")]
    pub quote: String,
    #[serde(default)]
    pub null: String,
    #[serde(default)]
    pub include_commit_ts: bool,
    #[serde(default)]
    pub binary_encoding_method: Option<BinaryEncodingMethod>,
}

fn default_delimiter() -> String {
    ",".to_owned()
}

fn default_quote() -> String {
    "\"".to_owned()
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            quote: default_quote(),
            null: String::new(),
            include_commit_ts: false,
            binary_encoding_method: None,
        }
    }
}

impl CsvConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.quote.chars().count() > 1 {
            return Err(Error::invalid_config(format!(
                "csv quote must be at most one character, got {:?}",
                self.quote
            )));
        }
        if self.quote == "\r" || self.quote == "\n" {
            return Err(Error::invalid_config(
                "csv quote must not be a carriage return or newline",
            ));
        }
        if self.delimiter.is_empty() {
            return Err(Error::invalid_config("csv delimiter must not be empty"));
        }
        if self.delimiter.contains('\r') || self.delimiter.contains('\n') {
            return Err(Error::invalid_config(
                "csv delimiter must not contain a carriage return or newline",
            ));
        }
        if !self.quote.is_empty() && self.delimiter.contains(self.quote.as_str()) {
            return Err(Error::invalid_config(
                "csv delimiter must not contain the quote character",
            ));
        }
        Ok(())
    }
}

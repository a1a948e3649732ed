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

/// The wire encoding of the sink's output. Parsed from the `protocol` query
/// parameter / config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    Open,
    Canal,
    CanalJson,
    Avro,
    Maxwell,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_kebab_case() {
        assert_eq!(Protocol::CanalJson.to_string(), "canal-json");
        assert_eq!(Protocol::from_str("canal-json").unwrap(), Protocol::CanalJson);
        assert!(Protocol::from_str("not-a-protocol").is_err());
    }
}

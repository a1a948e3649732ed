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
use tablesink_common::Error;

/// A single row-to-partition dispatch rule. `dispatcher` is the deprecated
/// spelling of `partition`; exactly one of the two may be set on input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchRule {
    pub matcher: Vec<String>,
    #[serde(default)]
    pub partition: Option<String>,
    #[serde(default)]
    pub dispatcher: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl DispatchRule {
    /// Migrates the deprecated `dispatcher` field onto `partition`, or
    /// rejects the rule outright if both were set on the same rule.
    pub fn reconcile(mut self) -> Result<Self, Error> {
        match (self.partition.take(), self.dispatcher.take()) {
            (Some(p), Some(d)) => {
                return Err(Error::invalid_config(format!(
                    "dispatch rule sets both partition = {p:?} and the deprecated \
                     dispatcher = {d:?}; set only one"
                )));
            }
            (Some(p), None) => self.partition = Some(p),
            (None, Some(d)) => self.partition = Some(d),
            (None, None) => {}
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatcher_only_migrates_to_partition() {
        let rule = DispatchRule {
            matcher: vec!["db.tbl".to_owned()],
            dispatcher: Some("index-value".to_owned()),
            ..Default::default()
        }
        .reconcile()
        .unwrap();
        assert_eq!(rule.partition.as_deref(), Some("index-value"));
        assert!(rule.dispatcher.is_none());
    }

    #[test]
    fn partition_only_passes_through() {
        let rule = DispatchRule {
            matcher: vec!["db.tbl".to_owned()],
            partition: Some("table".to_owned()),
            ..Default::default()
        }
        .reconcile()
        .unwrap();
        assert_eq!(rule.partition.as_deref(), Some("table"));
    }

    #[test]
    fn conflicting_partition_and_dispatcher_is_rejected() {
        let rule = DispatchRule {
            matcher: vec!["db.tbl".to_owned()],
            partition: Some("table".to_owned()),
            dispatcher: Some("index-value".to_owned()),
            ..Default::default()
        };
        assert!(rule.reconcile().is_err());
    }

    #[test]
    fn both_set_is_rejected_even_when_equal() {
        let rule = DispatchRule {
            matcher: vec!["db.tbl".to_owned()],
            partition: Some("table".to_owned()),
            dispatcher: Some("table".to_owned()),
            ..Default::default()
        };
        assert!(rule.reconcile().is_err());
    }
}

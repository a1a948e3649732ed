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

use tablesink_common::Error;
use url::Url;

/// The scheme family a sink URI belongs to, used to pick which validation
/// rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeFamily {
    MysqlCompatible,
    Mq,
    Storage,
    /// Testing scheme: any protocol is accepted.
    Blackhole,
}

impl SchemeFamily {
    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "mysql" | "tidb" | "mysql-compatible" => Some(SchemeFamily::MysqlCompatible),
            "kafka" | "kafka+ssl" | "pulsar" | "pulsar+ssl" => Some(SchemeFamily::Mq),
            "s3" | "gcs" | "azblob" | "file" | "webhdfs" => Some(SchemeFamily::Storage),
            "blackhole" => Some(SchemeFamily::Blackhole),
            _ => None,
        }
    }
}

/// A parsed sink URI: scheme selects the family, query parameters carry
/// `transaction-atomicity`, `protocol`, and scheme-specific options.
pub struct SinkUri {
    url: Url,
    scheme_family: SchemeFamily,
}

impl SinkUri {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let url = Url::parse(raw).map_err(|e| Error::invalid_uri(format!("{raw}: {e}")))?;
        let scheme_family = SchemeFamily::from_scheme(url.scheme())
            .ok_or_else(|| Error::invalid_uri(format!("unsupported scheme: {}", url.scheme())))?;
        Ok(Self { url, scheme_family })
    }

    pub fn scheme_family(&self) -> SchemeFamily {
        self.scheme_family
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_schemes() {
        assert_eq!(
            SinkUri::parse("kafka://broker:9092/topic?protocol=open")
                .unwrap()
                .scheme_family(),
            SchemeFamily::Mq
        );
        assert_eq!(
            SinkUri::parse("s3://bucket/path?date-separator=day")
                .unwrap()
                .scheme_family(),
            SchemeFamily::Storage
        );
        assert_eq!(
            SinkUri::parse("mysql://root@host:3306/db")
                .unwrap()
                .scheme_family(),
            SchemeFamily::MysqlCompatible
        );
        assert_eq!(
            SinkUri::parse("blackhole://").unwrap().scheme_family(),
            SchemeFamily::Blackhole
        );
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert!(SinkUri::parse("ftp://host/path").is_err());
    }

    #[test]
    fn reads_query_parameters() {
        let uri = SinkUri::parse("kafka://broker:9092/topic?protocol=canal-json&transaction-atomicity=none")
            .unwrap();
        assert_eq!(uri.query_param("protocol").as_deref(), Some("canal-json"));
        assert_eq!(
            uri.query_param("transaction-atomicity").as_deref(),
            Some("none")
        );
        assert_eq!(uri.query_param("missing"), None);
    }
}

/*
 *
 *  * Copyright (c) 2025 Couchbase, Inc.
 *  *
 *  * Licensed under the Apache License, Version 2.0 (the "License");
 *  * you may not use this file except in compliance with the License.
 *  * You may obtain a copy of the License at
 *  *
 *  *    http://www.apache.org/licenses/LICENSE-2.0
 *  *
 *  * Unless required by applicable law or agreed to in writing, software
 *  * distributed under the License is distributed on an "AS IS" BASIS,
 *  * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  * See the License for the specific language governing permissions and
 *  * limitations under the License.
 *
 */

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One decoded `/query` response body, or one line of a chunked body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<SeriesResult>,
    pub error: Option<String>,
}

/// The outcome of a single statement within a request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SeriesResult {
    pub statement_id: Option<u32>,
    pub series: Option<Vec<Series>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub partial: bool,
    pub error: Option<String>,
}

impl SeriesResult {
    /// The error reported for this statement, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    /// Series of a statement that failed are never exposed, whatever the
    /// server sent alongside the error.
    pub fn series(&self) -> &[Series] {
        if self.error().is_some() {
            return &[];
        }

        self.series.as_deref().unwrap_or_default()
    }

    pub fn into_series(self) -> Vec<Series> {
        if self.error().is_some() {
            return vec![];
        }

        self.series.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<Vec<Value>>,
    #[serde(default)]
    pub partial: bool,
}

impl Series {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.values.get(row)?.get(idx)
    }

    /// Parses the `time` column of a row. Only RFC 3339 timestamps are
    /// understood, epoch-formatted times must be read through [`Series::value`].
    pub fn time(&self, row: usize) -> Option<DateTime<Utc>> {
        let raw = self.value(row, "time")?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub level: String,
    pub text: String,
}

/// Body InfluxDB sends along with a non-success status code.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

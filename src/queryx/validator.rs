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

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::queryx::error;
use crate::queryx::error::Error;
use crate::queryx::query_json::{QueryResponse, Series, SeriesResult};

/// A decoded response document the resolver can validate and flatten.
///
/// Implemented by [`QueryResponse`]; a response shape using different field
/// names only needs its own implementation of this trait to go through the
/// same validation and resolution code.
pub trait Envelope: DeserializeOwned + Send {
    type Result: EnvelopeResult;

    /// The first server-reported warning or error message, envelope level first.
    fn warning(&self) -> Option<&str>;

    fn into_results(self) -> Vec<Self::Result>;
}

pub trait EnvelopeResult: Send {
    type Series: Send;

    fn into_series(self) -> Vec<Self::Series>;
}

impl Envelope for QueryResponse {
    type Result = SeriesResult;

    fn warning(&self) -> Option<&str> {
        if let Some(error) = self.error.as_deref().filter(|e| !e.is_empty()) {
            return Some(error);
        }

        self.results.iter().find_map(|r| r.error())
    }

    fn into_results(self) -> Vec<SeriesResult> {
        self.results
    }
}

impl EnvelopeResult for SeriesResult {
    type Series = Series;

    fn into_series(self) -> Vec<Series> {
        SeriesResult::into_series(self)
    }
}

/// Gates an envelope on the warning escalation policy.
///
/// Envelopes without a warning, and any envelope when `throw_on_warning` is
/// false, are handed back untouched.
pub fn validate<E: Envelope>(envelope: E, throw_on_warning: bool) -> error::Result<E> {
    let warning = match envelope.warning() {
        Some(warning) => warning.to_string(),
        None => return Ok(envelope),
    };

    if throw_on_warning {
        return Err(Error::new_query_warning_error(warning));
    }

    debug!("Query response carried a warning, not escalating: {}", warning);

    Ok(envelope)
}

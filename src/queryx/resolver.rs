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

use std::marker::PhantomData;
use std::sync::Arc;

use futures::StreamExt;
use http::Method;
use tracing::trace;

use crate::httpx::json_line_stream::JsonLineStream;
use crate::httpx::response::Response;
use crate::queryx::error;
use crate::queryx::error::Error;
use crate::queryx::query::RequestClient;
use crate::queryx::query_json::QueryResponse;
use crate::queryx::validator::{validate, Envelope, EnvelopeResult};

pub type SeriesOf<E> = <<E as Envelope>::Result as EnvelopeResult>::Series;

/// Turns query responses into series and per-statement results.
///
/// Every decoded envelope goes through [`validate`] with the resolver's
/// warning policy before anything is extracted from it. Chunked reads fail as
/// a whole: no data is returned from earlier chunks once a later one fails.
#[derive(Debug)]
pub struct SeriesResolver<R: RequestClient, E: Envelope = QueryResponse> {
    request_client: Arc<R>,
    throw_on_warning: bool,
    _envelope: PhantomData<fn() -> E>,
}

impl<R: RequestClient, E: Envelope> SeriesResolver<R, E> {
    pub fn new(request_client: Arc<R>, throw_on_warning: bool) -> Self {
        Self {
            request_client,
            throw_on_warning,
            _envelope: PhantomData,
        }
    }

    pub fn throw_on_warning(&self) -> bool {
        self.throw_on_warning
    }

    pub async fn get_and_validate_query(
        &self,
        database: Option<&str>,
        query: &str,
    ) -> error::Result<E> {
        self.request_and_validate_query(database, query, Method::GET)
            .await
    }

    pub async fn post_and_validate_query(
        &self,
        database: Option<&str>,
        query: &str,
    ) -> error::Result<E> {
        self.request_and_validate_query(database, query, Method::POST)
            .await
    }

    pub async fn request_and_validate_query(
        &self,
        database: Option<&str>,
        query: &str,
        method: Method,
    ) -> error::Result<E> {
        let resp = self.request_client.query(database, query, method).await?;

        validate(read_envelope(resp).await?, self.throw_on_warning)
    }

    pub async fn resolve_single_series(
        &self,
        database: Option<&str>,
        query: &str,
    ) -> error::Result<Vec<SeriesOf<E>>> {
        let envelope = self.get_and_validate_query(database, query).await?;

        Ok(single_result(envelope)?.into_series())
    }

    pub async fn resolve_all_series(
        &self,
        database: Option<&str>,
        query: &str,
    ) -> error::Result<Vec<E::Result>> {
        let envelope = self.get_and_validate_query(database, query).await?;

        Ok(envelope.into_results())
    }

    pub async fn resolve_single_series_chunked(
        &self,
        database: &str,
        query: &str,
        chunk_size: u64,
    ) -> error::Result<Vec<SeriesOf<E>>> {
        let resp = self
            .request_client
            .query_chunked(database, query, chunk_size)
            .await?;

        self.fold_chunks(resp, |series, envelope| {
            series.extend(single_result(envelope)?.into_series());
            Ok(())
        })
        .await
    }

    pub async fn resolve_all_series_chunked(
        &self,
        database: &str,
        query: &str,
        chunk_size: u64,
    ) -> error::Result<Vec<E::Result>> {
        let resp = self
            .request_client
            .query_chunked(database, query, chunk_size)
            .await?;

        self.fold_chunks(resp, |results, envelope| {
            results.extend(envelope.into_results());
            Ok(())
        })
        .await
    }

    async fn fold_chunks<T>(
        &self,
        resp: Response,
        mut f: impl FnMut(&mut Vec<T>, E) -> error::Result<()>,
    ) -> error::Result<Vec<T>> {
        let mut lines = JsonLineStream::new(resp.bytes_stream());
        let mut acc = Vec::new();
        let mut chunk = 0;

        while let Some(line) = lines.next().await {
            let line = line.map_err(|e| Error::new_http_error(e, None::<String>))?;

            trace!("Decoding chunk {} of {} bytes", chunk, line.len());

            let envelope = validate(decode_envelope(&line)?, self.throw_on_warning)?;
            f(&mut acc, envelope)?;
            chunk += 1;
        }

        Ok(acc)
    }
}

async fn read_envelope<E: Envelope>(resp: Response) -> error::Result<E> {
    let body = resp
        .bytes()
        .await
        .map_err(|e| Error::new_http_error(e, None::<String>))?;

    decode_envelope(&body)
}

fn decode_envelope<E: Envelope>(body: &[u8]) -> error::Result<E> {
    serde_json::from_slice(body).map_err(|e| {
        Error::new_decoding_error(format!("failed to parse query response: {}", e))
    })
}

/// A single submitted statement must produce exactly one result.
fn single_result<E: Envelope>(envelope: E) -> error::Result<E::Result> {
    let results = envelope.into_results();
    let count = results.len();

    let [result]: [E::Result; 1] = results.try_into().map_err(|_| {
        Error::new_invalid_response_error(format!(
            "expected exactly one result in query response, got {}",
            count
        ))
    })?;

    Ok(result)
}

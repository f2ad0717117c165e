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

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::httpx::client::Client;
use crate::httpx::request::{Auth, BasicAuth, Request};
use crate::httpx::response::Response;
use crate::queryx::error;
use crate::queryx::error::Error;
use crate::queryx::query_json::ErrorResponse;

/// Dispatches `/query` requests and hands back the raw response.
///
/// Implementations must have turned outright HTTP failures into errors before
/// returning, the body of a returned response is expected to hold query
/// response documents.
#[async_trait]
pub trait RequestClient: Send + Sync {
    async fn query(
        &self,
        database: Option<&str>,
        query: &str,
        method: Method,
    ) -> error::Result<Response>;

    async fn query_chunked(
        &self,
        database: &str,
        query: &str,
        chunk_size: u64,
    ) -> error::Result<Response>;
}

#[derive(Debug)]
pub struct Query<C: Client> {
    pub http_client: Arc<C>,
    pub user_agent: String,
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

impl<C: Client> Query<C> {
    pub fn new_request(
        &self,
        method: Method,
        params: &[(&str, &str)],
        content_type: Option<String>,
        body: Option<Bytes>,
    ) -> error::Result<Request> {
        let base = format!("{}/query", self.endpoint.trim_end_matches('/'));
        let mut uri = Url::parse(&base).map_err(|e| {
            Error::new_invalid_argument_error(e.to_string(), Some("endpoint".to_string()))
        })?;

        if !params.is_empty() {
            uri.query_pairs_mut().extend_pairs(params);
        }

        let auth = if self.username.is_empty() {
            None
        } else {
            Some(Auth::BasicAuth(BasicAuth::new(
                self.username.clone(),
                self.password.clone(),
            )))
        };

        Ok(Request::new(method, uri.as_str())
            .auth(auth)
            .user_agent(self.user_agent.clone())
            .content_type(content_type)
            .body(body))
    }

    pub async fn execute(&self, req: Request) -> error::Result<Response> {
        let resp = self
            .http_client
            .execute(req)
            .await
            .map_err(|e| Error::new_http_error(e, self.endpoint.clone()))?;

        if !resp.status().is_success() {
            return Err(self.decode_error(resp).await);
        }

        Ok(resp)
    }

    async fn decode_error(&self, resp: Response) -> Error {
        let status_code = resp.status();
        let body = match resp.bytes().await {
            Ok(b) => b,
            Err(e) => {
                debug!("Failed to read response body on error {}", e);
                return Error::new_http_error(e, self.endpoint.clone());
            }
        };

        let msg = match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(ErrorResponse { error: Some(msg) }) => msg,
            _ => {
                let text = String::from_utf8_lossy(&body);
                let text = text.trim();
                if text.is_empty() {
                    format!("non-success status code received {}", status_code)
                } else {
                    text.to_string()
                }
            }
        };

        Error::new_server_error(status_code, msg, &self.endpoint)
    }
}

#[async_trait]
impl<C: Client> RequestClient for Query<C> {
    async fn query(
        &self,
        database: Option<&str>,
        query: &str,
        method: Method,
    ) -> error::Result<Response> {
        let mut params = vec![];
        if let Some(database) = database {
            params.push(("db", database));
        }

        let req = if method == Method::POST {
            let body = form_urlencoded::Serializer::new(String::new())
                .append_pair("q", query)
                .finish();

            self.new_request(
                method,
                &params,
                Some("application/x-www-form-urlencoded".to_string()),
                Some(Bytes::from(body)),
            )?
        } else {
            params.push(("q", query));

            self.new_request(method, &params, None, None)?
        };

        self.execute(req).await
    }

    async fn query_chunked(
        &self,
        database: &str,
        query: &str,
        chunk_size: u64,
    ) -> error::Result<Response> {
        if chunk_size == 0 {
            return Err(Error::new_invalid_argument_error(
                "chunk size must be greater than zero",
                Some("chunk_size".to_string()),
            ));
        }

        let chunk_size = chunk_size.to_string();
        let params = [
            ("db", database),
            ("q", query),
            ("chunked", "true"),
            ("chunk_size", chunk_size.as_str()),
        ];

        let req = self.new_request(Method::GET, &params, None, None)?;

        self.execute(req).await
    }
}

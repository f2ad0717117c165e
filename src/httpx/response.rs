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

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http::StatusCode;

use crate::httpx::error;
use crate::httpx::error::Error;

#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl From<reqwest::Response> for Response {
    fn from(value: reqwest::Response) -> Self {
        Self { inner: value }
    }
}

impl<T> From<http::Response<T>> for Response
where
    T: Into<reqwest::Body>,
{
    fn from(value: http::Response<T>) -> Self {
        Self {
            inner: reqwest::Response::from(value),
        }
    }
}

impl Response {
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    pub async fn bytes(self) -> error::Result<Bytes> {
        Ok(self.inner.bytes().await?)
    }

    pub fn bytes_stream(self) -> impl Stream<Item = error::Result<Bytes>> + Send + Unpin + 'static {
        self.inner.bytes_stream().map_err(Error::from)
    }
}

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

use tracing::debug;

use crate::clientoptions::ClientOptions;
use crate::httpx::client::{Client, ReqwestClient};
use crate::queryx::error;
use crate::queryx::error::Error;
use crate::queryx::query::Query;
use crate::queryx::resolver::SeriesResolver;

/// Entry point wiring the HTTP client, the `/query` request client and the
/// series resolver together from a [`ClientOptions`].
#[derive(Debug)]
pub struct InfluxDbClient<C: Client = ReqwestClient> {
    request_client: Arc<Query<C>>,
    resolver: SeriesResolver<Query<C>>,
}

impl InfluxDbClient<ReqwestClient> {
    pub fn new(opts: ClientOptions) -> error::Result<Self> {
        let http_client = ReqwestClient::new(opts.http_client_config.clone())
            .map_err(|e| Error::new_http_error(e, opts.endpoint.clone()))?;

        Ok(Self::with_http_client(opts, Arc::new(http_client)))
    }
}

impl<C: Client> InfluxDbClient<C> {
    pub fn with_http_client(opts: ClientOptions, http_client: Arc<C>) -> Self {
        debug!(
            "Creating InfluxDB client for {}, throw on warning: {}",
            &opts.endpoint, opts.throw_on_warning
        );

        let request_client = Arc::new(Query {
            http_client,
            user_agent: opts.user_agent,
            endpoint: opts.endpoint,
            username: opts.username,
            password: opts.password,
        });

        let resolver = SeriesResolver::new(request_client.clone(), opts.throw_on_warning);

        Self {
            request_client,
            resolver,
        }
    }

    pub fn request_client(&self) -> &Arc<Query<C>> {
        &self.request_client
    }

    pub fn resolver(&self) -> &SeriesResolver<Query<C>> {
        &self.resolver
    }
}

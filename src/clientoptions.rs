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

use crate::httpx::client::ClientConfig;

#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct ClientOptions {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub throw_on_warning: bool,
    pub http_client_config: ClientConfig,
}

impl ClientOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: String::new(),
            password: String::new(),
            user_agent: format!("influxdb-core/{}", env!("CARGO_PKG_VERSION")),
            throw_on_warning: false,
            http_client_config: ClientConfig::default(),
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whether warnings and errors reported inside an otherwise successful
    /// response fail the call.
    pub fn throw_on_warning(mut self, throw_on_warning: bool) -> Self {
        self.throw_on_warning = throw_on_warning;
        self
    }

    pub fn http_client_config(mut self, http_client_config: ClientConfig) -> Self {
        self.http_client_config = http_client_config;
        self
    }
}

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

use crate::httpx;
use http::StatusCode;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    inner: ErrorImpl,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner.kind)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self.inner.kind.as_ref() {
            ErrorKind::Http { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl Error {
    pub(crate) fn new_http_error(
        error: httpx::error::Error,
        endpoint: impl Into<Option<String>>,
    ) -> Self {
        Self {
            inner: ErrorImpl {
                kind: Box::new(ErrorKind::Http {
                    error,
                    endpoint: endpoint.into(),
                }),
            },
        }
    }

    pub(crate) fn new_server_error(
        status_code: StatusCode,
        msg: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            inner: ErrorImpl {
                kind: Box::new(ErrorKind::Server {
                    status_code,
                    msg: msg.into(),
                    endpoint: endpoint.into(),
                }),
            },
        }
    }

    pub(crate) fn new_decoding_error(msg: impl Into<String>) -> Self {
        Self {
            inner: ErrorImpl {
                kind: Box::new(ErrorKind::Decoding { msg: msg.into() }),
            },
        }
    }

    pub(crate) fn new_query_warning_error(msg: impl Into<String>) -> Self {
        Self {
            inner: ErrorImpl {
                kind: Box::new(ErrorKind::QueryWarning { msg: msg.into() }),
            },
        }
    }

    pub(crate) fn new_invalid_response_error(msg: impl Into<String>) -> Self {
        Self {
            inner: ErrorImpl {
                kind: Box::new(ErrorKind::InvalidResponse { msg: msg.into() }),
            },
        }
    }

    pub(crate) fn new_invalid_argument_error(
        msg: impl Into<String>,
        arg: impl Into<Option<String>>,
    ) -> Self {
        Self {
            inner: ErrorImpl {
                kind: Box::new(ErrorKind::InvalidArgument {
                    msg: msg.into(),
                    arg: arg.into(),
                }),
            },
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    pub fn is_http_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Http { .. })
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Server { .. })
    }

    pub fn is_decoding_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Decoding { .. })
    }

    pub fn is_query_warning(&self) -> bool {
        matches!(self.kind(), ErrorKind::QueryWarning { .. })
    }

    pub fn is_invalid_response(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidResponse { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidArgument { .. })
    }
}

#[derive(Debug, Clone)]
struct ErrorImpl {
    kind: Box<ErrorKind>,
}

impl PartialEq for ErrorImpl {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The transport failed before a response could be read.
    #[non_exhaustive]
    Http {
        error: httpx::error::Error,
        endpoint: Option<String>,
    },
    /// InfluxDB answered with a non-success status code.
    #[non_exhaustive]
    Server {
        status_code: StatusCode,
        msg: String,
        endpoint: String,
    },
    /// The body was not a valid query response envelope.
    #[non_exhaustive]
    Decoding { msg: String },
    /// The server reported a warning and the client is configured to escalate it.
    #[non_exhaustive]
    QueryWarning { msg: String },
    /// The response did not have the shape the call requires.
    #[non_exhaustive]
    InvalidResponse { msg: String },
    #[non_exhaustive]
    InvalidArgument { msg: String, arg: Option<String> },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Http { error, endpoint } => {
                write!(f, "http error {error}")?;
                if let Some(endpoint) = endpoint {
                    write!(f, ", endpoint: {endpoint}")?;
                }
                Ok(())
            }
            ErrorKind::Server {
                status_code,
                msg,
                endpoint,
            } => write!(
                f,
                "server error: {msg}, endpoint: {endpoint}, status code: {status_code}"
            ),
            ErrorKind::Decoding { msg } => write!(f, "decoding error: {msg}"),
            ErrorKind::QueryWarning { msg } => write!(f, "query warning: {msg}"),
            ErrorKind::InvalidResponse { msg } => write!(f, "invalid response: {msg}"),
            ErrorKind::InvalidArgument { msg, arg } => {
                let base_msg = format!("invalid argument: {msg}");
                if let Some(arg) = arg {
                    write!(f, "{base_msg}, arg: {arg}")
                } else {
                    write!(f, "{base_msg}")
                }
            }
        }
    }
}

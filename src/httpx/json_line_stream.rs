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

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::{FusedStream, Stream};

use crate::httpx::error::Result as HttpxResult;
use crate::httpx::json_line_parser::JsonLineParser;

type BodyStream = dyn Stream<Item = HttpxResult<Bytes>> + Send;

/// Yields each non-blank line of a newline-delimited response body.
pub struct JsonLineStream {
    state: State,
    parser: JsonLineParser,
    stream: Pin<Box<BodyStream>>,
}

#[derive(Debug, Eq, PartialEq)]
enum State {
    Collecting,
    Done,
}

impl JsonLineStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = HttpxResult<Bytes>> + Send + 'static,
    {
        Self {
            state: State::Collecting,
            parser: JsonLineParser::new(),
            stream: Box::pin(stream),
        }
    }
}

impl FusedStream for JsonLineStream {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl Stream for JsonLineStream {
    type Item = HttpxResult<Vec<u8>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<HttpxResult<Vec<u8>>>> {
        let this = self.get_mut();
        loop {
            match this.state {
                State::Collecting => {
                    if let Some(line) = this.parser.next() {
                        return Poll::Ready(Some(Ok(line)));
                    }

                    match this.stream.as_mut().poll_next(cx) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Some(Ok(chunk))) => {
                            this.parser.push(&chunk[..]);
                            continue;
                        }
                        // The body is finished, flush a final unterminated line.
                        Poll::Ready(None) => {
                            this.state = State::Done;
                            return Poll::Ready(this.parser.finish().map(Ok));
                        }
                        Poll::Ready(Some(Err(e))) => {
                            this.state = State::Done;
                            return Poll::Ready(Some(Err(e)));
                        }
                    }
                }
                State::Done => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::{stream, StreamExt};

    use crate::httpx::error::Error;
    use crate::httpx::json_line_stream::JsonLineStream;

    #[tokio::test]
    async fn yields_lines_across_chunks() {
        let chunks = vec![
            Ok(Bytes::from_static(b"{\"results\":[]}\n{\"res")),
            Ok(Bytes::from_static(b"ults\":[{}]}\n\n")),
            Ok(Bytes::from_static(b"{\"error\":\"x\"}")),
        ];

        let lines: Vec<String> = JsonLineStream::new(stream::iter(chunks))
            .map(|l| String::from_utf8(l.unwrap()).unwrap())
            .collect()
            .await;

        assert_eq!(
            lines,
            vec![
                r#"{"results":[]}"#,
                r#"{"results":[{}]}"#,
                r#"{"error":"x"}"#
            ]
        );
    }

    #[tokio::test]
    async fn stops_after_transport_error() {
        let chunks = vec![
            Ok(Bytes::from_static(b"{\"results\":[]}\n")),
            Err(Error::new_connection_error("reset by peer")),
            Ok(Bytes::from_static(b"{\"results\":[]}\n")),
        ];

        let mut lines = JsonLineStream::new(stream::iter(chunks));

        assert!(lines.next().await.unwrap().is_ok());
        assert!(lines.next().await.unwrap().unwrap_err().is_connection_error());
        assert!(lines.next().await.is_none());
    }
}

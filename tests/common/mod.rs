use std::io::Write;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use http::{Method, StatusCode};
use log::LevelFilter;

use influxdb_core::httpx::client::Client;
use influxdb_core::httpx::error::Result as HttpxResult;
use influxdb_core::httpx::request::{Auth, Request};
use influxdb_core::httpx::response::Response;
use influxdb_core::queryx::error::Result as QueryxResult;
use influxdb_core::queryx::query::RequestClient;

static INIT: Once = Once::new();

pub fn setup_tests() {
    INIT.call_once(|| {
        env_logger::Builder::new()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{}:{} [{}] - {}",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.level(),
                    record.args()
                )
            })
            .filter(None, LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

/// Builds a response whose body arrives as the given network chunks. An `Err`
/// chunk makes the body stream fail at that point.
pub fn response_from_chunks(status: StatusCode, chunks: Vec<Result<String, String>>) -> Response {
    let chunks: Vec<Result<Bytes, std::io::Error>> = chunks
        .into_iter()
        .map(|c| c.map(Bytes::from).map_err(std::io::Error::other))
        .collect();

    let body = reqwest::Body::wrap_stream(stream::iter(chunks));

    Response::from(
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap(),
    )
}

pub fn response_from_body(status: StatusCode, body: impl Into<String>) -> Response {
    Response::from(
        http::Response::builder()
            .status(status)
            .body(body.into())
            .unwrap(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub database: Option<String>,
    pub query: String,
    pub method: Option<Method>,
    pub chunk_size: Option<u64>,
}

/// Request client that answers every call with the same canned body.
#[derive(Debug)]
pub struct MockRequestClient {
    chunks: Vec<Result<String, String>>,
    calls: Mutex<Vec<RecordedQuery>>,
}

impl MockRequestClient {
    pub fn new(body: impl Into<String>) -> Self {
        Self::with_chunks(vec![Ok(body.into())])
    }

    pub fn with_chunks(chunks: Vec<Result<String, String>>) -> Self {
        Self {
            chunks,
            calls: Mutex::new(vec![]),
        }
    }

    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: RecordedQuery) -> Response {
        self.calls.lock().unwrap().push(call);
        response_from_chunks(StatusCode::OK, self.chunks.clone())
    }
}

#[async_trait]
impl RequestClient for MockRequestClient {
    async fn query(
        &self,
        database: Option<&str>,
        query: &str,
        method: Method,
    ) -> QueryxResult<Response> {
        Ok(self.respond(RecordedQuery {
            database: database.map(str::to_string),
            query: query.to_string(),
            method: Some(method),
            chunk_size: None,
        }))
    }

    async fn query_chunked(
        &self,
        database: &str,
        query: &str,
        chunk_size: u64,
    ) -> QueryxResult<Response> {
        Ok(self.respond(RecordedQuery {
            database: Some(database.to_string()),
            query: query.to_string(),
            method: None,
            chunk_size: Some(chunk_size),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: String,
    pub auth: Option<Auth>,
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Bytes>,
}

/// HTTP client that records requests and replies with a fixed status and body.
#[derive(Debug)]
pub struct MockHttpClient {
    status: StatusCode,
    body: String,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            requests: Mutex::new(vec![]),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Client for MockHttpClient {
    async fn execute(&self, req: Request) -> HttpxResult<Response> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: req.method,
            uri: req.uri,
            auth: req.auth,
            user_agent: req.user_agent,
            content_type: req.content_type,
            body: req.body,
        });

        Ok(response_from_body(self.status, self.body.clone()))
    }
}

/// Raw HTTP/1.1 request as seen by [`serve_canned`].
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub fn canned_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Response using chunked transfer encoding, one transfer chunk per piece.
pub fn canned_chunked_response(pieces: &[&str]) -> String {
    let mut resp = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n".to_string();
    for piece in pieces {
        resp.push_str(&format!("{:x}\r\n{}\r\n", piece.len(), piece));
    }
    resp.push_str("0\r\n\r\n");
    resp
}

/// Serves each canned response to one connection, in order, and hands back
/// the requests that were received.
pub async fn serve_canned(
    responses: Vec<String>,
) -> (String, tokio::task::JoinHandle<Vec<RawRequest>>) {
    use tokio::io::AsyncWriteExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = vec![];
        for resp in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);
            stream.write_all(resp.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        requests
    });

    (endpoint, handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> RawRequest {
    use tokio::io::AsyncReadExt;

    let mut buf = Vec::new();
    let mut tmp = [0u8; 4096];

    loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let mut lines = head.split("\r\n");
            let request_line = lines.next().unwrap_or_default().to_string();
            let headers: Vec<(String, String)> = lines
                .filter_map(|l| l.split_once(':'))
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .collect();

            let content_length = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                .map(|(_, v)| v.parse::<usize>().unwrap())
                .unwrap_or(0);

            if buf.len() >= pos + 4 + content_length {
                let body = String::from_utf8_lossy(&buf[pos + 4..pos + 4 + content_length]);
                return RawRequest {
                    request_line,
                    headers,
                    body: body.to_string(),
                };
            }
        }

        let n = stream.read(&mut tmp).await.unwrap();
        assert!(n > 0, "connection closed before the request was complete");
        buf.extend_from_slice(&tmp[..n]);
    }
}

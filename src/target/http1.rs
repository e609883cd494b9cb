//! Minimal HTTP/1.1 wire handling for the practice target.
//!
//! One request is read incrementally (head first, then a Content-Length
//! body), with a 1 MiB cap on both the head and the declared body.
//! Responses are always JSON; the keep-alive flag decides whether the
//! `Connection` header invites the peer to reuse the socket.

use std::collections::HashMap;

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// One decoded request: method and path verbatim, header keys lowercased.
#[derive(Debug)]
pub struct ParsedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ParsedRequest {
    /// HTTP/1.1 default: the connection persists unless the peer asks to close.
    #[must_use]
    pub fn keep_alive(&self) -> bool {
        self.headers
            .get("connection")
            .is_none_or(|value| !value.eq_ignore_ascii_case("close"))
    }
}

/// Why a request could not be parsed, carrying the status to answer with.
#[derive(Debug)]
pub struct HttpRejection {
    pub status: u16,
    pub(crate) message: String,
}

impl HttpRejection {
    fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Reads one HTTP/1.1 request from the stream.
///
/// Returns `Ok(None)` when the peer closed the connection cleanly between
/// requests, which is the normal end of a persistent connection.
///
/// # Errors
/// Returns an [`HttpRejection`] with status 400 for malformed or truncated
/// requests and 413 when the head or the declared body exceeds the 1 MiB cap.
pub async fn parse_http1_request<R>(
    socket: &mut R,
) -> Result<Option<ParsedRequest>, HttpRejection>
where
    R: AsyncRead + Unpin,
{
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0_u8; 1024];
    let header_end;

    loop {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| HttpRejection::new(400, format!("Failed to read request: {}", err)))?;
        if bytes == 0 {
            if buffer.is_empty() {
                return Ok(None);
            }
            return Err(HttpRejection::new(400, "Truncated request"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| HttpRejection::new(400, "Invalid read length"))?;
        buffer.extend_from_slice(read_slice);
        if buffer.len() > MAX_REQUEST_BYTES {
            return Err(HttpRejection::new(413, "Request too large"));
        }
        if let Some(pos) = find_header_end(&buffer) {
            header_end = pos;
            break;
        }
    }

    let header_bytes = buffer
        .get(..header_end)
        .ok_or_else(|| HttpRejection::new(400, "Malformed request headers"))?;
    let header_text = std::str::from_utf8(header_bytes)
        .map_err(|err| HttpRejection::new(400, format!("Invalid request encoding: {}", err)))?;
    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| HttpRejection::new(400, "Missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| HttpRejection::new(400, "Missing HTTP method"))?;
    let path = parts
        .next()
        .ok_or_else(|| HttpRejection::new(400, "Missing request path"))?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(HttpRejection::new(400, "Malformed header"));
        };
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    let content_length = headers
        .get("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_REQUEST_BYTES {
        return Err(HttpRejection::new(413, "Request body too large"));
    }
    let body_start = header_end
        .checked_add(4)
        .ok_or_else(|| HttpRejection::new(400, "Malformed request headers"))?;
    let mut body = buffer.get(body_start..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let bytes = socket
            .read(&mut chunk)
            .await
            .map_err(|err| HttpRejection::new(400, format!("Failed to read body: {}", err)))?;
        if bytes == 0 {
            return Err(HttpRejection::new(400, "Truncated request body"));
        }
        let read_slice = chunk
            .get(..bytes)
            .ok_or_else(|| HttpRejection::new(400, "Invalid read length"))?;
        body.extend_from_slice(read_slice);
    }
    body.truncate(content_length);

    Ok(Some(ParsedRequest {
        method: method.to_owned(),
        path: path.to_owned(),
        headers,
        body,
    }))
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

const fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

pub(super) async fn write_json_response<W, T>(
    socket: &mut W,
    status: u16,
    payload: &T,
    keep_alive: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(payload).map_err(std::io::Error::other)?;
    write_response(socket, status, &body, keep_alive).await
}

pub(super) async fn write_error_response<W>(
    socket: &mut W,
    status: u16,
    message: &str,
    keep_alive: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    #[derive(Serialize)]
    struct ErrorResponse<'msg> {
        error: &'msg str,
    }
    let body =
        serde_json::to_vec(&ErrorResponse { error: message }).map_err(std::io::Error::other)?;
    write_response(socket, status, &body, keep_alive).await
}

async fn write_response<W>(
    socket: &mut W,
    status: u16,
    body: &[u8],
    keep_alive: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let connection = if keep_alive { "keep-alive" } else { "close" };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: {}\r\n\r\n",
        status,
        status_text(status),
        body.len(),
        connection
    );
    socket.write_all(head.as_bytes()).await?;
    socket.write_all(body).await?;
    socket.flush().await
}

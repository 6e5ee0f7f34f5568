//! Parsing of the response head: status line and headers.

use http::header;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::Error;

/// Status line and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    status: u16,
    message: String,
    content_length: u64,
    has_content_length: bool,
    is_chunked: bool,
    headers: HeaderMap,
}

impl ParsedResponse {
    /// The literal status code from the status line.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The status code as [`StatusCode`], if it is in the range `100..=999`.
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status).ok()
    }

    /// Standard reason phrase for the status code, if there is one.
    pub fn canonical_reason(&self) -> Option<&'static str> {
        self.status_code().and_then(|s| s.canonical_reason())
    }

    /// The status message (reason phrase) as sent by the server.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Value of `content-length`, `0` when absent or not a number.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Whether the server sent a `content-length` header.
    pub fn has_content_length(&self) -> bool {
        self.has_content_length
    }

    /// Whether the response is `transfer-encoding: chunked`.
    pub fn is_chunked(&self) -> bool {
        self.is_chunked
    }

    /// Whether the status code is one of the codes registered for HTTP/1.1.
    pub fn is_known_status(&self) -> bool {
        is_known_status(self.status)
    }

    /// All headers. Names are lower case, values trimmed, the last
    /// occurrence of a repeated header wins.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Look up a header as a string.
    ///
    /// Returns `None` if the header is missing or the value is not visible ASCII.
    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Parse the response head.
///
/// `lines` are the lines read from the server without their line endings, up to
/// and including the first blank line.
///
/// An unknown status code is logged, but does not fail the parse.
pub fn parse(lines: &[String]) -> Result<ParsedResponse, Error> {
    let Some(status_line) = lines.first() else {
        return Err(Error::NoResponse);
    };

    if !status_line.starts_with("HTTP/") {
        return Err(Error::NotHttp(status_line.clone()));
    }

    let (code, message) = split_status_line(status_line)
        .ok_or_else(|| Error::MalformedStatusLine(status_line.clone()))?;

    // Codes that do not fit a u16 are rejected along with non-numbers.
    let status: u16 = code
        .parse()
        .map_err(|_| Error::InvalidStatusCode(code.to_string()))?;

    if !is_known_status(status) {
        warn!("Unknown status code: {}", status);
    }

    let mut headers = HeaderMap::new();

    for line in lines[1..].iter().filter(|l| !l.is_empty()) {
        let Some((key, value)) = line.split_once(':') else {
            debug!("Skip header line without colon: {:?}", line);
            continue;
        };

        let key = key.trim().to_ascii_lowercase();

        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_bytes(value.trim().as_bytes()),
        ) else {
            debug!("Skip malformed header line: {:?}", line);
            continue;
        };

        // insert() replaces, which makes the last occurrence win.
        headers.insert(name, value);
    }

    let length_header = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok());

    let has_content_length = length_header.is_some();
    let content_length = length_header.and_then(|v| v.parse().ok()).unwrap_or(0);

    let is_chunked = headers
        .get(header::TRANSFER_ENCODING)
        .map(|v| v.as_bytes().eq_ignore_ascii_case(b"chunked"))
        .unwrap_or(false);

    Ok(ParsedResponse {
        status,
        message: message.to_string(),
        content_length,
        has_content_length,
        is_chunked,
        headers,
    })
}

/// Split `HTTP/1.1 200 OK` into `("200", "OK")`. The message is the remainder
/// of the line and may contain whitespace.
fn split_status_line(line: &str) -> Option<(&str, &str)> {
    let (_version, rest) = line.split_once(char::is_whitespace)?;
    let (code, message) = rest.trim_start().split_once(char::is_whitespace)?;
    let message = message.trim_start();

    if code.is_empty() || message.is_empty() {
        return None;
    }

    Some((code, message))
}

/// Tell whether a status code is registered for HTTP/1.1.
pub fn is_known_status(code: u16) -> bool {
    matches!(
        code,
        100..=103
            | 200..=208
            | 226
            | 300..=308
            | 400..=418
            | 421..=426
            | 428..=429
            | 431
            | 451
            | 500..=508
            | 510..=511
    )
}

use std::time::SystemTime;

use crate::http::request::{Method, RequestLine};
use crate::store::{FileStore, StoreError};

/// HTTP status codes the server can emit.
///
/// The validator only ever produces 200, 400, 404, 501, 503 and 505; the
/// rest are here so the reason-phrase table is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 304 Not Modified
    NotModified,
    /// 400 Bad Request
    BadRequest,
    /// 401 Unauthorized
    Unauthorized,
    /// 404 Not Found
    NotFound,
    /// 501 Not Implemented
    NotImplemented,
    /// 503 Service Unavailable
    ServiceUnavailable,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use turnstile::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::ServiceUnavailable.as_u16(), 503);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::MovedPermanently => 301,
            StatusCode::NotModified => 304,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::NotImplemented => 501,
            StatusCode::ServiceUnavailable => 503,
            StatusCode::HttpVersionNotSupported => 505,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        let status = match code {
            200 => StatusCode::Ok,
            301 => StatusCode::MovedPermanently,
            304 => StatusCode::NotModified,
            400 => StatusCode::BadRequest,
            401 => StatusCode::Unauthorized,
            404 => StatusCode::NotFound,
            501 => StatusCode::NotImplemented,
            503 => StatusCode::ServiceUnavailable,
            505 => StatusCode::HttpVersionNotSupported,
            _ => return None,
        };
        Some(status)
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::ServiceUnavailable => "Service Unavailable",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers are kept in insertion order, which is the order they go out on
/// the wire.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Retrieves the first header value with this name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<html></html>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header, keeping its original position on replace.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Appends a Content-Length matching the body if none was set.
    pub fn build(mut self) -> Response {
        if !self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("Content-Length")) {
            self.headers
                .push(("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

pub fn http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}

/// Builds the response for a request that was given `status`.
///
/// `line` is the parsed request line when there is one; it only matters for
/// a 200, where it picks between serving a resource (GET) and an empty
/// acknowledgement (POST).
pub async fn build_response<S: FileStore>(
    line: Option<&RequestLine>,
    status: StatusCode,
    store: &S,
) -> Response {
    let method = line.and_then(RequestLine::method);

    match (status, method, line) {
        (StatusCode::Ok, Some(Method::GET), Some(line)) => serve_resource(line, store).await,
        _ => empty_response(status),
    }
}

fn empty_response(status: StatusCode) -> Response {
    ResponseBuilder::new(status)
        .header("Date", http_date(SystemTime::now()))
        .header("Content-Length", "0")
        .header("Connection", "keep-alive")
        .build()
}

async fn serve_resource<S: FileStore>(line: &RequestLine, store: &S) -> Response {
    let path = line.resource_path();

    let resource = match store.read(path).await {
        Ok(resource) => Some(resource),
        Err(StoreError::NotFound(_)) => {
            tracing::warn!(path, "Resource missing, serving empty body");
            None
        }
        Err(e) => {
            tracing::error!(path, error = %e, "Failed to read resource, serving empty body");
            None
        }
    };

    let (body, last_modified) = match resource {
        Some(r) => (r.bytes, Some(r.last_modified)),
        None => (Vec::new(), None),
    };

    let mut builder = ResponseBuilder::new(StatusCode::Ok)
        .header("Date", http_date(SystemTime::now()))
        .header("Content-Length", body.len().to_string())
        .header("Content-Type", "text/html")
        .header("Connection", "keep-alive");

    if let Some(modified) = last_modified {
        builder = builder.header("Last-Modified", http_date(modified));
    }

    builder.body(body).build()
}

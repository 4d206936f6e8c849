//! Request validation
//!
//! Turns the raw text of one read cycle into a status code. Rules are
//! checked in a fixed order and the first one that fires decides the
//! outcome, so a client over the admission ceiling always sees 503 rather
//! than a 400/404 about its request.

use crate::http::parser::parse_request;
use crate::http::request::{Method, Request, RequestLine};
use crate::http::response::StatusCode;

/// Targets a GET may ask for.
pub const GET_TARGETS: [&str; 2] = ["/", "/index.html"];

/// The only target accepting POST.
pub const POST_TARGET: &str = "/simpleForm.html";

/// Decides the status code for `raw`.
///
/// `admitted` is the registry's verdict for the connection the request
/// arrived on.
pub fn validate(raw: &str, admitted: bool) -> StatusCode {
    let request = parse_request(raw);
    validate_request(&request, admitted)
}

pub fn validate_request(request: &Request<'_>, admitted: bool) -> StatusCode {
    let first_line = request.first_line();

    if first_line.is_empty() {
        return StatusCode::NotFound;
    }
    if !admitted {
        return StatusCode::ServiceUnavailable;
    }

    let Some(line) = RequestLine::parse(first_line) else {
        return StatusCode::BadRequest;
    };

    match line.method() {
        None => return StatusCode::NotImplemented,
        Some(Method::GET) => {
            if !GET_TARGETS.contains(&line.target.as_str()) {
                return StatusCode::NotFound;
            }
        }
        Some(Method::POST) => {
            if line.target != POST_TARGET {
                return StatusCode::NotFound;
            }
            if request.content_length() != Some(request.body.len()) {
                return StatusCode::BadRequest;
            }
        }
    }

    if let Some(status) = check_version(&line.version) {
        return status;
    }

    if !has_crlf_terminators(&request.lines) {
        return StatusCode::BadRequest;
    }

    StatusCode::Ok
}

/// `version` is the raw third token, which still ends in the line's `\r`.
fn check_version(version: &str) -> Option<StatusCode> {
    let Some((protocol, number)) = version.split_once('/') else {
        return Some(StatusCode::BadRequest);
    };

    if protocol != "HTTP" {
        return Some(StatusCode::BadRequest);
    }
    if number != "1.1\r" {
        return Some(StatusCode::HttpVersionNotSupported);
    }

    None
}

// Every line but the last must have ended in CRLF.
fn has_crlf_terminators(lines: &[&str]) -> bool {
    match lines.split_last() {
        Some((_, rest)) => rest.iter().all(|l| l.ends_with('\r')),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_checks() {
        assert_eq!(check_version("HTTP/1.1\r"), None);
        assert_eq!(check_version("HTTP/1.1"), Some(StatusCode::HttpVersionNotSupported));
        assert_eq!(check_version("HTTP/2.0\r"), Some(StatusCode::HttpVersionNotSupported));
        assert_eq!(check_version("HTTPS/1.1\r"), Some(StatusCode::BadRequest));
        assert_eq!(check_version("\r"), Some(StatusCode::BadRequest));
    }

    #[test]
    fn crlf_terminators() {
        assert!(has_crlf_terminators(&["GET / HTTP/1.1\r", "Host: a\r", "\r"]));
        assert!(has_crlf_terminators(&["body"]));
        assert!(!has_crlf_terminators(&["GET / HTTP/1.1", "\r"]));
    }
}

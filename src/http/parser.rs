use crate::http::request::{Headers, Request};

/// Splits raw request text into lines and picks out headers and body.
///
/// Lines are split on `\n` and keep any trailing `\r`; trailing empty
/// segments are discarded. Never fails: structural problems are left for
/// the validator to report.
pub fn parse_request(raw: &str) -> Request<'_> {
    let lines = split_lines(raw);
    let headers = parse_headers(&lines);
    let body = extract_body(&lines);

    Request { lines, headers, body }
}

pub fn split_lines(raw: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = raw.split('\n').collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn is_blank(line: &str) -> bool {
    line.is_empty() || line == "\r"
}

fn parse_headers(lines: &[&str]) -> Headers {
    let mut headers = Headers::new();

    for &line in lines.iter().skip(1) {
        if is_blank(line) {
            break;
        }

        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some((name, value)) = line.split_once(": ") {
            headers.insert(name, value);
        }
    }

    headers
}

fn extract_body<'a>(lines: &[&'a str]) -> &'a str {
    match lines {
        [_, .., last] if !is_blank(last) && has_terminator(lines) => *last,
        _ => "",
    }
}

// The body can only follow the blank line that ends the header block.
fn has_terminator(lines: &[&str]) -> bool {
    lines[1..lines.len() - 1].iter().any(|l| is_blank(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_request("GET / HTTP/1.1\r\nHost: example.com\r\n\r\n");

        assert_eq!(req.lines, vec!["GET / HTTP/1.1\r", "Host: example.com\r", "\r"]);
        assert_eq!(req.header("Host"), Some("example.com"));
        assert_eq!(req.body, "");
    }

    #[test]
    fn last_header_is_not_a_body() {
        let req = parse_request("POST /simpleForm.html HTTP/1.1\r\nContent-Length: 3\r\n");
        assert_eq!(req.body, "");
    }
}

/// HTTP request methods the server implements.
///
/// Any other method token parses to `None` and is answered with
/// 501 Not Implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Submit form data
    POST,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the method (case-sensitive)
    ///
    /// # Returns
    ///
    /// `Some(Method)` if the string matches an implemented method, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use turnstile::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("PUT"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }
}

/// The first line of a request, split into its three tokens.
///
/// Tokens are kept verbatim; in particular `version` still carries the
/// line's trailing `\r` when the client used CRLF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    pub version: String,
}

impl RequestLine {
    /// Splits `line` on single spaces. Returns `None` unless exactly three
    /// tokens remain once trailing empty tokens are dropped.
    ///
    /// ```
    /// # use turnstile::http::request::RequestLine;
    /// let line = RequestLine::parse("GET /index.html HTTP/1.1\r").unwrap();
    /// assert_eq!(line.version, "HTTP/1.1\r");
    /// assert!(RequestLine::parse("GET /  index.html HTTP/1.1").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let tokens = split_tokens(line);
        match tokens.as_slice() {
            [method, target, version] => Some(Self {
                method: method.to_string(),
                target: target.to_string(),
                version: version.to_string(),
            }),
            _ => None,
        }
    }

    /// Number of space-separated tokens in `line`.
    pub fn token_count(line: &str) -> usize {
        split_tokens(line).len()
    }

    /// The implemented method this line names, if any.
    pub fn method(&self) -> Option<Method> {
        Method::from_str(&self.method)
    }

    /// Path of the resource a GET for this target serves.
    ///
    /// `/` maps to `index.html`; anything else loses its leading slash.
    pub fn resource_path(&self) -> &str {
        if self.target == "/" {
            "index.html"
        } else {
            self.target.strip_prefix('/').unwrap_or(&self.target)
        }
    }
}

fn split_tokens(line: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = line.split(' ').collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Request headers in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Retrieves the first header value with this name (ASCII case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A request broken into lines, with its request line, headers and body
/// picked out.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    /// Every line of the raw text, each still ending in `\r` if it had one.
    pub lines: Vec<&'a str>,
    pub headers: Headers,
    /// The final line, unless that line is the blank header terminator.
    pub body: &'a str,
}

impl<'a> Request<'a> {
    /// The first line verbatim, or `""` for an empty request.
    pub fn first_line(&self) -> &'a str {
        self.lines.first().copied().unwrap_or("")
    }

    pub fn request_line(&self) -> Option<RequestLine> {
        RequestLine::parse(self.first_line())
    }

    /// Retrieves a header value by name.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Declared body length, or `None` if the header is missing or not a
    /// non-negative integer.
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")
            .and_then(|v| v.trim().parse().ok())
    }
}

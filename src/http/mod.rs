//! HTTP protocol implementation.
//!
//! A deliberately narrow HTTP/1.1 subset: GET of the index page and POST of
//! a single form, with every other request answered by a status code.
//!
//! # Architecture
//!
//! - **`connection`**: Owns one accepted stream and runs the read/respond loop
//! - **`parser`**: Splits raw request text into lines, headers and body
//! - **`request`**: Request line, method and header types
//! - **`validator`**: Ordered checks turning a request into a status code
//! - **`response`**: Status codes, response builder and per-status responses
//! - **`writer`**: Serializes and writes HTTP responses to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │    Live     │ ← read → validate → build → write, repeat
//!        └──────┬──────┘
//!               │ end of stream or I/O error
//!               ▼
//!        ┌─────────────┐
//!        │    Dead     │ ← stream shut down, registry updated
//!        └─────────────┘
//! ```
//!
//! # Validation order
//!
//! The first rule that fires decides the status:
//!
//! 1. empty first line → 404
//! 2. connection not admitted → 503
//! 3. request line not three tokens → 400
//! 4. method other than GET/POST → 501
//! 5. GET of anything but `/` or `/index.html` → 404
//! 6. POST to anything but `/simpleForm.html` → 404, wrong Content-Length → 400
//! 7. version not `HTTP/...` → 400, not `HTTP/1.1` → 505
//! 8. a line before the last without CRLF → 400
//! 9. otherwise 200

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod validator;
pub mod writer;

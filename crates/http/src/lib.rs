//! An HTTP message transport core.
//!
//! This crate provides the value model a server or client builds messages
//! from: ordered case-insensitive header bags, weighted `Accept` content
//! negotiation, a capability-described body stream abstraction and the
//! request/response types on top of them, including chunked streaming
//! responses sent over any `std::io::Write` transport.
//!
//! # Features
//!
//! - Ordered header multimap with case-insensitive lookup
//! - `Accept`-style content negotiation with quality weighting
//! - Memory, file, callback and iterator-backed body streams
//! - Immutable-by-convention request and response values
//! - Buffered and chunked (`Transfer-Encoding: chunked`) response sending
//!
//! # Example
//!
//! ```
//! use courier_http::protocol::{HttpMessage, Response};
//!
//! let mut response = Response::text("Hello World!").with_header("X-Request-Id", "42");
//!
//! let mut wire = Vec::new();
//! response.send_to(&mut wire).unwrap();
//!
//! assert!(wire.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! assert!(wire.ends_with(b"Hello World!"));
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`header`]: Header bags and content negotiation
//! - [`stream`]: Body stream abstraction
//! - [`protocol`]: Message, request and response types
//! - [`codec`]: Wire encoding for response bodies
//!
//! # Limitations
//!
//! - The core is single-threaded: stream handles are `Rc`-backed and not
//!   `Send`
//! - Sending targets blocking `std::io::Write` transports

pub mod codec;
pub mod header;
pub mod protocol;
pub mod stream;

mod utils;
pub(crate) use utils::ensure;

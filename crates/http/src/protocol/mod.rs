//! HTTP message value model.
//!
//! This module provides the message types exchanged over a connection and
//! the operations to inspect, derive and send them.
//!
//! # Architecture
//!
//! - **Message core** ([`message`]): the parts shared by every message
//!   - [`Message`]: header bag, body stream, protocol version, length
//!   - [`HttpMessage`]: the read/copy surface implemented by every
//!     message type
//!   - [`Body`]: body content accepted by constructors (stream or text)
//!
//! - **Requests** ([`request`]): server-bound messages
//!   - [`Request`]: method and URI on top of the message core
//!   - [`ServerRequest`]: a request enriched with environment parameters
//!
//! - **Responses** ([`response`], [`streaming`]): client-bound messages
//!   - [`Response`]: status code plus the buffered send pipeline
//!   - [`StreamingResponse`]: lazy chunked bodies sent with chunked framing
//!
//! - **Errors** ([`error`]):
//!   - [`HttpError`]: top-level error type
//!   - [`SendError`]: response sending errors
//!
//! Message types are immutable-by-convention: `with_*` operations return
//! independent copies and leave the receiver untouched, while the `set_*`
//! mutators exist for construction-time assembly.

mod message;
pub use message::Body;
pub use message::HttpMessage;
pub use message::Message;

mod request;
pub use request::Request;
pub use request::ServerRequest;

mod response;
pub use response::Response;

mod streaming;
pub use streaming::StreamingResponse;

mod error;
pub use error::HttpError;
pub use error::SendError;

mod version;
pub use version::DEFAULT_VERSION;

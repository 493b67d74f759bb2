//! Shared core of every HTTP message.
//!
//! Requests and responses compose a [`Message`] instead of inheriting from
//! it: the core carries the header bag, the body stream, the protocol
//! version and the advertised content length, while the capability-specific
//! fields (method/URI, status) live on the wrapping types.

use crate::header::{HeaderBag, HeaderValues};
use crate::protocol::{HttpError, version};
use crate::stream::Stream;

/// The parts common to requests and responses.
///
/// Messages are immutable-by-convention: the `with_*` family returns an
/// independent copy whose header bag is deep-copied, so mutating one copy
/// never affects another. The body stream handle is shared between copies;
/// it behaves like the resource it wraps, not like a value.
#[derive(Debug, Clone)]
pub struct Message {
    headers: HeaderBag,
    body: Stream,
    version: String,
    content_length: Option<u64>,
}

impl Message {
    pub fn new() -> Self {
        Self::from_headers(HeaderBag::empty())
    }

    pub fn from_headers(headers: HeaderBag) -> Self {
        Self {
            headers,
            body: Stream::memory(""),
            version: version::DEFAULT_VERSION.to_string(),
            content_length: None,
        }
    }

    pub fn headers(&self) -> &HeaderBag {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderBag {
        &mut self.headers
    }

    pub fn body(&self) -> &Stream {
        &self.body
    }

    /// Swaps the body stream in place. Construction-time convenience; use
    /// [`Message::with_body`] on published messages.
    pub fn set_body(&mut self, body: Stream) {
        self.body = body;
    }

    pub fn protocol_version(&self) -> &str {
        &self.version
    }

    /// Advertised length of the message in bytes, where known.
    pub fn length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn set_length(&mut self, length: u64) {
        self.content_length = Some(length);
    }

    pub(crate) fn clear_length(&mut self) {
        self.content_length = None;
    }

    /// Returns whether the given header name is present.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.has(name)
    }

    /// All values of the given header joined with commas, or an empty
    /// string if the header is absent.
    pub fn header_line(&self, name: &str) -> String {
        self.headers.get_all(name).join(",")
    }

    /// Copy with the given protocol version, validated against the accepted
    /// HTTP version tokens.
    pub fn with_protocol_version(&self, version: &str) -> Result<Self, HttpError> {
        version::validate(version)?;

        let mut new = self.clone();
        new.version = version.to_string();
        Ok(new)
    }

    /// Copy with the given header replaced by the supplied value(s).
    pub fn with_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        let mut new = self.clone();
        new.headers.remove(name);

        match values.into() {
            HeaderValues::One(value) => new.headers.set(name, &value),
            HeaderValues::Many(values) => {
                for value in values {
                    new.headers.add(name, &value);
                }
            }
        }

        new
    }

    /// Copy with the supplied value(s) appended to the given header.
    pub fn with_added_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        let mut new = self.clone();

        match values.into() {
            HeaderValues::One(value) => new.headers.add(name, &value),
            HeaderValues::Many(values) => {
                for value in values {
                    new.headers.add(name, &value);
                }
            }
        }

        new
    }

    /// Copy with every header from `headers` replacing its counterpart.
    /// Headers not named in `headers` are untouched.
    pub fn with_headers(&self, headers: &HeaderBag) -> Self {
        let mut new = self.clone();

        for (name, values) in headers.all() {
            new.headers.remove(name);

            for value in values {
                new.headers.add(name, value);
            }
        }

        new
    }

    /// Copy without the given header.
    pub fn without_header(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.headers.remove(name);

        new
    }

    /// Copy with the given body stream.
    pub fn with_body(&self, body: Stream) -> Self {
        let mut new = self.clone();
        new.body = body;

        new
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

/// Body content accepted by the message constructors and `set_body`:
/// either an existing stream or raw text to wrap in a memory stream.
#[derive(Debug)]
pub enum Body {
    Stream(Stream),
    Text(String),
}

impl From<Stream> for Body {
    fn from(stream: Stream) -> Self {
        Body::Stream(stream)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

/// Read access and copy-producing operations shared by every message type.
///
/// Implementors supply access to their [`Message`] core plus a way to
/// rebuild themselves around a replaced core; the header and version
/// operations come for free. `with_*` methods return an independent copy
/// (deep-copied header bag, shared body handle); the `*_mut` accessors are
/// the construction-time escape hatch.
pub trait HttpMessage: Sized {
    fn message(&self) -> &Message;

    fn message_mut(&mut self) -> &mut Message;

    /// Rebuilds this value around a replaced message core, carrying the
    /// capability-specific fields over unchanged.
    fn replace_message(&self, message: Message) -> Self;

    fn headers(&self) -> &HeaderBag {
        self.message().headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderBag {
        self.message_mut().headers_mut()
    }

    fn body(&self) -> &Stream {
        self.message().body()
    }

    fn protocol_version(&self) -> &str {
        self.message().protocol_version()
    }

    fn length(&self) -> Option<u64> {
        self.message().length()
    }

    fn set_length(&mut self, length: u64) {
        self.message_mut().set_length(length);
    }

    fn has_header(&self, name: &str) -> bool {
        self.message().has_header(name)
    }

    fn header_line(&self, name: &str) -> String {
        self.message().header_line(name)
    }

    fn with_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        self.replace_message(self.message().with_header(name, values))
    }

    fn with_added_header(&self, name: &str, values: impl Into<HeaderValues>) -> Self {
        self.replace_message(self.message().with_added_header(name, values))
    }

    fn with_headers(&self, headers: &HeaderBag) -> Self {
        self.replace_message(self.message().with_headers(headers))
    }

    fn without_header(&self, name: &str) -> Self {
        self.replace_message(self.message().without_header(name))
    }

    fn with_body(&self, body: Stream) -> Self {
        self.replace_message(self.message().with_body(body))
    }

    fn with_protocol_version(&self, version: &str) -> Result<Self, HttpError> {
        Ok(self.replace_message(self.message().with_protocol_version(version)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_do_not_alias_the_header_bag() {
        let mut message = Message::new();
        message.headers_mut().set("Host", "example.com");

        let copy = message.with_header("Accept", "text/html");
        assert!(copy.has_header("accept"));
        assert!(!message.has_header("accept"));

        message.headers_mut().set("Host", "other.com");
        assert_eq!(copy.headers().get("host"), Some("example.com"));
    }

    #[test]
    fn with_header_round_trip_restores_original_set() {
        let mut message = Message::new();
        message.headers_mut().set("Host", "example.com");
        message.headers_mut().set("Accept", "*/*");

        let touched = message.with_header("X-Extra", "1").without_header("x-extra");

        assert_eq!(touched.headers(), message.headers());
        assert!(message.has_header("host"));
        assert!(message.has_header("accept"));
    }

    #[test]
    fn with_header_replaces_with_one_or_many() {
        let mut message = Message::new();
        message.headers_mut().add("Accept", "text/html");
        message.headers_mut().add("Accept", "text/plain");

        let single = message.with_header("accept", "*/*");
        assert_eq!(single.headers().get_all("accept"), ["*/*"]);

        let many = message.with_header("accept", vec!["a/b", "c/d"]);
        assert_eq!(many.headers().get_all("accept"), ["a/b", "c/d"]);
    }

    #[test]
    fn with_added_header_appends() {
        let mut message = Message::new();
        message.headers_mut().add("Set-Cookie", "a=1");

        let copy = message.with_added_header("set-cookie", "b=2");
        assert_eq!(copy.headers().get_all("set-cookie"), ["a=1", "b=2"]);
        assert_eq!(message.headers().get_all("set-cookie"), ["a=1"]);
    }

    #[test]
    fn with_headers_overwrites_only_named_entries() {
        let mut message = Message::new();
        message.headers_mut().set("Host", "example.com");
        message.headers_mut().set("Accept", "*/*");

        let mut overrides = HeaderBag::empty();
        overrides.add("Accept", "text/html");
        overrides.add("X-Extra", "1");

        let copy = message.with_headers(&overrides);
        assert_eq!(copy.headers().get("accept"), Some("text/html"));
        assert_eq!(copy.headers().get("host"), Some("example.com"));
        assert_eq!(copy.headers().get("x-extra"), Some("1"));
    }

    #[test]
    fn header_line_joins_values() {
        let mut message = Message::new();
        message.headers_mut().add("Accept", "text/html");
        message.headers_mut().add("Accept", "text/plain");

        assert_eq!(message.header_line("accept"), "text/html,text/plain");
        assert_eq!(message.header_line("missing"), "");
    }

    #[test]
    fn protocol_version_validation() {
        let message = Message::new();
        assert_eq!(message.protocol_version(), "1.1");

        let upgraded = message.with_protocol_version("2").unwrap();
        assert_eq!(upgraded.protocol_version(), "2");
        assert_eq!(message.protocol_version(), "1.1");

        assert!(message.with_protocol_version("").is_err());
        assert!(message.with_protocol_version("9.9").is_err());
    }
}

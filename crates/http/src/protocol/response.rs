//! Client-bound HTTP response values.
//!
//! A [`Response`] composes the shared [`Message`] core with a status code
//! and owns the send pipeline that turns the value into wire format:
//! status line, one header line per stored value, blank line, body.
//!
//! The factory helpers ([`Response::json`], [`Response::html`],
//! [`Response::text`], [`Response::redirect`], [`Response::stream`]) cover
//! the bodies applications actually produce; everything else goes through
//! [`Response::set_body`] or the `with_*` family.

use std::io::Write;

use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::header::HeaderBag;
use crate::protocol::message::{Body, HttpMessage, Message};
use crate::protocol::streaming::StreamingResponse;
use crate::protocol::{HttpError, SendError};
use crate::stream::Stream;

/// A client-bound HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    message: Message,
    status: StatusCode,
    headers_sent: bool,
}

impl Response {
    /// Creates a response with the given status and an empty body
    /// (advertised as `Content-Length: 0`).
    pub fn new(status: StatusCode) -> Self {
        let mut response = Self { message: Message::new(), status, headers_sent: false };
        response.set_body("");

        response
    }

    /// Creates a `200 OK` response with the given body.
    pub fn of(body: impl Into<Body>) -> Self {
        let mut response = Self::new(StatusCode::OK);
        response.set_body(body);

        response
    }

    /// Creates a redirect to the given URL (`307 Temporary Redirect`;
    /// chain [`Response::with_status`] for other redirect codes).
    pub fn redirect(url: impl AsRef<str>) -> Self {
        let mut response = Self::new(StatusCode::TEMPORARY_REDIRECT);
        response.headers_mut().set("Location", url.as_ref());

        response
    }

    /// Creates a JSON response from any serializable value.
    ///
    /// A custom `Serialize` implementation on the value takes the place of
    /// bespoke serialization hooks; everything else gets the default
    /// structural encoding.
    pub fn json<T: Serialize + ?Sized>(content: &T) -> Result<Self, HttpError> {
        let encoded = serde_json::to_string(content)?;

        let mut response = Self::new(StatusCode::OK);
        response.set_content_type(mime::APPLICATION_JSON.as_ref()).set_body(encoded);

        Ok(response)
    }

    /// Creates an HTML response.
    pub fn html(content: impl Into<String>) -> Self {
        let mut response = Self::new(StatusCode::OK);
        response.set_content_type(mime::TEXT_HTML.as_ref()).set_body(content.into());

        response
    }

    /// Creates a plain-text response.
    pub fn text(content: impl Into<String>) -> Self {
        let mut response = Self::new(StatusCode::OK);
        response.set_content_type(mime::TEXT_PLAIN.as_ref()).set_body(content.into());

        response
    }

    /// Wraps a lazily-produced chunk sequence into a [`StreamingResponse`].
    pub fn stream<I>(chunks: I, status: StatusCode, headers: HeaderBag) -> StreamingResponse
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: 'static,
    {
        StreamingResponse::new(chunks, status, headers)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Copy with the given status code.
    pub fn with_status(&self, status: StatusCode) -> Self {
        let mut new = self.clone();
        new.status = status;

        new
    }

    /// Whether the status falls in the success range `[200, 300)`.
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    /// Sets the `Content-Type` header in place. Construction-time
    /// convenience, chainable with [`Response::set_body`].
    pub fn set_content_type(&mut self, content_type: &str) -> &mut Self {
        self.message.headers_mut().set("Content-Type", content_type);
        self
    }

    /// Sets the body in place.
    ///
    /// An adopted stream has an unknown length up front, so any
    /// `Content-Length` header is removed; raw text is wrapped in a memory
    /// stream and `Content-Length` is set to its exact byte count.
    pub fn set_body(&mut self, body: impl Into<Body>) -> &mut Self {
        match body.into() {
            Body::Stream(stream) => {
                self.message.set_body(stream);
                self.message.clear_length();
                self.message.headers_mut().remove("content-length");
            }
            Body::Text(text) => {
                let length = text.len() as u64;

                self.message.set_body(Stream::memory(text.as_str()));
                self.message.headers_mut().set("Content-Length", &length.to_string());
                self.message.set_length(length);
            }
        }

        self
    }

    /// Sends the response to the given transport.
    ///
    /// Terminal, single-use: the status line and headers are written at
    /// most once (a guard skips them if some earlier path already flushed
    /// them), then the body is drained if it is readable.
    pub fn send_to<W: Write>(&mut self, transport: &mut W) -> Result<(), SendError> {
        self.send_head(transport)?;
        self.send_content(transport)?;
        transport.flush()?;

        Ok(())
    }

    /// Writes the status line and header lines, exactly once per response.
    pub(crate) fn send_head<W: Write>(&mut self, transport: &mut W) -> Result<(), SendError> {
        if self.headers_sent {
            return Ok(());
        }

        debug!(status = %self.status, "sending response head");

        write!(
            transport,
            "HTTP/{} {} {}\r\n",
            self.message.protocol_version(),
            self.status.as_str(),
            self.status.canonical_reason().unwrap_or("")
        )?;

        // duplicate header names produce one line per stored value
        for (name, values) in self.message.headers().all() {
            for value in values {
                write!(transport, "{name}: {value}\r\n")?;
            }
        }

        transport.write_all(b"\r\n")?;
        self.headers_sent = true;

        Ok(())
    }

    fn send_content<W: Write>(&mut self, transport: &mut W) -> Result<(), SendError> {
        if !self.message.body().is_readable() {
            return Ok(());
        }

        transport.write_all(&self.message.body().to_bytes())?;
        Ok(())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl HttpMessage for Response {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    fn replace_message(&self, message: Message) -> Self {
        Self { message, status: self.status, headers_sent: self.headers_sent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_sets_content_type_and_structural_encoding() {
        let response = Response::json(&serde_json::json!({"a": 1})).unwrap();

        assert_eq!(response.headers().get("content-type"), Some("application/json"));
        assert_eq!(response.headers().get("content-length"), Some("7"));
        assert_eq!(response.body().to_bytes(), Bytes::from(r#"{"a":1}"#));
    }

    #[test]
    fn html_and_text_set_matching_content_types() {
        let html = Response::html("<p>hi</p>");
        assert_eq!(html.headers().get("content-type"), Some("text/html"));
        assert_eq!(html.body().to_bytes(), Bytes::from("<p>hi</p>"));

        let text = Response::text("hi");
        assert_eq!(text.headers().get("content-type"), Some("text/plain"));
        assert_eq!(text.headers().get("content-length"), Some("2"));
    }

    #[test]
    fn redirect_sets_location_and_status() {
        let response = Response::redirect("https://example.com/next");

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers().get("location"), Some("https://example.com/next"));

        let permanent = response.with_status(StatusCode::MOVED_PERMANENTLY);
        assert_eq!(permanent.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[test]
    fn success_range_classification() {
        assert!(Response::new(StatusCode::OK).is_successful());
        assert!(Response::new(StatusCode::from_u16(299).unwrap()).is_successful());
        assert!(!Response::new(StatusCode::MULTIPLE_CHOICES).is_successful());
        assert!(!Response::new(StatusCode::NOT_FOUND).is_successful());
    }

    #[test]
    fn adopting_a_stream_removes_content_length() {
        let mut response = Response::text("known length");
        assert!(response.has_header("content-length"));

        response.set_body(Stream::iterable(vec![Bytes::from("chunk")]));
        assert!(!response.has_header("content-length"));
        assert_eq!(response.length(), None);
    }

    #[test]
    fn text_body_sets_exact_byte_count() {
        let mut response = Response::new(StatusCode::OK);
        response.set_body("héllo");

        assert_eq!(response.headers().get("content-length"), Some("6"));
        assert_eq!(response.length(), Some(6));
    }

    #[test]
    fn send_writes_status_line_headers_and_body() {
        let mut response = Response::text("hi");

        let mut wire = Vec::new();
        response.send_to(&mut wire).unwrap();

        assert_eq!(
            wire,
            b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nContent-Type: text/plain\r\n\r\nhi"
        );
    }

    #[test]
    fn duplicate_headers_produce_multiple_lines() {
        let mut response =
            Response::new(StatusCode::OK).with_added_header("Set-Cookie", "a=1").with_added_header("Set-Cookie", "b=2");

        let mut wire = Vec::new();
        response.send_to(&mut wire).unwrap();

        let text = String::from_utf8(wire).unwrap();
        assert!(text.contains("Set-Cookie: a=1\r\n"));
        assert!(text.contains("Set-Cookie: b=2\r\n"));
    }

    #[test]
    fn head_is_sent_at_most_once() {
        let mut response = Response::text("body");

        let mut wire = Vec::new();
        response.send_to(&mut wire).unwrap();
        response.send_to(&mut wire).unwrap();

        let text = String::from_utf8(wire).unwrap();
        assert_eq!(text.matches("HTTP/1.1 200 OK").count(), 1);
        assert_eq!(text.matches("body").count(), 2);
    }

    #[test]
    fn unreadable_body_is_skipped() {
        let mut response = Response::new(StatusCode::OK);
        response.set_body(Stream::callback(|| "never sent".to_string()));

        let mut wire = Vec::new();
        response.send_to(&mut wire).unwrap();

        let text = String::from_utf8(wire).unwrap();
        assert!(text.ends_with("\r\n\r\n"));
        assert!(!text.contains("never sent"));
    }
}

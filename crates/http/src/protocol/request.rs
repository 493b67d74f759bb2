//! Server-bound HTTP request values.
//!
//! A [`Request`] composes the shared [`Message`] core with the
//! request-specific method and URI. [`ServerRequest`] adds the opaque
//! server parameters an environment-ingestion collaborator captured when
//! it built the request.

use std::collections::HashMap;

use http::uri::PathAndQuery;
use http::{Method, Uri};
use serde_json::Value;

use crate::protocol::message::{Body, HttpMessage, Message};
use crate::protocol::HttpError;
use crate::stream::Stream;

/// A server-bound HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    message: Message,
    method: Method,
    uri: Uri,
}

impl Request {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self { message: Message::new(), method, uri }
    }

    /// The body content of the request.
    pub fn content(&self) -> &Stream {
        self.message.body()
    }

    /// Sets the body content in place. Raw text is wrapped in a memory
    /// stream; no content-length bookkeeping happens here.
    pub fn set_content(&mut self, body: impl Into<Body>) {
        let stream = match body.into() {
            Body::Stream(stream) => stream,
            Body::Text(text) => Stream::memory(text.as_str()),
        };

        self.message.set_body(stream);
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Replaces the method in place. Construction-time convenience.
    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub fn with_method(&self, method: Method) -> Self {
        let mut new = self.clone();
        new.method = method;

        new
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Replaces the URI in place. Construction-time convenience.
    pub fn set_uri(&mut self, uri: Uri) {
        self.uri = uri;
    }

    /// Copy with the given URI. Unless `preserve_host` is set and a `Host`
    /// header already exists, the `Host` header is refreshed from the new
    /// URI's authority (when it has one).
    pub fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        let mut new = self.clone();
        new.uri = uri;

        if preserve_host && self.has_header("Host") {
            return new;
        }

        let Some(host) = new.uri.host() else {
            return new;
        };

        let host = match new.uri.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        new.headers_mut().set("Host", &host);
        new
    }

    pub fn scheme(&self) -> Option<&str> {
        self.uri.scheme_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.uri.host()
    }

    pub fn port(&self) -> Option<u16> {
        self.uri.port_u16()
    }

    /// The URI path, defaulting to `/` when empty.
    pub fn path(&self) -> &str {
        let path = self.uri.path();
        if path.is_empty() { "/" } else { path }
    }

    /// The raw query string, empty if absent.
    pub fn query(&self) -> &str {
        self.uri.query().unwrap_or_default()
    }

    /// The decoded query parameters as a multimap. Repeated names collect
    /// their values in order of appearance.
    pub fn query_params(&self) -> HashMap<String, Vec<String>> {
        let mut params: HashMap<String, Vec<String>> = HashMap::new();

        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(self.query()).unwrap_or_default();
        for (name, value) in pairs {
            params.entry(name).or_default().push(value);
        }

        params
    }

    /// Replaces the URI's query string with the encoded parameters, in
    /// place. Multi-valued names are passed as repeated pairs.
    pub fn set_query_params<I, K, V>(&mut self, params: I) -> Result<(), HttpError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> =
            params.into_iter().map(|(name, value)| (name.into(), value.into())).collect();

        let query = serde_urlencoded::to_string(&pairs).map_err(HttpError::invalid_uri)?;

        self.uri = replace_path_and_query(&self.uri, self.uri.path(), &query)?;
        Ok(())
    }

    /// Copy with the URI's query string replaced by the encoded parameters.
    pub fn with_query_params<I, K, V>(&self, params: I) -> Result<Self, HttpError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut new = self.clone();
        new.set_query_params(params)?;

        Ok(new)
    }

    /// The request target used on the wire (origin form).
    pub fn request_target(&self) -> &str {
        self.path()
    }

    /// Copy with the request target (path and optional query) replaced.
    pub fn with_request_target(&self, target: &str) -> Result<Self, HttpError> {
        let path_and_query: PathAndQuery = target.parse().map_err(HttpError::invalid_uri)?;

        let mut parts = self.uri.clone().into_parts();
        parts.path_and_query = Some(path_and_query);

        let mut new = self.clone();
        new.uri = Uri::from_parts(parts).map_err(HttpError::invalid_uri)?;

        Ok(new)
    }
}

impl HttpMessage for Request {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    fn replace_message(&self, message: Message) -> Self {
        Self { message, method: self.method.clone(), uri: self.uri.clone() }
    }
}

fn replace_path_and_query(uri: &Uri, path: &str, query: &str) -> Result<Uri, HttpError> {
    let target = if query.is_empty() { path.to_string() } else { format!("{path}?{query}") };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(target.parse::<PathAndQuery>().map_err(HttpError::invalid_uri)?);

    Uri::from_parts(parts).map_err(HttpError::invalid_uri)
}

/// A server-bound request enriched with the parameters of the serving
/// environment (opaque, collaborator-owned).
#[derive(Debug, Clone)]
pub struct ServerRequest {
    request: Request,
    server_params: HashMap<String, Value>,
}

impl ServerRequest {
    pub fn new(method: Method, uri: Uri, server_params: HashMap<String, Value>) -> Self {
        Self::from_request(Request::new(method, uri), server_params)
    }

    pub fn from_request(request: Request, server_params: HashMap<String, Value>) -> Self {
        Self { request, server_params }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn server_params(&self) -> &HashMap<String, Value> {
        &self.server_params
    }

    pub fn server_param(&self, name: &str) -> Option<&Value> {
        self.server_params.get(name)
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn path(&self) -> &str {
        self.request.path()
    }

    pub fn query_params(&self) -> HashMap<String, Vec<String>> {
        self.request.query_params()
    }

    pub fn with_query_params<I, K, V>(&self, params: I) -> Result<Self, HttpError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(Self { request: self.request.with_query_params(params)?, server_params: self.server_params.clone() })
    }
}

impl HttpMessage for ServerRequest {
    fn message(&self) -> &Message {
        self.request.message()
    }

    fn message_mut(&mut self) -> &mut Message {
        self.request.message_mut()
    }

    fn replace_message(&self, message: Message) -> Self {
        Self { request: self.request.replace_message(message), server_params: self.server_params.clone() }
    }
}

//! HTTP header handling.
//!
//! This module provides [`HeaderBag`], an ordered multimap from header name to
//! a list of values. Lookups are case-insensitive and tolerant of incidental
//! whitespace, while serialization preserves the name casing a header was
//! first stored under.
//!
//! Content negotiation for weighted `Accept`-style headers lives in the
//! [`accept`] submodule.

use std::fmt::Write;

mod accept;
pub use accept::AcceptBag;
pub use accept::AcceptHeaderItem;

/// One or many values for a single header name.
///
/// Used by [`HeaderBag::parse_array`] and the `with_header` family of message
/// operations, which accept either a single value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

impl HeaderValues {
    fn into_vec(self) -> Vec<String> {
        match self {
            HeaderValues::One(value) => vec![value],
            HeaderValues::Many(values) => values,
        }
    }
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        HeaderValues::One(value.to_string())
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        HeaderValues::One(value)
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        HeaderValues::Many(values)
    }
}

impl From<Vec<&str>> for HeaderValues {
    fn from(values: Vec<&str>) -> Self {
        HeaderValues::Many(values.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    /// Name as first supplied (trimmed), preserved for serialization.
    name: String,
    values: Vec<String>,
}

/// An ordered, case-insensitive multimap of header name to values.
///
/// Entries keep their insertion order, and values within one name keep the
/// order they were added in. Every write and every lookup key is normalized
/// (trimmed, names compared ASCII case-insensitively), so `content-type`,
/// `Content-Type` and ` CONTENT-TYPE ` all address the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: Vec<HeaderEntry>,
}

impl HeaderBag {
    /// Creates an empty header bag.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses raw header lines (e.g. `Host: localhost`) into a bag.
    ///
    /// Each line is split on the first `:` only, so values containing colons
    /// survive intact. Lines without a colon are skipped.
    pub fn parse<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut bag = Self::empty();

        for line in lines {
            if let Some((name, value)) = line.as_ref().split_once(':') {
                bag.add(name, value);
            }
        }

        bag
    }

    /// Parses pairs of header name and value(s) into a bag.
    ///
    /// Each name maps to either a single value or a list of values.
    pub fn parse_array<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<HeaderValues>,
    {
        let mut bag = Self::empty();

        for (name, values) in headers {
            for value in values.into().into_vec() {
                bag.add(name.as_ref(), &value);
            }
        }

        bag
    }

    /// Adds a header with the given name and value.
    /// If the header already exists, the value is appended.
    pub fn add(&mut self, name: &str, value: &str) {
        let value = value.trim().to_string();

        match self.entry_mut(name) {
            Some(entry) => entry.values.push(value),
            None => self.entries.push(HeaderEntry { name: name.trim().to_string(), values: vec![value] }),
        }
    }

    /// Sets a header to exactly one value, replacing any existing values.
    pub fn set(&mut self, name: &str, value: &str) {
        let value = value.trim().to_string();

        match self.entry_mut(name) {
            Some(entry) => entry.values = vec![value],
            None => self.entries.push(HeaderEntry { name: name.trim().to_string(), values: vec![value] }),
        }
    }

    /// Sets a header to the given value unless the name is already present,
    /// in which case this is a no-op.
    pub fn set_if_absent(&mut self, name: &str, value: &str) {
        if self.entry(name).is_none() {
            self.set(name, value);
        }
    }

    /// Removes all values stored under the given name.
    pub fn remove(&mut self, name: &str) {
        let name = name.trim();
        self.entries.retain(|entry| !entry.name.eq_ignore_ascii_case(name));
    }

    /// Gets the first value stored under the given name, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Gets all values stored under the given name, in insertion order.
    /// Returns an empty slice if the name is absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entry(name).map_or(&[], |entry| &entry.values)
    }

    /// Returns whether the bag contains the given header name.
    pub fn has(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Returns whether the first value of the given header equals `value`,
    /// compared case-insensitively after trimming.
    pub fn has_value(&self, name: &str, value: &str) -> bool {
        self.get(name).is_some_and(|stored| stored.eq_ignore_ascii_case(value.trim()))
    }

    /// Iterates over all `(name, values)` entries in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// Number of distinct header names in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes all headers into `Name: value` lines joined by CRLF,
    /// one line per stored value including duplicates.
    pub fn serialize(&self) -> String {
        let mut out = String::new();

        for entry in &self.entries {
            for value in &entry.values {
                if !out.is_empty() {
                    out.push_str("\r\n");
                }
                // writing into a String cannot fail
                let _ = write!(out, "{}: {}", entry.name, value);
            }
        }

        out
    }

    /// Parses the `Accept` header into an [`AcceptBag`], if present.
    pub fn accept(&self) -> Option<AcceptBag> {
        self.get("accept").map(AcceptBag::parse)
    }

    /// Gets the `Accept-Encoding` header value, if present.
    pub fn accept_encoding(&self) -> Option<&str> {
        self.get("accept-encoding")
    }

    /// Gets the `Connection` header value, if present.
    pub fn connection(&self) -> Option<&str> {
        self.get("connection")
    }

    /// Gets the `Content-Encoding` header value, if present.
    pub fn content_encoding(&self) -> Option<&str> {
        self.get("content-encoding")
    }

    /// Gets the `Content-Length` header parsed as an integer, if present
    /// and well-formed.
    pub fn content_length(&self) -> Option<u64> {
        self.get("content-length").and_then(|value| value.parse().ok())
    }

    /// Gets the `Content-Type` header value, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.get("content-type")
    }

    /// Gets the `Transfer-Encoding` header value, if present.
    pub fn transfer_encoding(&self) -> Option<&str> {
        self.get("transfer-encoding")
    }

    /// Gets the `User-Agent` header value, if present.
    pub fn user_agent(&self) -> Option<&str> {
        self.get("user-agent")
    }

    fn entry(&self, name: &str) -> Option<&HeaderEntry> {
        let name = name.trim();
        self.entries.iter().find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut HeaderEntry> {
        let name = name.trim();
        self.entries.iter_mut().find(|entry| entry.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_insensitive() {
        let mut bag = HeaderBag::empty();
        bag.add("Content-Type", "text/html");

        assert_eq!(bag.get("content-type"), Some("text/html"));
        assert_eq!(bag.get("CONTENT-TYPE"), Some("text/html"));
        assert!(bag.has("Content-type"));

        bag.set("CONTENT-TYPE", "application/json");
        assert_eq!(bag.get_all("content-type"), ["application/json"]);

        bag.remove(" content-TYPE ");
        assert!(!bag.has("Content-Type"));
    }

    #[test]
    fn add_appends_in_order() {
        let mut bag = HeaderBag::empty();
        bag.add("Set-Cookie", "a=1");
        bag.add("set-cookie", "b=2");
        bag.add("SET-COOKIE", "c=3");

        assert_eq!(bag.get("set-cookie"), Some("a=1"));
        assert_eq!(bag.get_all("set-cookie"), ["a=1", "b=2", "c=3"]);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn set_replaces_all_values() {
        let mut bag = HeaderBag::empty();
        bag.add("Accept", "text/html");
        bag.add("Accept", "text/plain");

        bag.set("accept", "*/*");
        assert_eq!(bag.get_all("Accept"), ["*/*"]);
    }

    #[test]
    fn set_if_absent_keeps_existing_value() {
        let mut bag = HeaderBag::empty();
        bag.set("Host", "example.com");

        bag.set_if_absent("host", "other.com");
        assert_eq!(bag.get("Host"), Some("example.com"));

        bag.set_if_absent("Connection", "close");
        assert_eq!(bag.get("connection"), Some("close"));
    }

    #[test]
    fn names_and_values_are_trimmed() {
        let mut bag = HeaderBag::empty();
        bag.add("  Host ", "  localhost  ");

        assert_eq!(bag.get("Host"), Some("localhost"));
        assert!(bag.has_value("host", " LOCALHOST "));
        assert!(!bag.has_value("host", "remotehost"));
    }

    #[test]
    fn parse_splits_on_first_colon_only() {
        let bag = HeaderBag::parse(["Host: 127.0.0.1:8080", "X-Started-At: 12:30:00", "garbage line"]);

        assert_eq!(bag.get("host"), Some("127.0.0.1:8080"));
        assert_eq!(bag.get("x-started-at"), Some("12:30:00"));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn parse_handles_a_raw_header_block() {
        let raw = indoc::indoc! {"
            Host: localhost:8080
            Accept: text/html, application/json
            Accept: text/plain
            User-Agent: curl/8.0
        "};

        let bag = HeaderBag::parse(raw.lines());

        assert_eq!(bag.get("host"), Some("localhost:8080"));
        assert_eq!(bag.get_all("accept"), ["text/html, application/json", "text/plain"]);
        assert_eq!(bag.user_agent(), Some("curl/8.0"));
        assert_eq!(bag.len(), 3);
    }

    #[test]
    fn parse_array_accepts_single_and_many() {
        let bag = HeaderBag::parse_array([
            ("Content-Type", HeaderValues::from("text/html")),
            ("Set-Cookie", HeaderValues::from(vec!["a=1", "b=2"])),
        ]);

        assert_eq!(bag.get("content-type"), Some("text/html"));
        assert_eq!(bag.get_all("set-cookie"), ["a=1", "b=2"]);
    }

    #[test]
    fn absent_names_yield_empty_results() {
        let bag = HeaderBag::empty();

        assert_eq!(bag.get("host"), None);
        assert!(bag.get_all("host").is_empty());
        assert!(!bag.has("host"));
        assert!(!bag.has_value("host", "anything"));
    }

    #[test]
    fn serialize_emits_one_line_per_value_with_original_casing() {
        let mut bag = HeaderBag::empty();
        bag.add("Content-Type", "text/html");
        bag.add("Set-Cookie", "a=1");
        bag.add("set-cookie", "b=2");

        assert_eq!(bag.serialize(), "Content-Type: text/html\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2");
    }

    #[test]
    fn typed_accessors() {
        let mut bag = HeaderBag::empty();
        bag.set("Content-Length", "42");
        bag.set("Content-Type", "text/plain");
        bag.set("Transfer-Encoding", "chunked");
        bag.set("Accept", "text/html;q=0.8, application/json");

        assert_eq!(bag.content_length(), Some(42));
        assert_eq!(bag.content_type(), Some("text/plain"));
        assert_eq!(bag.transfer_encoding(), Some("chunked"));

        let accept = bag.accept().unwrap();
        assert_eq!(accept.first().unwrap().format(), "application/json");

        bag.set("Content-Length", "not a number");
        assert_eq!(bag.content_length(), None);
    }
}

//! Content negotiation for weighted `Accept`-style headers.
//!
//! An `Accept` header value is a comma-separated preference list such as
//! `text/html;q=0.8, application/json, text/*;q=0.9`. Each entry names a
//! format, an optional quality weight (`q`, defaulting to `1.0`) and
//! arbitrary extra attributes. [`AcceptBag`] parses such a value and answers
//! best-match lookups, degrading `type/subtype` to `type/*`, `*/*` and
//! finally a bare `*`.

use std::cmp::Ordering;

/// A single parsed entry of an `Accept`-style header.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptHeaderItem {
    format: String,
    quality: f64,
    attributes: Vec<(String, String)>,
    index: usize,
}

impl AcceptHeaderItem {
    /// Parses one header entry (e.g. `text/plain;q=0.8;level=1`).
    ///
    /// The first `;`-separated segment is the format; every following
    /// `key=value` segment either sets the quality (reserved key `q`) or is
    /// stored as a generic attribute in order of appearance. An unparsable
    /// quality value degrades to `0.0`, a segment without `=` stores an
    /// empty attribute value.
    pub fn parse(item: &str) -> Self {
        let mut segments = item.split(';');
        let format = segments.next().unwrap_or_default().trim().to_string();

        let mut quality = 1.0;
        let mut attributes = Vec::new();

        for segment in segments {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            let (key, value) = (key.trim(), value.trim());

            if key == "q" {
                quality = value.parse().unwrap_or(0.0);
            } else {
                attributes.push((key.to_string(), value.to_string()));
            }
        }

        Self { format, quality, attributes, index: 0 }
    }

    /// The negotiated format, e.g. `text/html` or `*/*`.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The preference weight of this entry, `1.0` unless given.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Zero-based position of this entry in the original header value.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Looks up a generic attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Iterates over the generic attributes in order of appearance.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// A parsed `Accept`-style header, ordered by preference.
///
/// Items are sorted by descending quality; equal qualities keep their
/// original left-to-right order (the sort is stable and ties break on the
/// original index).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AcceptBag {
    items: Vec<AcceptHeaderItem>,
}

impl AcceptBag {
    /// Parses a full header value (e.g. `text/html;q=1.0, text/plain;q=0.8`).
    ///
    /// Entries are indexed by their position in the list; a format repeated
    /// later in the list replaces the earlier occurrence.
    pub fn parse(value: &str) -> Self {
        let mut items: Vec<AcceptHeaderItem> = Vec::new();

        for (index, segment) in value.split(',').enumerate() {
            let mut item = AcceptHeaderItem::parse(segment.trim());
            item.index = index;

            match items.iter_mut().find(|existing| existing.format == item.format) {
                Some(existing) => *existing = item,
                None => items.push(item),
            }
        }

        items.sort_by(|a, b| {
            b.quality.partial_cmp(&a.quality).unwrap_or(Ordering::Equal).then(a.index.cmp(&b.index))
        });

        Self { items }
    }

    /// All items, highest preference first.
    pub fn all(&self) -> &[AcceptHeaderItem] {
        &self.items
    }

    /// The highest-preference item, or `None` if the bag is empty.
    pub fn first(&self) -> Option<&AcceptHeaderItem> {
        self.items.first()
    }

    /// Resolves the best match for the given format.
    ///
    /// Degrades through `type/subtype`, `type/*`, `*/*` and a bare `*`
    /// before giving up.
    pub fn get(&self, value: &str) -> Option<&AcceptHeaderItem> {
        if let Some(item) = self.find(value) {
            return Some(item);
        }

        let group = value.split('/').next().unwrap_or(value);

        self.find(&format!("{group}/*")).or_else(|| self.find("*/*")).or_else(|| self.find("*"))
    }

    /// Returns whether the bag contains an exact entry for the given format.
    pub fn has(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn find(&self, format: &str) -> Option<&AcceptHeaderItem> {
        self.items.iter().find(|item| item.format == format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_quality_wins() {
        let bag = AcceptBag::parse("text/html;q=0.8, application/json, text/*;q=0.9");

        assert_eq!(bag.first().unwrap().format(), "application/json");

        let order: Vec<&str> = bag.all().iter().map(AcceptHeaderItem::format).collect();
        assert_eq!(order, ["application/json", "text/*", "text/html"]);
    }

    #[test]
    fn equal_qualities_keep_original_order() {
        let bag = AcceptBag::parse("text/html, application/xml, application/json");

        let order: Vec<&str> = bag.all().iter().map(AcceptHeaderItem::format).collect();
        assert_eq!(order, ["text/html", "application/xml", "application/json"]);
    }

    #[test]
    fn lookup_degrades_to_wildcards() {
        let bag = AcceptBag::parse("text/*;q=0.9, */*;q=0.1");

        assert_eq!(bag.get("text/plain").unwrap().format(), "text/*");
        assert_eq!(bag.get("application/json").unwrap().format(), "*/*");

        let bare = AcceptBag::parse("*;q=0.5");
        assert_eq!(bare.get("image/png").unwrap().format(), "*");

        let empty = AcceptBag::parse("");
        assert!(empty.get("image/png").is_none());
    }

    #[test]
    fn exact_match_beats_wildcard() {
        let bag = AcceptBag::parse("*/*;q=1.0, text/plain;q=0.5");

        assert_eq!(bag.get("text/plain").unwrap().format(), "text/plain");
        assert_eq!(bag.get("text/html").unwrap().format(), "*/*");
    }

    #[test]
    fn attributes_and_quality_parsing() {
        let item = AcceptHeaderItem::parse("application/signed-exchange;v=b3;q=0.9");

        assert_eq!(item.format(), "application/signed-exchange");
        assert_eq!(item.quality(), 0.9);
        assert_eq!(item.attribute("v"), Some("b3"));
        assert_eq!(item.attribute("missing"), None);

        let plain = AcceptHeaderItem::parse("text/plain");
        assert_eq!(plain.quality(), 1.0);
        assert_eq!(plain.attributes().count(), 0);
    }

    #[test]
    fn unparsable_quality_degrades_to_zero() {
        let bag = AcceptBag::parse("text/html;q=banana, text/plain;q=0.1");

        assert_eq!(bag.first().unwrap().format(), "text/plain");
        assert_eq!(bag.get("text/html").unwrap().quality(), 0.0);
    }

    #[test]
    fn repeated_format_takes_last_occurrence() {
        let bag = AcceptBag::parse("text/html;q=0.2, application/json;q=0.5, text/html;q=0.9");

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get("text/html").unwrap().quality(), 0.9);
        assert_eq!(bag.first().unwrap().format(), "text/html");
    }

    #[test]
    fn first_of_empty_bag_is_none() {
        assert!(AcceptBag::default().first().is_none());
        assert!(AcceptBag::default().is_empty());
    }
}

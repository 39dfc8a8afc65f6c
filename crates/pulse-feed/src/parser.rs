//! Tolerant RSS/Atom entry extraction.
//!
//! One streaming pass handles both RSS `<item>` and Atom `<entry>` blocks.
//! Feeds are not schema-validated upstream, so nothing here assumes
//! well-formed XML: a reader error ends the scan and whatever entries were
//! completed so far are returned. A document that matches no expected
//! pattern yields zero entries, never an error.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use pulse_core::FeedSource;

use crate::types::RawFeedEntry;

/// Field buffers for the entry block currently being scanned.
#[derive(Default)]
struct EntryBuf {
    title: String,
    link_text: String,
    link_attr: String,
    pub_date: String,
    published: String,
    updated: String,
    description: String,
    content: String,
}

impl EntryBuf {
    fn clear(&mut self) {
        *self = EntryBuf::default();
    }

    /// Route a text or CDATA node into the right buffer.
    ///
    /// Description and content accumulate across text nodes so markup
    /// nested inside them does not truncate the captured body.
    fn route_text(&mut self, current_tag: &str, in_description: bool, in_content: bool, text: &str) {
        if in_description {
            if !self.description.is_empty() {
                self.description.push(' ');
            }
            self.description.push_str(text);
            return;
        }
        if in_content {
            if !self.content.is_empty() {
                self.content.push(' ');
            }
            self.content.push_str(text);
            return;
        }
        match current_tag {
            "title" => self.title = text.to_string(),
            "link" => self.link_text = text.to_string(),
            "pubDate" => self.pub_date = text.to_string(),
            "published" => self.published = text.to_string(),
            "updated" => self.updated = text.to_string(),
            _ => {}
        }
    }

    /// Assemble a `RawFeedEntry` if the block carried a title and a link.
    fn finalize(&self, source: &FeedSource) -> Option<RawFeedEntry> {
        let link = if self.link_attr.is_empty() {
            self.link_text.trim().to_string()
        } else {
            self.link_attr.clone()
        };
        if self.title.trim().is_empty() || link.is_empty() {
            return None;
        }
        let date = [&self.pub_date, &self.published, &self.updated]
            .into_iter()
            .find(|d| !d.trim().is_empty())
            .map(|d| d.trim().to_string())
            .unwrap_or_default();
        let body = if self.description.trim().is_empty() {
            self.content.trim().to_string()
        } else {
            self.description.trim().to_string()
        };
        Some(RawFeedEntry {
            title: self.title.trim().to_string(),
            url: link,
            published_at: date,
            description: body,
            source_name: source.name.clone(),
            category: source.category.clone(),
        })
    }
}

/// Parse one feed document into raw entries.
///
/// Per entry: title (text or CDATA), link (attribute `href` preferred over
/// element text), date from `pubDate`, then `published`, then `updated`,
/// and description from `description`/`summary`, falling back to
/// `content:encoded`/`content`. Entries missing a non-empty title or link
/// are dropped silently.
#[must_use]
pub fn parse_feed(xml: &str, source: &FeedSource) -> Vec<RawFeedEntry> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = EntryBuf::default();

    let mut in_entry = false;
    let mut in_description = false;
    let mut in_content = false;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                match name.as_str() {
                    "item" | "entry" => {
                        in_entry = true;
                        in_description = false;
                        in_content = false;
                        buf.clear();
                    }
                    "description" | "summary" if in_entry => {
                        in_description = true;
                    }
                    "content:encoded" | "content" if in_entry => {
                        in_content = true;
                    }
                    "link" if in_entry => {
                        if buf.link_attr.is_empty() {
                            if let Some(href) = link_from_attributes(&e) {
                                buf.link_attr = href;
                            }
                        }
                    }
                    _ => {}
                }
                current_tag = name;
            }
            Ok(Event::Empty(e)) => {
                // Atom-style self-closing link: <link href="…" rel="alternate"/>
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "link" && in_entry && buf.link_attr.is_empty() {
                    if let Some(href) = link_from_attributes(&e) {
                        buf.link_attr = href;
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                match name {
                    "description" | "summary" => in_description = false,
                    "content:encoded" | "content" => in_content = false,
                    "item" | "entry" if in_entry => {
                        in_entry = false;
                        if let Some(entry) = buf.finalize(source) {
                            entries.push(entry);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    buf.route_text(&current_tag, in_description, in_content, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    buf.route_text(&current_tag, in_description, in_content, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(
                    source = %source.name,
                    error = %e,
                    "feed document ended malformed; keeping entries parsed so far"
                );
                break;
            }
            _ => {}
        }
    }

    entries
}

/// Extract a usable `href` from a `<link>` element's attributes.
///
/// Accepts the link when `rel` is absent or `alternate`; enclosure and
/// self links are skipped.
fn link_from_attributes(e: &BytesStart<'_>) -> Option<String> {
    let mut href: Option<String> = None;
    let mut rel: Option<String> = None;
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
        match key {
            "href" => href = attr.unescape_value().ok().map(|v| v.trim().to_string()),
            "rel" => rel = attr.unescape_value().ok().map(|v| v.to_string()),
            _ => {}
        }
    }
    match rel.as_deref() {
        None | Some("alternate") => href.filter(|h| !h.is_empty()),
        Some(_) => None,
    }
}

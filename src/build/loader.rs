//! Host page loading and embedded payload extraction.

use markup5ever_rcdom::RcDom;

use super::dom;

/// Id of the element carrying the raw markdown inside a host page.
pub const PAYLOAD_ELEMENT_ID: &str = "md-data";

/// A document as handed to the page pipeline: raw text plus a logical title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    /// Raw markdown. `None` when the host page carries no payload element.
    pub payload: Option<String>,
}

/// Reads the markdown payload out of a parsed host page.
pub struct ContentLoader;

impl ContentLoader {
    /// Parse a host page into a DOM.
    pub fn parse(host_html: &str) -> RcDom {
        dom::parse(host_html)
    }

    /// Extract the logical document from a parsed host page.
    pub fn load(host: &RcDom) -> Document {
        Document {
            title: Self::title(host),
            payload: Self::payload(host),
        }
    }

    /// Raw payload text, JSON-string decoded when possible.
    pub fn payload(host: &RcDom) -> Option<String> {
        let element = dom::find_by_id(&host.document, PAYLOAD_ELEMENT_ID)?;
        Some(decode_payload(&dom::text_content(&element)))
    }

    fn title(host: &RcDom) -> String {
        dom::first_by_tag(&host.document, "h1")
            .or_else(|| dom::first_by_tag(&host.document, "title"))
            .map(|node| dom::text_content(&node).trim().to_string())
            .unwrap_or_default()
    }
}

/// Decode an embedded payload.
///
/// Generated host pages store the markdown as a JSON string literal so it
/// can sit inside a `<script>` element. Hand-written pages may put plain
/// text there instead, which is used verbatim.
pub fn decode_payload(raw: &str) -> String {
    match serde_json::from_str::<String>(raw.trim()) {
        Ok(decoded) => decoded,
        Err(_) => raw.to_string(),
    }
}

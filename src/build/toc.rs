//! Table of contents derived from the final content DOM.

use markup5ever_rcdom::Handle;
use serde::Serialize;

use super::dom;

/// Heading tags that appear in the outline.
pub const OUTLINE_TAGS: [&str; 2] = ["h2", "h3"];

/// Outline level rendered without indentation.
pub const TOP_LEVEL: u8 = 2;

/// Id of the list element the outline is rendered into.
pub const TOC_LIST_ID: &str = "toc-list";

/// A table of contents entry for the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// The heading level (2 or 3)
    pub level: u8,
    /// The heading id (for anchor links)
    pub anchor_id: String,
    /// The heading text
    pub label: String,
}

impl OutlineEntry {
    /// Indentation steps relative to the top level.
    pub fn depth(&self) -> u8 {
        self.level.saturating_sub(TOP_LEVEL)
    }

    pub fn is_top(&self) -> bool {
        self.level == TOP_LEVEL
    }
}

/// Position-based anchor id. Never derived from heading text, so two
/// headings with the same label still get distinct targets.
pub fn anchor_id(index: usize) -> String {
    format!("heading-{index}")
}

pub struct TocBuilder;

impl TocBuilder {
    /// Assign an anchor id to every outline heading under `container` and
    /// return the outline in document order.
    pub fn build(container: &Handle) -> Vec<OutlineEntry> {
        dom::select_tags(container, &OUTLINE_TAGS)
            .iter()
            .enumerate()
            .filter_map(|(index, heading)| {
                let level = dom::tag_name(heading)?.get(1..)?.parse::<u8>().ok()?;
                let id = anchor_id(index);
                dom::set_attr(heading, "id", &id);
                Some(OutlineEntry {
                    level,
                    anchor_id: id,
                    label: dom::text_content(heading).trim().to_string(),
                })
            })
            .collect()
    }

    /// Replace the contents of `list` with one `li > a` per entry.
    pub fn render_list(list: &Handle, entries: &[OutlineEntry]) {
        dom::clear_children(list);

        for entry in entries {
            let mut class = format!("toc-item toc-depth-{}", entry.depth());
            if entry.is_top() {
                class.push_str(" toc-top");
            }
            let href = format!("#{}", entry.anchor_id);
            let level = entry.level.to_string();

            let item = dom::element("li", &[("class", class.as_str())]);
            let link = dom::element(
                "a",
                &[("href", href.as_str()), ("data-level", level.as_str())],
            );
            dom::append(&link, &dom::text(&entry.label));
            dom::append(&item, &link);
            dom::append(list, &item);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::build::accordion::AccordionTransformer;

    const PAGE: &str = "<nav><ul id=\"toc-list\"><li>stale</li></ul></nav>\
        <article id=\"content\">\
        <h2>Intent</h2><p>x</p>\
        <h3>Example</h3><p>y</p>\
        <h2>Common Interview Questions</h2>\
        <h3>Q1: Why?</h3><p>Because.</p>\
        <h3>Q2: When?</h3><p>Now.</p>\
        <h2>Example</h2>\
        </article>";

    fn content(dom: &markup5ever_rcdom::RcDom) -> Handle {
        dom::find_by_id(&dom.document, "content").unwrap()
    }

    #[test]
    fn test_outline_skips_absorbed_questions() {
        let dom = dom::parse(PAGE);
        let container = content(&dom);
        AccordionTransformer::default().transform(&container);

        let entries = TocBuilder::build(&container);
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Intent", "Example", "Common Interview Questions", "Example"]
        );
        let levels: Vec<u8> = entries.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![2, 3, 2, 2]);
    }

    #[test]
    fn test_anchor_ids_unique_and_stable() {
        let dom = dom::parse(PAGE);
        let container = content(&dom);
        AccordionTransformer::default().transform(&container);

        let first = TocBuilder::build(&container);
        let second = TocBuilder::build(&container);
        assert_eq!(first, second);

        let ids: HashSet<&str> = first.iter().map(|e| e.anchor_id.as_str()).collect();
        assert_eq!(ids.len(), first.len());

        let headings = dom::select_tags(&container, &OUTLINE_TAGS);
        for (heading, entry) in headings.iter().zip(&first) {
            assert_eq!(dom::attr(heading, "id").as_deref(), Some(entry.anchor_id.as_str()));
        }
    }

    #[test]
    fn test_render_list_replaces_contents() {
        let dom = dom::parse(PAGE);
        let container = content(&dom);
        let list = dom::find_by_id(&dom.document, TOC_LIST_ID).unwrap();

        let entries = TocBuilder::build(&container);
        TocBuilder::render_list(&list, &entries);
        TocBuilder::render_list(&list, &entries);

        let html = dom::inner_html(&list);
        assert!(!html.contains("stale"));
        assert!(html.starts_with(
            "<li class=\"toc-item toc-depth-0 toc-top\"><a href=\"#heading-0\" data-level=\"2\">Intent</a></li>"
        ));
        assert!(html.contains(
            "<li class=\"toc-item toc-depth-1\"><a href=\"#heading-1\" data-level=\"3\">Example</a></li>"
        ));
        assert_eq!(dom::select_tags(&list, &["li"]).len(), entries.len());
    }

    #[test]
    fn test_empty_container() {
        let dom = dom::parse("<article id=\"content\"><p>No headings</p></article>");
        assert!(TocBuilder::build(&content(&dom)).is_empty());
    }
}

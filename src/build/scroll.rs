//! Outline highlighting that follows the scroll position.
//!
//! The page runtime measures heading positions and feeds them through the
//! same rule implemented here; `bind` writes the data attributes it reads.

use markup5ever_rcdom::Handle;

use super::dom;
use super::toc::OutlineEntry;

const ACTIVE_CLASS: &str = "toc-active";

#[derive(Debug, Clone)]
pub struct ScrollSync {
    anchors: Vec<String>,
    threshold: f64,
    active: Option<usize>,
}

impl ScrollSync {
    pub fn new(entries: &[OutlineEntry], threshold: f64) -> Self {
        Self {
            anchors: entries.iter().map(|e| e.anchor_id.clone()).collect(),
            threshold,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.map(|index| self.anchors[index].as_str())
    }

    /// Annotate the rendered outline list for the page runtime and mark the
    /// current active entry.
    pub fn bind(&self, list: &Handle) {
        dom::set_attr(list, "data-scroll-threshold", &self.threshold.to_string());

        let active = self.active();
        for link in dom::select_tags(list, &["a"]) {
            let Some(target) = dom::attr(&link, "href")
                .and_then(|href| href.strip_prefix('#').map(str::to_string))
            else {
                continue;
            };

            let mut classes: Vec<String> = dom::attr(&link, "class")
                .unwrap_or_default()
                .split_whitespace()
                .filter(|c| *c != ACTIVE_CLASS)
                .map(str::to_string)
                .collect();
            if active == Some(target.as_str()) {
                classes.push(ACTIVE_CLASS.to_string());
                dom::set_attr(&link, "aria-current", "location");
            } else {
                dom::remove_attr(&link, "aria-current");
            }

            if classes.is_empty() {
                dom::remove_attr(&link, "class");
            } else {
                dom::set_attr(&link, "class", &classes.join(" "));
            }
            dom::set_attr(&link, "data-scroll-target", &target);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::interaction::{ScrollBehavior, active_index};
    use super::*;
    use crate::build::toc::{TOC_LIST_ID, TocBuilder};

    const DEFAULT_THRESHOLD: f64 = 100.0;

    fn entries(n: usize) -> Vec<OutlineEntry> {
        (0..n)
            .map(|i| OutlineEntry {
                level: 2,
                anchor_id: format!("heading-{i}"),
                label: format!("Heading {i}"),
            })
            .collect()
    }

    #[test]
    fn test_active_index_prefers_last_crossed() {
        assert_eq!(active_index(&[-400.0, -20.0, 80.0, 600.0], 100.0), Some(2));
        assert_eq!(active_index(&[150.0, 600.0], 100.0), None);
        assert_eq!(active_index(&[100.0], 100.0), Some(0));
        assert_eq!(active_index(&[], 100.0), None);
    }

    #[test]
    fn test_scroll_updates_single_active_entry() {
        let mut sync = ScrollSync::new(&entries(3), DEFAULT_THRESHOLD);
        assert_eq!(sync.active(), None);

        assert_eq!(sync.on_scroll(&[10.0, 300.0, 900.0]), Some("heading-0"));
        assert_eq!(sync.on_scroll(&[-500.0, 40.0, 90.0]), Some("heading-2"));
        assert_eq!(sync.on_scroll(&[200.0, 500.0, 900.0]), None);
    }

    #[test]
    fn test_select_marks_entry_and_scrolls_smoothly() {
        let mut sync = ScrollSync::new(&entries(3), DEFAULT_THRESHOLD);
        let target = sync.select("heading-1").unwrap();
        assert_eq!(target.anchor_id, "heading-1");
        assert_eq!(target.behavior, ScrollBehavior::Smooth);
        assert_eq!(sync.active(), Some("heading-1"));

        assert!(sync.select("missing").is_none());
        assert_eq!(sync.active(), Some("heading-1"));
    }

    #[test]
    fn test_extra_offsets_are_ignored() {
        let mut sync = ScrollSync::new(&entries(1), DEFAULT_THRESHOLD);
        assert_eq!(sync.on_scroll(&[0.0, 0.0, 0.0]), Some("heading-0"));
    }

    #[test]
    fn test_bind_annotates_links() {
        let dom = dom::parse(
            "<ul id=\"toc-list\"></ul><article id=\"content\"><h2>A</h2><h2>B</h2></article>",
        );
        let container = dom::find_by_id(&dom.document, "content").unwrap();
        let list = dom::find_by_id(&dom.document, TOC_LIST_ID).unwrap();
        let outline = TocBuilder::build(&container);
        TocBuilder::render_list(&list, &outline);

        let mut sync = ScrollSync::new(&outline, 120.0);
        sync.select("heading-1");
        sync.bind(&list);

        assert_eq!(dom::attr(&list, "data-scroll-threshold").as_deref(), Some("120"));
        let links = dom::select_tags(&list, &["a"]);
        assert_eq!(dom::attr(&links[0], "data-scroll-target").as_deref(), Some("heading-0"));
        assert!(!dom::has_class(&links[0], "toc-active"));
        assert!(dom::has_class(&links[1], "toc-active"));
        assert_eq!(dom::attr(&links[1], "aria-current").as_deref(), Some("location"));
    }
}

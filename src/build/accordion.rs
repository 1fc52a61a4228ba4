//! Q&A accordion transformation.
//!
//! Headings shaped like `Q1: ...` and the content that follows them are
//! folded into collapsible `<details>` widgets. The transformation runs in
//! three passes over the container:
//!
//! 1. collect: snapshot every question (title, cloned body, original nodes)
//!    without touching the tree;
//! 2. build + insert: create the widget section from the snapshots and place
//!    it after the marker heading (or at the end of the container);
//! 3. remove: detach exactly the original headings and body nodes recorded
//!    in pass 1.

use std::sync::LazyLock;

use markup5ever_rcdom::Handle;
use regex::Regex;

use super::dom;

/// Heading level that carries questions.
pub const QUESTION_TAG: &str = "h3";

/// Headings that end a question's body.
pub const BOUNDARY_TAGS: [&str; 2] = ["h2", "h3"];

/// Default text of the heading the widget section is placed after.
pub const DEFAULT_MARKER_HEADING: &str = "Common Interview Questions";

static QUESTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Q\d+:").unwrap());

/// Whether heading text starts a question.
pub fn is_question(text: &str) -> bool {
    QUESTION_PATTERN.is_match(text)
}

/// Collapsed/expanded state of one widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WidgetState {
    #[default]
    Collapsed,
    Expanded,
}

impl WidgetState {
    pub fn is_expanded(self) -> bool {
        self == WidgetState::Expanded
    }

    /// Glyph shown in the question control.
    pub fn indicator(self) -> &'static str {
        match self {
            WidgetState::Collapsed => "+",
            WidgetState::Expanded => "\u{2212}",
        }
    }

    pub fn aria_expanded(self) -> &'static str {
        match self {
            WidgetState::Collapsed => "false",
            WidgetState::Expanded => "true",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetState::Collapsed => "collapsed",
            WidgetState::Expanded => "expanded",
        }
    }

    /// Write this state onto a `details.qa-item` widget.
    pub fn apply(self, widget: &Handle) {
        if self.is_expanded() {
            dom::set_attr(widget, "open", "");
        } else {
            dom::remove_attr(widget, "open");
        }
        dom::set_attr(widget, "data-state", self.as_str());

        for node in dom::descendants(widget) {
            if dom::is_tag(&node, "summary") {
                dom::set_attr(&node, "aria-expanded", self.aria_expanded());
            } else if dom::has_class(&node, "qa-toggle") {
                dom::set_text(&node, self.indicator());
            }
        }
    }
}

/// Open/closed state of every widget on a page, with at most one open.
#[derive(Debug, Clone, Default)]
pub struct AccordionGroup {
    states: Vec<WidgetState>,
}

impl AccordionGroup {
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![WidgetState::Collapsed; len],
        }
    }

    /// Write every state onto its widget, pairing by position.
    pub fn apply(&self, widgets: &[Handle]) {
        for (state, widget) in self.states.iter().zip(widgets) {
            state.apply(widget);
        }
    }
}

/// A question heading with its body, snapshotted before any tree edit.
#[derive(Debug)]
pub struct QaBlock {
    pub title: String,
    /// Detached deep copies of the body; the answer panel is built from these.
    pub body: Vec<Handle>,
    source_heading: Handle,
    source_body: Vec<Handle>,
}

impl QaBlock {
    fn collect(heading: &Handle) -> Self {
        let mut body = Vec::new();
        let mut source_body = Vec::new();
        let mut current = dom::next_element_sibling(heading);
        while let Some(node) = current {
            if dom::tag_name(&node).is_some_and(|tag| BOUNDARY_TAGS.contains(&tag)) {
                break;
            }
            body.push(dom::deep_clone(&node));
            current = dom::next_element_sibling(&node);
            source_body.push(node);
        }

        Self {
            title: dom::text_content(heading),
            body,
            source_heading: heading.clone(),
            source_body,
        }
    }

    fn remove_source(&self) {
        for node in &self.source_body {
            dom::detach(node);
        }
        dom::detach(&self.source_heading);
    }
}

/// Restructures question headings into accordion widgets.
pub struct AccordionTransformer {
    marker_heading: String,
}

impl AccordionTransformer {
    pub fn new(marker_heading: impl Into<String>) -> Self {
        Self {
            marker_heading: marker_heading.into(),
        }
    }

    /// Transform `container` in place and return the number of widgets built.
    /// A container without question headings is left untouched.
    pub fn transform(&self, container: &Handle) -> usize {
        let blocks = Self::collect(container);
        if blocks.is_empty() {
            return 0;
        }

        let section = build_section(&blocks);
        match self.marker(container) {
            Some(marker) => {
                dom::insert_after(&marker, &section);
            }
            None => dom::append(container, &section),
        }

        for block in &blocks {
            block.remove_source();
        }

        tracing::debug!(
            widgets = blocks.len(),
            "Converted question headings to accordion widgets"
        );
        blocks.len()
    }

    /// Snapshot every question heading under `container`, in document order.
    pub fn collect(container: &Handle) -> Vec<QaBlock> {
        dom::select_tags(container, &[QUESTION_TAG])
            .iter()
            .filter(|heading| is_question(&dom::text_content(heading)))
            .map(QaBlock::collect)
            .collect()
    }

    fn marker(&self, container: &Handle) -> Option<Handle> {
        dom::select_tags(container, &["h2"])
            .into_iter()
            .find(|heading| dom::text_content(heading).contains(&self.marker_heading))
    }
}

impl Default for AccordionTransformer {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_HEADING)
    }
}

/// Build the `div.qa-section` holding one widget per block.
pub fn build_section(blocks: &[QaBlock]) -> Handle {
    let section = dom::element("div", &[("class", "qa-section")]);
    let widgets: Vec<Handle> = blocks
        .iter()
        .enumerate()
        .map(|(index, block)| build_widget(index, block))
        .collect();

    AccordionGroup::new(widgets.len()).apply(&widgets);
    for widget in &widgets {
        dom::append(&section, widget);
    }
    section
}

fn build_widget(index: usize, block: &QaBlock) -> Handle {
    let answer_id = format!("qa-answer-{index}");
    let index = index.to_string();

    let details = dom::element("details", &[("class", "qa-item"), ("data-index", index.as_str())]);
    let summary = dom::element(
        "summary",
        &[
            ("class", "qa-question"),
            ("role", "button"),
            ("aria-controls", answer_id.as_str()),
        ],
    );
    let question = dom::element("span", &[("class", "qa-question-text")]);
    dom::append(&question, &dom::text(&block.title));
    let toggle = dom::element("span", &[("class", "qa-toggle"), ("aria-hidden", "true")]);

    dom::append(&summary, &question);
    dom::append(&summary, &toggle);

    let answer = dom::element("div", &[("class", "qa-answer"), ("id", answer_id.as_str())]);
    for node in &block.body {
        dom::append(&answer, &dom::deep_clone(node));
    }

    dom::append(&details, &summary);
    dom::append(&details, &answer);
    details
}

/// All accordion widgets in a subtree, in document order.
pub fn widgets(root: &Handle) -> Vec<Handle> {
    dom::select_tags(root, &["details"])
        .into_iter()
        .filter(|node| dom::has_class(node, "qa-item"))
        .collect()
}

/// Pointer and keyboard handling as the page runtime performs it. The
/// runtime is checked against these rules in the browser tests.
#[cfg(test)]
pub(crate) mod interaction {
    use super::{AccordionGroup, WidgetState};

    /// How a question control was activated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Activation {
        Pointer,
        Key(Key),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Key {
        Enter,
        Space,
        Other,
    }

    impl Key {
        /// Map a DOM `KeyboardEvent.key` value.
        pub fn from_name(name: &str) -> Self {
            match name {
                "Enter" => Key::Enter,
                " " | "Spacebar" => Key::Space,
                _ => Key::Other,
            }
        }
    }

    impl WidgetState {
        pub fn toggled(self) -> Self {
            match self {
                WidgetState::Collapsed => WidgetState::Expanded,
                WidgetState::Expanded => WidgetState::Collapsed,
            }
        }
    }

    impl AccordionGroup {
        pub fn state(&self, index: usize) -> Option<WidgetState> {
            self.states.get(index).copied()
        }

        pub fn expanded(&self) -> Vec<usize> {
            self.states
                .iter()
                .enumerate()
                .filter(|(_, state)| state.is_expanded())
                .map(|(index, _)| index)
                .collect()
        }

        /// Handle an activation of widget `index`. Returns false when ignored.
        pub fn activate(&mut self, index: usize, activation: Activation) -> bool {
            match activation {
                Activation::Pointer | Activation::Key(Key::Enter | Key::Space) => {
                    self.toggle(index)
                }
                Activation::Key(Key::Other) => false,
            }
        }

        /// Flip widget `index`; opening it collapses every other widget.
        pub fn toggle(&mut self, index: usize) -> bool {
            let Some(current) = self.state(index) else {
                return false;
            };
            let next = current.toggled();
            if next.is_expanded() {
                self.states.fill(WidgetState::Collapsed);
            }
            self.states[index] = next;
            true
        }
    }
}

//! Owned DOM helpers over `markup5ever_rcdom`.
//!
//! html5ever builds the tree; everything in here is about walking and
//! restructuring it afterwards. A handle is only valid while the `RcDom` it
//! came from is alive: dropping the document node tears down every subtree
//! still attached to it.

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{Attribute, LocalName, Namespace, QualName, parse_document};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parse a complete HTML document.
pub fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// Parse an HTML fragment into detached top-level nodes.
pub fn parse_fragment(html: &str) -> Vec<Handle> {
    let dom = parse(&format!(
        "<!DOCTYPE html><html><head></head><body>{html}</body></html>"
    ));
    let Some(body) = first_by_tag(&dom.document, "body") else {
        return Vec::new();
    };

    // Detach before `dom` goes out of scope, otherwise the document drop
    // empties these subtrees.
    let nodes: Vec<Handle> = body.children.borrow().clone();
    for node in &nodes {
        detach(node);
    }
    nodes
}

/// Serialize a whole document, doctype included.
pub fn document_html(dom: &RcDom) -> String {
    serialize_node(&dom.document, TraversalScope::ChildrenOnly(None))
}

/// Serialize the children of a node.
pub fn inner_html(node: &Handle) -> String {
    serialize_node(node, TraversalScope::ChildrenOnly(None))
}

/// Serialize a node including its own tag.
pub fn outer_html(node: &Handle) -> String {
    serialize_node(node, TraversalScope::IncludeNode)
}

fn serialize_node(node: &Handle, traversal_scope: TraversalScope) -> String {
    let mut out: Vec<u8> = Vec::new();
    let handle: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    if let Err(e) = serialize(&mut out, &handle, opts) {
        tracing::warn!(error = %e, "Failed to serialize DOM node");
        return String::new();
    }
    String::from_utf8(out).unwrap_or_default()
}

/// Create a detached HTML element.
pub fn element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag)),
        attrs: RefCell::new(
            attrs
                .iter()
                .map(|(name, value)| Attribute {
                    name: attribute_name(name),
                    value: StrTendril::from(*value),
                })
                .collect(),
        ),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Create a detached text node.
pub fn text(contents: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from(contents)),
    })
}

fn attribute_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

/// The local tag name of an element, `None` for every other node kind.
pub fn tag_name(node: &Node) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_tag(node: &Node, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

pub fn is_element(node: &Node) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

pub fn attr(node: &Node, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn set_attr(node: &Node, name: &str, value: &str) {
    let NodeData::Element { attrs, .. } = &node.data else {
        return;
    };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|a| &*a.name.local == name) {
        Some(existing) => existing.value = StrTendril::from(value),
        None => attrs.push(Attribute {
            name: attribute_name(name),
            value: StrTendril::from(value),
        }),
    }
}

pub fn remove_attr(node: &Node, name: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        attrs.borrow_mut().retain(|a| &*a.name.local != name);
    }
}

pub fn has_class(node: &Node, class: &str) -> bool {
    attr(node, "class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// Concatenated text of a node and all of its descendants.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Replace every child of `node` with a single text node.
pub fn set_text(node: &Handle, contents: &str) {
    clear_children(node);
    append(node, &text(contents));
}

pub fn clear_children(node: &Handle) {
    let children: Vec<Handle> = node.children.borrow().clone();
    for child in &children {
        detach(child);
    }
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

/// Remove a node from its parent. No-op for detached nodes.
pub fn detach(node: &Handle) {
    if let Some(weak) = node.parent.take()
        && let Some(parent) = weak.upgrade()
    {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
}

pub fn append(parent: &Handle, child: &Handle) {
    detach(child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

/// Insert `node` directly after `anchor`. Returns false when `anchor` has no parent.
pub fn insert_after(anchor: &Handle, node: &Handle) -> bool {
    let Some(parent) = parent(anchor) else {
        return false;
    };
    detach(node);

    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|c| Rc::ptr_eq(c, anchor)) else {
        return false;
    };
    node.parent.set(Some(Rc::downgrade(&parent)));
    children.insert(index + 1, node.clone());
    true
}

/// The next sibling that is an element, skipping text and comments.
pub fn next_element_sibling(node: &Handle) -> Option<Handle> {
    let parent = parent(node)?;
    let children = parent.children.borrow();
    let index = children.iter().position(|c| Rc::ptr_eq(c, node))?;
    children[index + 1..]
        .iter()
        .find(|c| is_element(c))
        .cloned()
}

/// Copy a node and its whole subtree. The copy is detached.
pub fn deep_clone(node: &Handle) -> Handle {
    let data = match &node.data {
        NodeData::Document => NodeData::Document,
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => NodeData::Doctype {
            name: name.clone(),
            public_id: public_id.clone(),
            system_id: system_id.clone(),
        },
        NodeData::Text { contents } => NodeData::Text {
            contents: RefCell::new(contents.borrow().clone()),
        },
        NodeData::Comment { contents } => NodeData::Comment {
            contents: contents.clone(),
        },
        NodeData::Element {
            name,
            attrs,
            template_contents,
            mathml_annotation_xml_integration_point,
        } => NodeData::Element {
            name: name.clone(),
            attrs: RefCell::new(attrs.borrow().clone()),
            template_contents: RefCell::new(template_contents.borrow().as_ref().map(deep_clone)),
            mathml_annotation_xml_integration_point: *mathml_annotation_xml_integration_point,
        },
        NodeData::ProcessingInstruction { target, contents } => {
            NodeData::ProcessingInstruction {
                target: target.clone(),
                contents: contents.clone(),
            }
        }
    };

    let copy = Node::new(data);
    for child in node.children.borrow().iter() {
        append(&copy, &deep_clone(child));
    }
    copy
}

/// All descendant elements of `root` in document order, `root` excluded.
pub fn descendants(root: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        if is_element(&node) {
            out.push(node.clone());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    out
}

/// Descendant elements whose tag is one of `tags`, in document order.
pub fn select_tags(root: &Handle, tags: &[&str]) -> Vec<Handle> {
    descendants(root)
        .into_iter()
        .filter(|node| tag_name(node).is_some_and(|tag| tags.contains(&tag)))
        .collect()
}

pub fn first_by_tag(root: &Handle, tag: &str) -> Option<Handle> {
    descendants(root).into_iter().find(|node| is_tag(node, tag))
}

pub fn find_by_id(root: &Handle, id: &str) -> Option<Handle> {
    descendants(root)
        .into_iter()
        .find(|node| attr(node, "id").as_deref() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_of(dom: &RcDom) -> Handle {
        find_by_id(&dom.document, "content").unwrap()
    }

    #[test]
    fn test_parse_and_find_by_id() {
        let dom = parse("<div id=\"content\"><p>Hello</p></div>");
        let content = content_of(&dom);
        assert_eq!(inner_html(&content), "<p>Hello</p>");
    }

    #[test]
    fn test_parse_fragment_survives_document_drop() {
        let nodes = parse_fragment("<h2>Title</h2>\n<p>Body <em>text</em></p>");
        let elements: Vec<_> = nodes.iter().filter(|n| is_element(n)).collect();
        assert_eq!(elements.len(), 2);
        assert_eq!(text_content(elements[1]), "Body text");
        assert!(parent(elements[0]).is_none());
    }

    #[test]
    fn test_next_element_sibling_skips_text() {
        let dom = parse("<div id=\"content\"><h3>A</h3>\n\n<p>B</p></div>");
        let h3 = first_by_tag(&content_of(&dom), "h3").unwrap();
        let next = next_element_sibling(&h3).unwrap();
        assert!(is_tag(&next, "p"));
        assert!(next_element_sibling(&next).is_none());
    }

    #[test]
    fn test_insert_after_and_detach() {
        let dom = parse("<div id=\"content\"><h2>A</h2><p>B</p></div>");
        let content = content_of(&dom);
        let h2 = first_by_tag(&content, "h2").unwrap();
        let marker = element("hr", &[]);
        assert!(insert_after(&h2, &marker));
        assert_eq!(inner_html(&content), "<h2>A</h2><hr><p>B</p>");

        detach(&h2);
        assert_eq!(inner_html(&content), "<hr><p>B</p>");
        assert!(!insert_after(&h2, &element("br", &[])));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let dom = parse("<div id=\"content\"><p class=\"x\">Hi <b>there</b></p></div>");
        let p = first_by_tag(&content_of(&dom), "p").unwrap();
        let copy = deep_clone(&p);
        set_attr(&copy, "class", "y");
        set_text(&copy, "changed");

        assert_eq!(outer_html(&p), "<p class=\"x\">Hi <b>there</b></p>");
        assert_eq!(outer_html(&copy), "<p class=\"y\">changed</p>");
        assert!(parent(&copy).is_none());
    }

    #[test]
    fn test_attributes() {
        let node = element("a", &[("href", "#x")]);
        assert_eq!(attr(&node, "href").as_deref(), Some("#x"));
        set_attr(&node, "class", "one two");
        assert!(has_class(&node, "two"));
        assert!(!has_class(&node, "three"));
        remove_attr(&node, "href");
        assert!(attr(&node, "href").is_none());
    }

    #[test]
    fn test_select_tags_in_document_order() {
        let dom = parse("<div id=\"content\"><h2>1</h2><div><h3>2</h3></div><h2>3</h2></div>");
        let labels: Vec<String> = select_tags(&content_of(&dom), &["h2", "h3"])
            .iter()
            .map(text_content)
            .collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
    }
}

//! Thin helpers over the `markup5ever_rcdom` tree: parsing, serialization,
//! element lookup in document order, attribute access and visible text.

use std::collections::HashSet;

use anyhow::{Context, Result};
use html5ever::serialize::{SerializeOpts, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, LocalName, Namespace, QualName, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

pub fn parse_html(input: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(input)
}

pub fn serialize_html(dom: &RcDom) -> Result<String> {
    let document: SerializableHandle = dom.document.clone().into();
    let mut bytes = Vec::new();
    serialize(&mut bytes, &document, SerializeOpts::default())
        .context("failed to serialize html document")?;
    String::from_utf8(bytes).context("serialized html is not valid utf-8")
}

pub fn tag_lower(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

/// Every element under `root` whose tag is in `tags`, in document order.
pub fn find_elements(root: &Handle, tags: &[&str]) -> Vec<Handle> {
    fn walk(node: &Handle, tags: &[&str], out: &mut Vec<Handle>) {
        if let Some(tag) = tag_lower(node) {
            if tags.contains(&tag.as_str()) {
                out.push(node.clone());
            }
        }
        for child in node.children.borrow().iter() {
            walk(child, tags, out);
        }
    }

    let mut out = Vec::new();
    walk(root, tags, &mut out);
    out
}

pub fn get_attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.eq_str_ignore_ascii_case(name))
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Overwrites the attribute in place, or appends it when missing.
pub fn set_attr(node: &Handle, name: &str, value: &str) {
    let NodeData::Element { attrs, .. } = &node.data else {
        return;
    };

    let mut attrs = attrs.borrow_mut();
    if let Some(existing) = attrs
        .iter_mut()
        .find(|attr| attr.name.local.eq_str_ignore_ascii_case(name))
    {
        existing.value = value.into();
        return;
    }

    attrs.push(Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: value.into(),
    });
}

/// Non-empty `id` values of every element under `root`.
pub fn element_ids(root: &Handle) -> HashSet<String> {
    fn walk(node: &Handle, out: &mut HashSet<String>) {
        if let Some(id) = get_attr(node, "id").filter(|id| !id.is_empty()) {
            out.insert(id);
        }
        for child in node.children.borrow().iter() {
            walk(child, out);
        }
    }

    let mut out = HashSet::new();
    walk(root, &mut out);
    out
}

/// Text of all descendant text nodes, each trimmed, empty ones skipped,
/// joined by a single space with inner whitespace runs collapsed.
pub fn visible_text(node: &Handle) -> String {
    fn walk(node: &Handle, pieces: &mut Vec<String>) {
        if let NodeData::Text { contents } = &node.data {
            let text = contents.borrow();
            let collapsed = text.split_whitespace().collect::<Vec<&str>>().join(" ");
            if !collapsed.is_empty() {
                pieces.push(collapsed);
            }
        }
        for child in node.children.borrow().iter() {
            walk(child, pieces);
        }
    }

    let mut pieces = Vec::new();
    walk(node, &mut pieces);
    pieces.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(dom: &RcDom, tag: &str) -> Handle {
        find_elements(&dom.document, &[tag])
            .into_iter()
            .next()
            .expect("element present")
    }

    #[test]
    fn find_elements_returns_document_order() {
        let dom = parse_html("<h2>b</h2><div><h1>a</h1></div><h3>c</h3>");
        let found = find_elements(&dom.document, &["h1", "h2", "h3"]);
        let tags: Vec<String> = found.iter().filter_map(tag_lower).collect();
        assert_eq!(tags, vec!["h2", "h1", "h3"]);
    }

    #[test]
    fn visible_text_joins_nested_text_with_single_spaces() {
        let dom = parse_html("<h1>  Getting\n   <em>Started</em>  <b> now </b></h1>");
        assert_eq!(visible_text(&first(&dom, "h1")), "Getting Started now");
    }

    #[test]
    fn visible_text_of_empty_heading_is_empty() {
        let dom = parse_html("<h1><br></h1>");
        assert_eq!(visible_text(&first(&dom, "h1")), "");
    }

    #[test]
    fn set_attr_overwrites_or_appends() {
        let dom = parse_html(r#"<h1 id="old">x</h1><h2>y</h2>"#);
        let h1 = first(&dom, "h1");
        let h2 = first(&dom, "h2");

        set_attr(&h1, "id", "new");
        set_attr(&h2, "id", "fresh");

        assert_eq!(get_attr(&h1, "id").as_deref(), Some("new"));
        assert_eq!(get_attr(&h2, "id").as_deref(), Some("fresh"));
        assert_eq!(get_attr(&h2, "class"), None);

        let html = serialize_html(&dom).expect("serialize");
        assert!(html.contains(r#"<h1 id="new">x</h1>"#));
        assert!(html.contains(r#"<h2 id="fresh">y</h2>"#));
    }

    #[test]
    fn element_ids_skips_empty_values() {
        let dom = parse_html(r#"<div id="a"></div><p id=""></p><span id="b"></span>"#);
        let ids = element_ids(&dom.document);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
    }
}

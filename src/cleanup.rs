use std::cell::RefCell;
use std::rc::Rc;

use html5ever::Attribute;
use html5ever::tendril::StrTendril;
use markup5ever_rcdom::{Handle, NodeData};

const UNWRAP_TAGS: &[&str] = &["zd-html-block", "span"];
const DROP_TAGS: &[&str] = &["script", "style"];
const GLOBAL_ATTRIBUTES: &[&str] = &["id"];

fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "title"],
        "img" => &["src", "alt", "title"],
        "table" => &["border"],
        "td" | "th" => &["colspan", "rowspan"],
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub comments_removed: usize,
    pub elements_dropped: usize,
    pub elements_unwrapped: usize,
    pub attributes_stripped: usize,
}

/// Strips editor noise from the tree in place: comments, script/style
/// elements, wrapper elements, non-breaking spaces and any attribute
/// outside the allow-list.
pub fn clean_document(document: &Handle) -> CleanupStats {
    let mut stats = CleanupStats::default();
    clean_children(document, &mut stats);
    stats
}

fn clean_children(node: &Handle, stats: &mut CleanupStats) {
    let children = node.children.take();
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        match &child.data {
            NodeData::Comment { .. } => {
                stats.comments_removed += 1;
                continue;
            }
            NodeData::Text { contents } => normalize_nbsp(contents),
            NodeData::Element { name, attrs, .. } => {
                let tag = name.local.to_string().to_ascii_lowercase();
                if DROP_TAGS.contains(&tag.as_str()) {
                    stats.elements_dropped += 1;
                    continue;
                }

                clean_children(&child, stats);

                if UNWRAP_TAGS.contains(&tag.as_str()) {
                    stats.elements_unwrapped += 1;
                    for grandchild in child.children.take() {
                        grandchild.parent.set(Some(Rc::downgrade(node)));
                        kept.push(grandchild);
                    }
                    continue;
                }

                strip_attributes(&tag, attrs, stats);
            }
            _ => {}
        }
        kept.push(child);
    }

    *node.children.borrow_mut() = kept;
}

fn normalize_nbsp(contents: &RefCell<StrTendril>) {
    let mut text = contents.borrow_mut();
    if text.contains('\u{a0}') {
        let replaced = text.replace('\u{a0}', " ");
        *text = StrTendril::from_slice(&replaced);
    }
}

fn strip_attributes(tag: &str, attrs: &RefCell<Vec<Attribute>>, stats: &mut CleanupStats) {
    let allowed = allowed_attributes(tag);
    let mut attrs = attrs.borrow_mut();
    let before = attrs.len();
    attrs.retain(|attr| {
        let name = attr.name.local.to_string().to_ascii_lowercase();
        GLOBAL_ATTRIBUTES.contains(&name.as_str()) || allowed.contains(&name.as_str())
    });
    stats.attributes_stripped += before - attrs.len();
}

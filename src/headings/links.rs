use super::*;

#[derive(Debug, Clone, Default)]
pub struct RewriteOutcome {
    pub changed_count: usize,
    pub broken_links: Vec<BrokenLinkRecord>,
}

/// Points every `<a href>` whose fragment was renamed at the new id, and
/// reports fragments that resolve to nothing in the document.
///
/// Must run after [`index_headings`](super::index_headings) so the ids in
/// the tree are final. Off-page fragments are only reported when they look
/// editor-generated; other external anchors are assumed intentional.
pub fn rewrite_cross_references(document: &Handle, id_map: &IdentifierMap) -> RewriteOutcome {
    let current_ids = dom::element_ids(document);
    let mut outcome = RewriteOutcome::default();

    for link in dom::find_elements(document, &["a"]) {
        let Some(href) = dom::get_attr(&link, "href").filter(|href| !href.is_empty()) else {
            continue;
        };
        let Some((prefix, fragment)) = href.rsplit_once('#') else {
            continue;
        };
        if fragment.is_empty() {
            continue;
        }

        if let Some(new_id) = id_map.get(fragment) {
            dom::set_attr(&link, "href", &format!("{prefix}#{new_id}"));
            outcome.changed_count += 1;
            continue;
        }

        if current_ids.contains(fragment) {
            continue;
        }

        if href.starts_with('#') || is_editor_generated_id(fragment) {
            let text = dom::visible_text(&link);
            warn!(href = %href, text = %text, "unresolved anchor");
            outcome.broken_links.push(BrokenLinkRecord { href, text });
        }
    }

    outcome
}

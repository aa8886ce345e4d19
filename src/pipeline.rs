use markup5ever_rcdom::RcDom;
use tracing::debug;

use crate::cleanup::{CleanupStats, clean_document};
use crate::dom::parse_html;
use crate::headings::{HeadingIndex, RewriteOutcome, index_headings, rewrite_cross_references};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub page_url: String,
    pub replace_existing_ids: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            page_url: String::new(),
            replace_existing_ids: true,
        }
    }
}

/// Everything one pass over a document produces. The tree is owned here
/// and already carries the assigned ids and rewritten links.
pub struct DocumentOutcome {
    pub dom: RcDom,
    pub cleanup: CleanupStats,
    pub index: HeadingIndex,
    pub rewrite: RewriteOutcome,
}

/// Parses `markup` and runs cleanup, heading indexing and link rewriting
/// over it in that order. All bookkeeping is local to this call.
pub fn process_document(markup: &str, options: &PipelineOptions) -> DocumentOutcome {
    let dom = parse_html(markup);

    let cleanup = clean_document(&dom.document);
    debug!(
        comments_removed = cleanup.comments_removed,
        elements_dropped = cleanup.elements_dropped,
        elements_unwrapped = cleanup.elements_unwrapped,
        attributes_stripped = cleanup.attributes_stripped,
        "cleaned document"
    );

    let index = index_headings(
        &dom.document,
        &options.page_url,
        options.replace_existing_ids,
    );
    debug!(
        headings = index.rows.len(),
        ids_renamed = index.id_map.len(),
        "indexed headings"
    );

    let rewrite = rewrite_cross_references(&dom.document, &index.id_map);
    debug!(
        links_rewritten = rewrite.changed_count,
        broken_links = rewrite.broken_links.len(),
        "rewrote cross references"
    );

    DocumentOutcome {
        dom,
        cleanup,
        index,
        rewrite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::serialize_html;

    const SAMPLE: &str = concat!(
        "<!DOCTYPE html><html><head><style>.x{}</style></head><body>",
        r#"<zd-html-block><h1 id="h_01F2GC36KSSZJMS4VPK8SSSZ7B" class="wysiwyg-h1">"#,
        r#"<span style="font-size: 20px">Getting&nbsp;Started</span></h1></zd-html-block>"#,
        r#"<h2 data-block="1">Install</h2>"#,
        r##"<p><a href="#h_01F2GC36KSSZJMS4VPK8SSSZ7B" target="_blank">top</a>"##,
        r##" <a href="#missing">gone</a></p>"##,
        "<!-- generated --></body></html>",
    );

    #[test]
    fn cleans_indexes_and_rewrites_in_sequence() {
        let outcome = process_document(SAMPLE, &PipelineOptions::default());

        assert_eq!(outcome.cleanup.comments_removed, 1);
        assert_eq!(outcome.cleanup.elements_dropped, 1);
        assert_eq!(outcome.cleanup.elements_unwrapped, 2);

        let rows = &outcome.index.rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].heading, "Getting Started");
        assert_eq!(rows[0].id, "getting-started");
        assert_eq!(rows[1].absolute_path, "Getting Started > Install");

        assert_eq!(outcome.rewrite.changed_count, 1);
        assert_eq!(outcome.rewrite.broken_links.len(), 1);
        assert_eq!(outcome.rewrite.broken_links[0].href, "#missing");

        let html = serialize_html(&outcome.dom).expect("serialize");
        assert!(html.contains(r#"<h1 id="getting-started">Getting Started</h1>"#));
        assert!(html.contains(r#"<h2 id="install">Install</h2>"#));
        assert!(html.contains(r##"<a href="#getting-started">top</a>"##));
        assert!(!html.contains("class="));
        assert!(!html.contains("target="));
    }

    #[test]
    fn page_url_and_kept_ids_flow_through_options() {
        let options = PipelineOptions {
            page_url: "https://docs.example.com/guide.html".to_string(),
            replace_existing_ids: false,
        };
        let outcome = process_document(SAMPLE, &options);

        assert_eq!(outcome.index.rows[0].id, "h_01F2GC36KSSZJMS4VPK8SSSZ7B");
        assert_eq!(
            outcome.index.rows[1].link,
            "https://docs.example.com/guide.html#install"
        );
        assert!(outcome.index.id_map.is_empty());
        assert_eq!(outcome.rewrite.changed_count, 0);
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

/// Old heading id to the id that replaced it. Only renamed headings appear.
pub type IdentifierMap = BTreeMap<String, String>;

/// One exported row per heading, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingRow {
    pub level: u8,
    pub heading: String,
    pub id: String,
    pub absolute_path: String,
    pub anchor: String,
    pub link: String,
}

/// A hyperlink whose fragment does not resolve to any id in the final document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLinkRecord {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessCounts {
    pub headings: usize,
    pub ids_renamed: usize,
    pub links_rewritten: usize,
    pub broken_links: usize,
    pub comments_removed: usize,
    pub elements_dropped: usize,
    pub elements_unwrapped: usize,
    pub attributes_stripped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub input_path: String,
    pub input_sha256: String,
    pub output_path: String,
    pub workbook_path: String,
    pub index_path: String,
    pub page_url: String,
    pub replace_existing_ids: bool,
    pub counts: ProcessCounts,
    pub renamed_ids: IdentifierMap,
    pub broken_links: Vec<BrokenLinkRecord>,
}

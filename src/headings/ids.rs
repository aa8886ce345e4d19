use std::sync::LazyLock;

use regex::Regex;

use super::*;

pub const FALLBACK_SLUG: &str = "section";

// Ids the editor assigns on its own, e.g. h_01F2GC36KSSZJMS4VPK8SSSZ7B.
static EDITOR_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^h_[0-9A-Z]{20,}$").expect("editor id pattern is a valid regex")
});

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug separator pattern is a valid regex"));

/// Lowercase, hyphen-separated `[a-z0-9]` token for `text`, or
/// [`FALLBACK_SLUG`] when nothing alphanumeric is left.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase().replace('\u{a0}', " ");
    let hyphenated = NON_SLUG_RUN.replace_all(&lowered, "-");
    let slug = hyphenated.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Returns `base`, or the first free `base-N` with N counting up from 2,
/// and records the result in `used`.
pub fn allocate_unique_id(base: &str, used: &mut HashSet<String>) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }

    let mut suffix = 2_usize;
    loop {
        let candidate = format!("{base}-{suffix}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

pub fn is_editor_generated_id(id: &str) -> bool {
    EDITOR_ID_PATTERN.is_match(id)
}

/// Author-chosen ids survive; missing and editor-generated ones are
/// replaced, unless replacement is switched off entirely.
pub fn should_replace_id(existing_id: &str, replace_existing_ids: bool) -> bool {
    replace_existing_ids && (existing_id.is_empty() || is_editor_generated_id(existing_id))
}

use super::*;

pub const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

const PATH_SEPARATOR: &str = " > ";

/// Most recent (title, id) per heading level, cleared below each new heading.
#[derive(Debug, Default)]
pub struct PathStack {
    open: [Option<(String, String)>; 6],
}

impl PathStack {
    pub fn enter(&mut self, level: u8, title: &str, id: &str) {
        let slot = usize::from(level.clamp(1, 6)) - 1;
        self.open[slot] = Some((title.to_string(), id.to_string()));
        for deeper in &mut self.open[slot + 1..] {
            *deeper = None;
        }
    }

    pub fn absolute_path(&self, level: u8) -> String {
        self.open[..usize::from(level.clamp(1, 6))]
            .iter()
            .flatten()
            .map(|(title, _)| title.as_str())
            .collect::<Vec<&str>>()
            .join(PATH_SEPARATOR)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadingIndex {
    pub rows: Vec<HeadingRow>,
    pub id_map: IdentifierMap,
}

pub fn heading_level(tag: &str) -> Option<u8> {
    tag.strip_prefix('h')
        .and_then(|digit| digit.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

/// Assigns an id to every heading of `document`, in document order, and
/// returns one row per heading plus the old -> new map of replaced ids.
pub fn index_headings(
    document: &Handle,
    page_url: &str,
    replace_existing_ids: bool,
) -> HeadingIndex {
    let mut used_ids = dom::element_ids(document);
    let mut stack = PathStack::default();
    let mut index = HeadingIndex::default();

    for heading in dom::find_elements(document, &HEADING_TAGS) {
        let Some(level) = dom::tag_lower(&heading).as_deref().and_then(heading_level) else {
            continue;
        };

        let title = dom::visible_text(&heading);
        let current = dom::get_attr(&heading, "id")
            .map(|id| id.trim().to_string())
            .unwrap_or_default();

        let id = if should_replace_id(&current, replace_existing_ids) {
            let id = allocate_unique_id(&slugify(&title), &mut used_ids);
            if !current.is_empty() {
                debug!(old = %current, new = %id, "replacing editor-generated heading id");
                index.id_map.insert(current, id.clone());
            }
            id
        } else if current.is_empty() {
            allocate_unique_id(&slugify(&title), &mut used_ids)
        } else {
            used_ids.insert(current.clone());
            current
        };
        dom::set_attr(&heading, "id", &id);

        stack.enter(level, &title, &id);
        let absolute_path = stack.absolute_path(level);

        let anchor = format!("#{id}");
        let link = if page_url.is_empty() {
            anchor.clone()
        } else {
            format!("{page_url}{anchor}")
        };

        index.rows.push(HeadingRow {
            level,
            heading: title,
            id,
            absolute_path,
            anchor,
            link,
        });
    }

    index
}

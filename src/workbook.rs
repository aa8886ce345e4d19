use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::model::{BrokenLinkRecord, HeadingRow};
use crate::util::ensure_directory;

pub const HEADINGS_SHEET: &str = "Headings";
pub const BROKEN_LINKS_SHEET: &str = "Broken Links";

const HEADING_COLUMNS: [(&str, f64); 6] = [
    ("Level", 8.0),
    ("Heading", 48.0),
    ("ID", 28.0),
    ("Absolute Path", 64.0),
    ("Anchor", 20.0),
    ("Link", 64.0),
];
const BROKEN_LINK_COLUMNS: [&str; 2] = ["Href", "Link Text"];

/// Writes the heading index and the unresolved anchors as two sheets.
pub fn write_headings_workbook(
    path: &Path,
    rows: &[HeadingRow],
    broken_links: &[BrokenLinkRecord],
) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let headings = workbook.add_worksheet();
    fill_headings_sheet(headings, rows, &header)
        .with_context(|| format!("failed to build {HEADINGS_SHEET} sheet"))?;

    let broken = workbook.add_worksheet();
    fill_broken_links_sheet(broken, broken_links, &header)
        .with_context(|| format!("failed to build {BROKEN_LINKS_SHEET} sheet"))?;

    workbook
        .save(path)
        .with_context(|| format!("failed to write workbook: {}", path.display()))
}

fn fill_headings_sheet(
    sheet: &mut Worksheet,
    rows: &[HeadingRow],
    header: &Format,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    sheet.set_name(HEADINGS_SHEET)?;

    for (col, (title, width)) in (0_u16..).zip(HEADING_COLUMNS) {
        sheet.write_string_with_format(0, col, title, header)?;
        sheet.set_column_width(col, width)?;
    }

    for (row_idx, row) in (1_u32..).zip(rows) {
        sheet.write_number(row_idx, 0, f64::from(row.level))?;
        sheet.write_string(row_idx, 1, &row.heading)?;
        sheet.write_string(row_idx, 2, &row.id)?;
        sheet.write_string(row_idx, 3, &row.absolute_path)?;
        sheet.write_string(row_idx, 4, &row.anchor)?;
        sheet.write_string(row_idx, 5, &row.link)?;
    }

    Ok(())
}

fn fill_broken_links_sheet(
    sheet: &mut Worksheet,
    broken_links: &[BrokenLinkRecord],
    header: &Format,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    sheet.set_name(BROKEN_LINKS_SHEET)?;

    for (col, title) in (0_u16..).zip(BROKEN_LINK_COLUMNS) {
        sheet.write_string_with_format(0, col, title, header)?;
    }

    for (row_idx, record) in (1_u32..).zip(broken_links) {
        sheet.write_string(row_idx, 0, &record.href)?;
        sheet.write_string(row_idx, 1, &record.text)?;
    }

    Ok(())
}

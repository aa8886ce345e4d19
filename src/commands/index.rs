use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::IndexArgs;
use crate::model::{BrokenLinkRecord, HeadingRow};
use crate::pipeline::{PipelineOptions, process_document};
use crate::util::read_utf8_file;

#[derive(Debug, Serialize)]
struct IndexResponse<'a> {
    headings: &'a [HeadingRow],
    broken_links: &'a [BrokenLinkRecord],
}

pub fn run(args: IndexArgs) -> Result<()> {
    let markup = read_utf8_file(&args.input)?;
    let options = PipelineOptions {
        page_url: args.anchors.page_url.clone(),
        replace_existing_ids: !args.anchors.keep_existing_ids,
    };
    let outcome = process_document(&markup, &options);

    info!(
        input = %args.input.display(),
        headings = outcome.index.rows.len(),
        broken_links = outcome.rewrite.broken_links.len(),
        "indexed document"
    );

    let response = IndexResponse {
        headings: &outcome.index.rows,
        broken_links: &outcome.rewrite.broken_links,
    };

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &response)
            .context("failed to serialize index json output")?;
        writeln!(output)?;
    } else {
        write_text_tables(&mut output, &response)?;
    }
    output.flush()?;

    Ok(())
}

fn write_text_tables<W: Write>(output: &mut W, response: &IndexResponse<'_>) -> Result<()> {
    writeln!(output, "level\theading\tid\tabsolutePath\tanchor\tlink")?;
    for row in response.headings {
        writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.level, row.heading, row.id, row.absolute_path, row.anchor, row.link
        )?;
    }

    writeln!(output)?;
    writeln!(output, "Broken links: {}", response.broken_links.len())?;
    writeln!(output, "href\ttext")?;
    for record in response.broken_links {
        writeln!(output, "{}\t{}", record.href, record.text)?;
    }

    Ok(())
}

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cli::ProcessArgs;
use crate::dom::serialize_html;
use crate::model::{ProcessCounts, ProcessReport};
use crate::pipeline::{DocumentOutcome, PipelineOptions, process_document};
use crate::util::{
    now_utc_string, read_utf8_file, sha256_file, sibling_path, write_json_pretty, write_text_file,
};
use crate::workbook::write_headings_workbook;

pub fn run(args: ProcessArgs) -> Result<()> {
    let workbook_path = args
        .xlsx_out
        .clone()
        .unwrap_or_else(|| sibling_path(&args.output, "headings.xlsx"));
    let index_path = args
        .index_out
        .clone()
        .unwrap_or_else(|| workbook_path.with_extension("json"));
    let report_path = args
        .report_out
        .clone()
        .unwrap_or_else(|| sibling_path(&args.output, "report.json"));

    info!(input = %args.input.display(), "processing document");

    let markup = read_utf8_file(&args.input)?;
    let input_sha256 = sha256_file(&args.input)?;

    let options = PipelineOptions {
        page_url: args.anchors.page_url.clone(),
        replace_existing_ids: !args.anchors.keep_existing_ids,
    };
    let outcome = process_document(&markup, &options);

    let paths = OutputPaths {
        workbook: &workbook_path,
        index: &index_path,
    };
    let report = build_report(&args, &paths, &options, input_sha256, &outcome);

    if args.dry_run {
        log_summary(&report.counts);
        info!("dry-run complete, nothing written");
        return Ok(());
    }

    let html = serialize_html(&outcome.dom)?;
    write_text_file(&args.output, &html)?;
    info!(path = %args.output.display(), "wrote cleaned html");

    write_headings_workbook(
        &workbook_path,
        &outcome.index.rows,
        &outcome.rewrite.broken_links,
    )?;
    info!(path = %workbook_path.display(), "wrote heading workbook");

    write_json_pretty(&index_path, &outcome.index.rows)?;
    info!(path = %index_path.display(), "wrote heading index");

    write_json_pretty(&report_path, &report)?;
    info!(path = %report_path.display(), "wrote process report");

    log_summary(&report.counts);

    Ok(())
}

struct OutputPaths<'a> {
    workbook: &'a Path,
    index: &'a Path,
}

fn build_report(
    args: &ProcessArgs,
    paths: &OutputPaths<'_>,
    options: &PipelineOptions,
    input_sha256: String,
    outcome: &DocumentOutcome,
) -> ProcessReport {
    ProcessReport {
        manifest_version: 1,
        generated_at: now_utc_string(),
        input_path: args.input.display().to_string(),
        input_sha256,
        output_path: args.output.display().to_string(),
        workbook_path: paths.workbook.display().to_string(),
        index_path: paths.index.display().to_string(),
        page_url: options.page_url.clone(),
        replace_existing_ids: options.replace_existing_ids,
        counts: ProcessCounts {
            headings: outcome.index.rows.len(),
            ids_renamed: outcome.index.id_map.len(),
            links_rewritten: outcome.rewrite.changed_count,
            broken_links: outcome.rewrite.broken_links.len(),
            comments_removed: outcome.cleanup.comments_removed,
            elements_dropped: outcome.cleanup.elements_dropped,
            elements_unwrapped: outcome.cleanup.elements_unwrapped,
            attributes_stripped: outcome.cleanup.attributes_stripped,
        },
        renamed_ids: outcome.index.id_map.clone(),
        broken_links: outcome.rewrite.broken_links.clone(),
    }
}

fn log_summary(counts: &ProcessCounts) {
    info!(
        headings = counts.headings,
        ids_renamed = counts.ids_renamed,
        links_rewritten = counts.links_rewritten,
        broken_links = counts.broken_links,
        "process completed"
    );
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;

    use super::*;
    use crate::cli::AnchorArgs;
    use crate::workbook::tests::read_part;

    const INPUT: &str = concat!(
        r#"<h1 id="h_01F2GC36KSSZJMS4VPK8SSSZ7B" style="color:red">Getting Started</h1>"#,
        "<h2>Install</h2><h2>Install</h2>",
        r##"<p><a href="#h_01F2GC36KSSZJMS4VPK8SSSZ7B">top</a> <a href="#missing">gone</a></p>"##,
    );

    fn args_for(dir: &Path) -> ProcessArgs {
        let input = dir.join("guide.html");
        fs::write(&input, INPUT).expect("write input");

        ProcessArgs {
            input,
            output: dir.join("out").join("guide.cleaned.html"),
            xlsx_out: None,
            index_out: None,
            report_out: None,
            anchors: AnchorArgs::default(),
            dry_run: false,
        }
    }

    fn read_json(path: &Path) -> Value {
        let raw = fs::read(path).expect("read json");
        serde_json::from_slice(&raw).expect("parse json")
    }

    #[test]
    fn writes_html_index_and_report_next_to_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = args_for(dir.path());
        run(args).expect("process runs");

        let out_dir = dir.path().join("out");
        let html = fs::read_to_string(out_dir.join("guide.cleaned.html")).expect("read html");
        assert!(html.contains(r#"<h1 id="getting-started">Getting Started</h1>"#));
        assert!(html.contains(r##"<a href="#getting-started">top</a>"##));
        assert!(!html.contains("style="));

        let index = read_json(&out_dir.join("guide.cleaned.headings.json"));
        let rows = index.as_array().expect("rows array");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["id"], "install-2");
        assert_eq!(rows[2]["absolutePath"], "Getting Started > Install");
        assert_eq!(rows[2]["anchor"], "#install-2");
        let keys: Vec<&String> = rows[0].as_object().expect("row object").keys().collect();
        assert_eq!(keys.len(), 6);

        let report = read_json(&out_dir.join("guide.cleaned.report.json"));
        assert_eq!(report["counts"]["headings"], 3);
        assert_eq!(report["counts"]["links_rewritten"], 1);
        assert_eq!(report["counts"]["broken_links"], 1);
        assert_eq!(report["counts"]["attributes_stripped"], 1);
        assert_eq!(
            report["renamed_ids"]["h_01F2GC36KSSZJMS4VPK8SSSZ7B"],
            "getting-started"
        );
        assert_eq!(report["broken_links"][0]["href"], "#missing");
        assert_eq!(report["broken_links"][0]["text"], "gone");
        assert_eq!(report["replace_existing_ids"], true);
        assert_eq!(report["input_sha256"].as_str().map(str::len), Some(64));
        assert!(
            report["workbook_path"]
                .as_str()
                .is_some_and(|path| path.ends_with("guide.cleaned.headings.xlsx"))
        );
    }

    #[test]
    fn workbook_carries_headings_and_broken_link_sheets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = args_for(dir.path());
        run(args).expect("process runs");

        let workbook = dir.path().join("out").join("guide.cleaned.headings.xlsx");
        let workbook_xml = read_part(&workbook, "xl/workbook.xml");
        assert!(workbook_xml.contains(r#"name="Headings""#));
        assert!(workbook_xml.contains(r#"name="Broken Links""#));

        let strings = read_part(&workbook, "xl/sharedStrings.xml");
        for expected in ["Absolute Path", "Link Text", "getting-started", "install-2", "#missing"] {
            assert!(strings.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn explicit_paths_and_page_url_are_honored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut args = args_for(dir.path());
        let xlsx_out = dir.path().join("exports").join("index.xlsx");
        let index_out = dir.path().join("exports").join("headings.json");
        let report_out = dir.path().join("exports").join("report.json");
        args.xlsx_out = Some(xlsx_out.clone());
        args.index_out = Some(index_out.clone());
        args.report_out = Some(report_out.clone());
        args.anchors.page_url = "https://docs.example.com/guide.html".to_string();

        run(args).expect("process runs");

        let index = read_json(&index_out);
        assert_eq!(
            index[1]["link"],
            "https://docs.example.com/guide.html#install"
        );
        let report = read_json(&report_out);
        assert_eq!(report["page_url"], "https://docs.example.com/guide.html");
        assert!(xlsx_out.exists());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut args = args_for(dir.path());
        args.dry_run = true;
        let output = args.output.clone();

        run(args).expect("dry run succeeds");

        assert!(!output.exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn missing_input_is_an_error_with_path_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut args = args_for(dir.path());
        args.input = dir.path().join("absent.html");

        let err = run(args).expect_err("missing input fails");
        assert!(err.to_string().contains("absent.html"));
    }
}

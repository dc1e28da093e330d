use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Result, StudyError};
use crate::messages::{scan_messages, write_messages_csv, MessageScan};
use crate::payload::LogPayload;
use crate::text::{final_editor_html, html_to_text};

/// Extension of raw participant log files.
const LOG_EXTENSION: &str = "txt";

/// Options for the per-participant message CSV export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Options for the per-participant plain-text extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Per-run counts reported by the batch entry points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Per-file outcome inside a batch loop.
enum FileOutcome {
    Written(PathBuf),
    Skipped(String),
}

/// Export each log's chat messages to `{participant_id}_messages.csv`.
///
/// One file's failure never aborts the batch; parse and schema problems are
/// reported as skip notices and counted in the summary.
pub fn export_messages(opts: &ExportOptions) -> Result<BatchSummary> {
    if same_directory(&opts.input_dir, &opts.output_dir) {
        warn!(
            dir = %opts.input_dir.display(),
            "output directory equals input directory; raw logs and exports will share a folder"
        );
    }
    fs::create_dir_all(&opts.output_dir)?;

    let mut summary = BatchSummary::default();
    for path in log_files(&opts.input_dir)? {
        match export_one(&path, &opts.output_dir) {
            Ok(FileOutcome::Written(out)) => {
                info!(file = %out.display(), "wrote message export");
                summary.written += 1;
            }
            Ok(FileOutcome::Skipped(reason)) => {
                warn!(file = %path.display(), reason = %reason, "skipping log");
                summary.skipped += 1;
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping log");
                summary.skipped += 1;
            }
        }
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        "message export complete"
    );
    Ok(summary)
}

fn export_one(path: &Path, output_dir: &Path) -> Result<FileOutcome> {
    let payload = LogPayload::from_path(path)?;
    let rows = match scan_messages(&payload) {
        MessageScan::Rows(rows) => rows,
        MessageScan::Skip(reason) => return Ok(FileOutcome::Skipped(reason)),
    };
    let id = payload.participant_id(path);
    let out = output_dir.join(format!("{}_messages.csv", sanitize_stem(&id)));
    write_messages_csv(&rows, &out)?;
    Ok(FileOutcome::Written(out))
}

/// Extract each log's final editor content to `{participant_id}.txt`.
///
/// Refuses to run when the output directory equals the input directory:
/// extracted `.txt` files would overwrite the raw logs.
pub fn extract_texts(opts: &ExtractOptions) -> Result<BatchSummary> {
    if same_directory(&opts.input_dir, &opts.output_dir) {
        return Err(StudyError::config(
            "output directory equals input directory; extracted .txt files would overwrite the raw logs",
        ));
    }
    fs::create_dir_all(&opts.output_dir)?;

    let mut summary = BatchSummary::default();
    for path in log_files(&opts.input_dir)? {
        match extract_one(&path, &opts.output_dir) {
            Ok(out) => {
                info!(file = %out.display(), "wrote extracted text");
                summary.written += 1;
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "failed to extract text");
                summary.skipped += 1;
            }
        }
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        "text extraction complete"
    );
    Ok(summary)
}

fn extract_one(path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let payload = LogPayload::from_path(path)?;
    let id = payload.participant_id(path);
    let text = html_to_text(&final_editor_html(&payload));
    let out = output_dir.join(format!("{}.txt", sanitize_stem(&id)));
    fs::write(&out, text)?;
    Ok(out)
}

/// Log files in `dir`, filtered by extension, in sorted filename order so a
/// later duplicate participant ID deterministically wins.
fn log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_log = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(LOG_EXTENSION));
        if is_log {
            files.push(path);
        } else {
            debug!(path = %path.display(), "ignoring non-log entry");
        }
    }
    files.sort();
    Ok(files)
}

fn same_directory(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
    resolve(a) == resolve(b)
}

/// Replace filesystem-reserved characters so a participant ID is usable as
/// a file stem.
fn sanitize_stem(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

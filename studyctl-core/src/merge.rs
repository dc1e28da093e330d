use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::{Result, StudyError};

/// Options for merging extracted texts into a CSV dataset.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Existing CSV dataset to augment.
    pub dataset: PathBuf,
    /// Directory holding `{id}.txt` files produced by text extraction.
    pub text_dir: PathBuf,
    /// Where to write the augmented dataset.
    pub output: PathBuf,
    /// Header name of the column holding participant identifiers.
    pub id_column: String,
    /// Header name of the column to append.
    pub text_column: String,
}

/// Row counts reported by [`merge_text_column`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub rows: usize,
    pub matched: usize,
}

/// Left-join extracted texts into a dataset by filename lookup.
///
/// Each row's identifier cell names a `{id}.txt` file in the text
/// directory; when it exists its full content fills the appended column,
/// otherwise the cell stays empty. Row order and all original columns are
/// preserved. Fails fast if the dataset cannot be read or the identifier
/// column is missing; a row with no matching file is not an error.
pub fn merge_text_column(opts: &MergeOptions) -> Result<MergeSummary> {
    let mut reader = csv::Reader::from_path(&opts.dataset)?;
    let headers = reader.headers()?.clone();
    let id_idx = headers
        .iter()
        .position(|h| h == opts.id_column)
        .ok_or_else(|| StudyError::missing_column(&opts.id_column, &opts.dataset))?;

    let mut writer = csv::Writer::from_path(&opts.output)?;
    let mut out_headers = headers.clone();
    out_headers.push_field(&opts.text_column);
    writer.write_record(&out_headers)?;

    let mut summary = MergeSummary::default();
    for record in reader.records() {
        let mut record = record?;
        let id = record.get(id_idx).unwrap_or("");
        let text_path = opts.text_dir.join(format!("{id}.txt"));
        let text = if text_path.is_file() {
            summary.matched += 1;
            fs::read_to_string(&text_path)?
        } else {
            String::new()
        };
        record.push_field(&text);
        writer.write_record(&record)?;
        summary.rows += 1;
    }
    writer.flush()?;

    info!(
        dataset = %opts.output.display(),
        rows = summary.rows,
        matched = summary.matched,
        "wrote merged dataset"
    );
    Ok(summary)
}

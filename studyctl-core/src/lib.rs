pub mod batch;
pub mod error;
pub mod merge;
pub mod messages;
pub mod payload;
pub mod text;

pub use batch::{export_messages, extract_texts, BatchSummary, ExportOptions, ExtractOptions};
pub use error::{Result, StudyError};
pub use merge::{merge_text_column, MergeOptions, MergeSummary};
pub use messages::{scan_messages, MessageRow, MessageScan};
pub use payload::LogPayload;
pub use text::{final_editor_html, html_to_text};

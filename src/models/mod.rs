pub mod copy_report;
pub mod copy_task;
pub mod manifest;

pub use copy_report::{summarize, CopyReport, CopyReportBuilder, CopyResult, CopySummary};
pub use copy_task::{CopyTask, TaskLayout};
pub use manifest::{load_manifest, parse_manifest, Manifest};

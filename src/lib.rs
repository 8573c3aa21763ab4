pub mod errors;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use errors::{CopyRunError, EntryError};
pub use models::{
    load_manifest, parse_manifest, summarize, CopyReport, CopyResult, CopySummary, CopyTask,
    Manifest,
};
pub use services::{copy_all, run_copy, FileCopyConfig};

use std::path::PathBuf;

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub manifest_path: PathBuf,
    pub destination_dir: PathBuf,
    pub file_copy: FileCopyConfig,
    pub json_output: bool,
    pub log_level: String,
}

impl AppConfig {
    pub fn new(manifest_path: PathBuf, destination_dir: PathBuf) -> Self {
        Self {
            manifest_path,
            destination_dir,
            file_copy: FileCopyConfig::default(),
            json_output: false,
            log_level: "info".to_string(),
        }
    }
}

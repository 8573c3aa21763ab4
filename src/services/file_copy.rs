use crate::errors::{CopyRunError, EntryError};
use crate::models::{
    load_manifest, summarize, CopyReport, CopyReportBuilder, CopyResult, CopyTask, TaskLayout,
};
use crate::utils::{
    check_directory_usable, copy_file_safe, ensure_directory, files_match, resolve_source_root,
    CopyAction,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const REASON_EXISTS: &str = "destination already exists";
const REASON_SAME_FILE: &str = "source and destination are the same file";
const REASON_DRY_RUN: &str = "dry run";

/// Configuration for file copying operations
#[derive(Debug, Clone)]
pub struct FileCopyConfig {
    /// Directory relative entries are resolved against (cwd when unset)
    pub source_root: Option<PathBuf>,
    /// Appended to every entry before resolving, e.g. `jpg`
    pub extension: Option<String>,
    /// Copy into the destination root by base name instead of keeping subdirectories
    pub flatten: bool,
    pub overwrite: bool,
    /// Write repeated entries as `name (k).ext`
    pub number_duplicates: bool,
    /// Compare SHA-256 digests after each copy
    pub verify: bool,
    pub dry_run: bool,
}

impl Default for FileCopyConfig {
    fn default() -> Self {
        Self {
            source_root: None,
            extension: None,
            flatten: true,
            overwrite: true,
            number_duplicates: false,
            verify: false,
            dry_run: false,
        }
    }
}

/// Load the manifest, then copy everything it lists
pub fn run_copy<P: AsRef<Path>, Q: AsRef<Path>>(
    manifest_path: P,
    destination_dir: Q,
    config: &FileCopyConfig,
) -> Result<CopyReport, CopyRunError> {
    let manifest = load_manifest(manifest_path.as_ref())?;
    info!(
        "Manifest {:?} lists {} files",
        manifest_path.as_ref(),
        manifest.len()
    );
    copy_all(manifest.entries(), destination_dir, config)
}

/// Copy every entry into `destination_dir`, in order, recording one result per entry.
///
/// Only a destination directory that cannot be created aborts the run; anything
/// that goes wrong with an individual entry is recorded in the report.
pub fn copy_all<P: AsRef<Path>>(
    entries: &[String],
    destination_dir: P,
    config: &FileCopyConfig,
) -> Result<CopyReport, CopyRunError> {
    let destination_root = destination_dir.as_ref();

    let prepared = if config.dry_run {
        check_directory_usable(destination_root)
    } else {
        ensure_directory(destination_root)
    };
    prepared.map_err(|source| CopyRunError::DestinationUnavailable {
        path: destination_root.to_path_buf(),
        source,
    })?;

    let source_root = resolve_source_root(config.source_root.as_deref());
    let layout = TaskLayout {
        source_root: &source_root,
        destination_root,
        extension: config.extension.as_deref(),
        flatten: config.flatten,
    };

    info!(
        "Copying {} entries from {:?} to {:?}",
        entries.len(),
        source_root,
        destination_root
    );

    let totals = if config.number_duplicates {
        count_occurrences(entries)
    } else {
        HashMap::new()
    };
    let mut seen: HashMap<&str, usize> = HashMap::new();

    let mut builder = CopyReportBuilder::start(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let occurrence = match totals.get(entry.as_str()) {
            Some(&total) if total > 1 => {
                let count = seen.entry(entry.as_str()).or_insert(0);
                *count += 1;
                Some(*count)
            }
            _ => None,
        };

        let result = copy_entry(index, entry, occurrence, &layout, config);
        log_result(&result);
        builder.push(result);
    }

    let report = builder.build();
    info!("File copy completed. {}", summarize(&report));

    Ok(report)
}

fn count_occurrences(entries: &[String]) -> HashMap<&str, usize> {
    entries.iter().fold(HashMap::new(), |mut totals, entry| {
        *totals.entry(entry.as_str()).or_insert(0) += 1;
        totals
    })
}

fn copy_entry(
    index: usize,
    entry: &str,
    occurrence: Option<usize>,
    layout: &TaskLayout<'_>,
    config: &FileCopyConfig,
) -> CopyResult {
    let source = layout.resolve_source(entry);
    if !source.exists() {
        return CopyResult::Failed {
            entry: entry.to_string(),
            error: EntryError::SourceNotFound {
                path: source.clone(),
            },
            source,
            destination: None,
        };
    }

    match layout.task(index, entry, occurrence) {
        Ok(task) => execute_task(task, config),
        Err(error) => CopyResult::Failed {
            entry: entry.to_string(),
            source,
            destination: None,
            error,
        },
    }
}

enum TaskOutcome {
    Copied,
    Skipped(&'static str),
    Failed(EntryError),
}

fn execute_task(task: CopyTask, config: &FileCopyConfig) -> CopyResult {
    let outcome = if config.dry_run {
        plan_task(&task, config)
    } else {
        perform_task(&task, config)
    };

    let CopyTask {
        entry,
        source,
        destination,
        ..
    } = task;

    match outcome {
        TaskOutcome::Copied => CopyResult::Copied {
            entry,
            source,
            destination,
        },
        TaskOutcome::Skipped(reason) => CopyResult::Skipped {
            entry,
            source,
            destination,
            reason: reason.to_string(),
        },
        TaskOutcome::Failed(error) => CopyResult::Failed {
            entry,
            source,
            destination: Some(destination),
            error,
        },
    }
}

/// Dry run: report what would happen without touching the filesystem
fn plan_task(task: &CopyTask, config: &FileCopyConfig) -> TaskOutcome {
    if !task.source.is_file() {
        return TaskOutcome::Failed(EntryError::Io {
            detail: format!("{:?} is not a regular file", task.source),
        });
    }
    if task.destination.exists() && !config.overwrite {
        return TaskOutcome::Skipped(REASON_EXISTS);
    }
    TaskOutcome::Skipped(REASON_DRY_RUN)
}

fn perform_task(task: &CopyTask, config: &FileCopyConfig) -> TaskOutcome {
    match copy_file_safe(&task.source, &task.destination, config.overwrite) {
        Ok(CopyAction::DestinationExists) => TaskOutcome::Skipped(REASON_EXISTS),
        Ok(CopyAction::SameFile) => TaskOutcome::Skipped(REASON_SAME_FILE),
        Ok(CopyAction::Copied) if config.verify => verify_copy(&task.source, &task.destination),
        Ok(CopyAction::Copied) => TaskOutcome::Copied,
        Err(e) => TaskOutcome::Failed(e.into()),
    }
}

fn verify_copy(source: &Path, destination: &Path) -> TaskOutcome {
    match files_match(source, destination) {
        Ok(true) => TaskOutcome::Copied,
        Ok(false) => TaskOutcome::Failed(EntryError::VerificationFailed {
            path: destination.to_path_buf(),
        }),
        Err(e) => TaskOutcome::Failed(e.into()),
    }
}

fn log_result(result: &CopyResult) {
    match result {
        CopyResult::Copied {
            source,
            destination,
            ..
        } => debug!("Copied {} to {}", source.display(), destination.display()),
        CopyResult::Skipped {
            source,
            destination,
            reason,
            ..
        } => debug!(
            "Skipped copying {} to {}: {}",
            source.display(),
            destination.display(),
            reason
        ),
        CopyResult::Failed { entry, error, .. } => warn!("Failed to copy {:?}: {}", entry, error),
    }
}

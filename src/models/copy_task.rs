use crate::errors::EntryError;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// One resolved (source, destination) pair for a manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    pub index: usize,
    pub entry: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Everything needed to turn a manifest entry into a `CopyTask`
#[derive(Debug, Clone, Copy)]
pub struct TaskLayout<'a> {
    pub source_root: &'a Path,
    pub destination_root: &'a Path,
    pub extension: Option<&'a str>,
    pub flatten: bool,
}

impl<'a> TaskLayout<'a> {
    /// Entry text with the configured extension appended
    fn entry_name(&self, entry: &str) -> String {
        match self.extension.map(str::trim).filter(|ext| !ext.is_empty()) {
            Some(ext) if ext.starts_with('.') => format!("{}{}", entry, ext),
            Some(ext) => format!("{}.{}", entry, ext),
            None => entry.to_string(),
        }
    }

    /// Absolute entries are kept, relative ones hang off the source root
    pub fn resolve_source(&self, entry: &str) -> PathBuf {
        let path = PathBuf::from(self.entry_name(entry));
        if path.is_absolute() {
            path
        } else {
            self.source_root.join(path)
        }
    }

    /// Destination for `source`; `occurrence` numbers repeated entries
    pub fn derive_destination(
        &self,
        entry: &str,
        source: &Path,
        occurrence: Option<usize>,
    ) -> Result<PathBuf, EntryError> {
        let relative = if self.flatten {
            flat_relative_path(source)?
        } else {
            let entry_path = PathBuf::from(self.entry_name(entry));
            let relative_source = if entry_path.is_absolute() {
                source.strip_prefix(self.source_root).ok()
            } else {
                Some(entry_path.as_path())
            };
            match relative_source {
                Some(path) => normalized_relative_path(path)?,
                None => flat_relative_path(source)?,
            }
        };

        let relative = match occurrence {
            Some(count) => with_occurrence_suffix(&relative, count),
            None => relative,
        };

        Ok(self.destination_root.join(relative))
    }

    pub fn task(
        &self,
        index: usize,
        entry: &str,
        occurrence: Option<usize>,
    ) -> Result<CopyTask, EntryError> {
        let source = self.resolve_source(entry);
        let destination = self.derive_destination(entry, &source, occurrence)?;
        Ok(CopyTask {
            index,
            entry: entry.to_string(),
            source,
            destination,
        })
    }
}

fn flat_relative_path(source: &Path) -> Result<PathBuf, EntryError> {
    source
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| EntryError::InvalidEntry {
            reason: format!("{:?} has no file name", source),
        })
}

/// Keeps only plain components; anything climbing out of the root is rejected
fn normalized_relative_path(path: &Path) -> Result<PathBuf, EntryError> {
    let mut relative = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(EntryError::InvalidEntry {
                    reason: format!("{:?} escapes the destination directory", path),
                });
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(EntryError::InvalidEntry {
            reason: format!("{:?} has no file name", path),
        });
    }

    Ok(relative)
}

/// `photo.jpg` -> `photo (2).jpg`
fn with_occurrence_suffix(path: &Path, count: usize) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();

    let mut name = OsString::from(stem);
    name.push(format!(" ({})", count));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }

    path.with_file_name(name)
}

use crate::errors::CopyRunError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Ordered list of file entries read from a plain-text list file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

/// Pure function: one entry per non-blank line, trimmed, in file order
pub fn parse_manifest(text: &str) -> Manifest {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let entries = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    Manifest::new(entries)
}

/// Read and parse a manifest file
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest, CopyRunError> {
    let path = path.as_ref();

    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => CopyRunError::ManifestNotFound {
            path: path.to_path_buf(),
        },
        _ => CopyRunError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let manifest = parse_manifest(&text);
    tracing::debug!("Loaded {} entries from manifest {:?}", manifest.len(), path);

    Ok(manifest)
}

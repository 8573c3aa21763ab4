use sha2::{Digest, Sha256};
use std::env;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// What `copy_file_safe` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAction {
    Copied,
    DestinationExists,
    SameFile,
}

/// Directory relative entries are resolved against, defaulting to the cwd
pub fn resolve_source_root(source_root: Option<&Path>) -> PathBuf {
    let base = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            tracing::warn!("Cannot determine current directory: {}", e);
            PathBuf::from(".")
        }
    };

    match source_root {
        Some(root) if root.is_absolute() => root.to_path_buf(),
        Some(root) => base.join(root),
        None => base,
    }
}

/// Create the directory (and parents) if missing; a non-directory at the path is an error
pub fn ensure_directory<P: AsRef<Path>>(directory: P) -> io::Result<()> {
    let dir_path = directory.as_ref();

    fs::create_dir_all(dir_path)?;

    if !dir_path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{:?} exists and is not a directory", dir_path),
        ));
    }

    Ok(())
}

/// Usable as a destination root without creating anything
pub fn check_directory_usable<P: AsRef<Path>>(directory: P) -> io::Result<()> {
    let dir_path = directory.as_ref();

    if dir_path.exists() && !dir_path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{:?} exists and is not a directory", dir_path),
        ));
    }

    Ok(())
}

/// Copy file from source to destination, creating parent directories
pub fn copy_file_safe<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    overwrite: bool,
) -> io::Result<CopyAction> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();

    if !src_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Source file does not exist: {:?}", src_path),
        ));
    }

    match fs::symlink_metadata(dest_path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            if !overwrite {
                return Ok(CopyAction::DestinationExists);
            }
            // fs::copy would write through the link to its target
            fs::remove_file(dest_path)?;
        }
        Ok(_) => {
            // fs::copy onto the same inode (same path or hard link) truncates the source
            if same_file::is_same_file(src_path, dest_path)? {
                return Ok(CopyAction::SameFile);
            }
            if !overwrite {
                return Ok(CopyAction::DestinationExists);
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::copy(src_path, dest_path)?;

    Ok(CopyAction::Copied)
}

/// SHA-256 of a file's contents as lowercase hex
pub fn file_sha256<P: AsRef<Path>>(file_path: P) -> io::Result<String> {
    let mut file = File::open(file_path.as_ref())?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 128 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Byte-for-byte equality via size, then digest
pub fn files_match<P: AsRef<Path>, Q: AsRef<Path>>(a: P, b: Q) -> io::Result<bool> {
    let (a, b) = (a.as_ref(), b.as_ref());

    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }

    Ok(file_sha256(a)? == file_sha256(b)?)
}

pub mod file_operations;

pub use file_operations::{
    check_directory_usable, copy_file_safe, ensure_directory, file_sha256, files_match,
    resolve_source_root, CopyAction,
};

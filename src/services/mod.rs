pub mod file_copy;

pub use file_copy::{copy_all, run_copy, FileCopyConfig};

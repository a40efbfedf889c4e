use std::io::{Read, Write};
use std::path::Path;

use crate::domain::AppError;
use crate::ports::Ui;

/// Remote execution and file transfer against the machine being provisioned.
///
/// Remote paths always use `/` separators. Cancellation and timeouts are the
/// implementation's concern; callers only propagate the errors it returns.
pub trait Transport {
    /// Run a shell command, streaming its output to `ui`, and return its exit status.
    fn run_command(&self, command: &str, ui: &mut dyn Ui) -> Result<i32, AppError>;

    /// Copy everything readable from `source` to `remote_path`.
    fn upload_file(&self, remote_path: &str, source: &mut dyn Read) -> Result<(), AppError>;

    /// Copy a local directory tree to `remote_path`, skipping entries matching `excludes`.
    fn upload_directory(
        &self,
        remote_path: &str,
        local_dir: &Path,
        excludes: &[String],
    ) -> Result<(), AppError>;

    /// Stream the remote file at `remote_path` into `destination`.
    fn download_file(&self, remote_path: &str, destination: &mut dyn Write) -> Result<(), AppError>;
}

//! Provisioning blocks: one discrete remote step each.

mod installation;
mod validation;

use std::fs::{self, File};
use std::path::Path;

use crate::domain::AppError;
use crate::ports::{Transport, Ui};

pub use installation::InstallationBlock;
pub use validation::ValidationBlock;

/// A provisioning step the pipeline validates and then runs.
pub trait Block {
    /// Stable human-readable name used in progress output and errors.
    fn name(&self) -> &str;

    /// Fill defaults and reject illegal combinations.
    ///
    /// On error the block keeps its previous state.
    fn validate(&mut self) -> Result<(), AppError>;

    /// The remote command this block runs. Only available after validation.
    fn command(&self) -> Result<String, AppError>;

    fn run(&self, transport: &dyn Transport, ui: &mut dyn Ui) -> Result<(), AppError>;
}

fn not_validated(block: &str) -> AppError {
    AppError::config_error(format!("block \"{}\" has not been validated", block))
}

/// Run `command` and treat any non-zero exit status as failure.
fn run_checked(
    transport: &dyn Transport,
    ui: &mut dyn Ui,
    command: &str,
    what: &str,
) -> Result<(), AppError> {
    match transport.run_command(command, ui)? {
        0 => Ok(()),
        status => Err(AppError::CommandFailed {
            what: what.to_string(),
            command: command.to_string(),
            status,
        }),
    }
}

/// Copy a remote file into a newly created local file.
///
/// A failed transfer leaves no local file behind.
pub fn download_file(
    transport: &dyn Transport,
    remote_path: &str,
    local_path: &Path,
) -> Result<(), AppError> {
    let mut file =
        File::create(local_path).map_err(|e| AppError::file_error(local_path.display(), e))?;
    let result = transport.download_file(remote_path, &mut file);
    if result.is_err() {
        drop(file);
        let _ = fs::remove_file(local_path);
    }
    result
}

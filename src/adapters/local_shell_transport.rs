use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::domain::AppError;
use crate::ports::{Transport, Ui};

/// Transport for provisioning the machine the tool itself runs on.
///
/// Commands go through the host shell; remote paths are local paths.
#[derive(Debug, Clone, Default)]
pub struct LocalShellTransport {
    working_dir: Option<PathBuf>,
}

impl LocalShellTransport {
    pub fn new() -> Self {
        Self { working_dir: None }
    }

    /// Run commands from `dir` instead of the current directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { working_dir: Some(dir.into()) }
    }

    fn shell(&self, command: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Transport for LocalShellTransport {
    fn run_command(&self, command: &str, ui: &mut dyn Ui) -> Result<i32, AppError> {
        let output = self
            .shell(command)
            .output()
            .map_err(|e| AppError::transport_error(format!("running \"{}\"", command), e))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            ui.message(line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            ui.message(line);
        }

        output.status.code().ok_or_else(|| {
            AppError::transport_error(
                format!("running \"{}\"", command),
                "process terminated by signal",
            )
        })
    }

    fn upload_file(&self, remote_path: &str, source: &mut dyn Read) -> Result<(), AppError> {
        let operation = || format!("upload to {}", remote_path);
        let mut target = File::create(remote_path).map_err(|e| AppError::transport_error(operation(), e))?;
        io::copy(source, &mut target).map_err(|e| AppError::transport_error(operation(), e))?;
        Ok(())
    }

    fn upload_directory(
        &self,
        remote_path: &str,
        local_dir: &Path,
        excludes: &[String],
    ) -> Result<(), AppError> {
        let operation = || format!("upload of {} to {}", local_dir.display(), remote_path);
        let excluded = build_exclude_set(excludes)?;
        let remote_root = Path::new(remote_path);

        for entry in WalkDir::new(local_dir).follow_links(false) {
            let entry = entry.map_err(|e| AppError::transport_error(operation(), e))?;
            let relative = entry
                .path()
                .strip_prefix(local_dir)
                .map_err(|e| AppError::transport_error(operation(), e))?;

            if relative.as_os_str().is_empty() {
                fs::create_dir_all(remote_root).map_err(|e| AppError::transport_error(operation(), e))?;
                continue;
            }
            if excluded.is_match(relative) {
                continue;
            }

            let target = remote_root.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| AppError::transport_error(operation(), e))?;
            } else if entry.file_type().is_file() {
                fs::copy(entry.path(), &target).map_err(|e| AppError::transport_error(operation(), e))?;
            }
        }

        Ok(())
    }

    fn download_file(&self, remote_path: &str, destination: &mut dyn Write) -> Result<(), AppError> {
        let operation = || format!("download of {}", remote_path);
        let mut source = File::open(remote_path).map_err(|e| AppError::transport_error(operation(), e))?;
        io::copy(&mut source, destination).map_err(|e| AppError::transport_error(operation(), e))?;
        Ok(())
    }
}

fn build_exclude_set(excludes: &[String]) -> Result<GlobSet, AppError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in excludes {
        let glob = Glob::new(pattern).map_err(|e| {
            AppError::config_error(format!("invalid exclude pattern \"{}\": {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| AppError::config_error(format!("invalid exclude patterns: {}", e)))
}

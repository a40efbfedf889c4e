//! Shared testing utilities for goss-provisioner CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated working directory for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        Self { root, work_dir }
    }

    /// Path to the directory CLI invocations run in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a command for invoking the compiled binary within the work directory.
    pub fn cli(&self) -> Command {
        let mut cmd =
            Command::cargo_bin("goss-provisioner").expect("Failed to locate goss-provisioner binary");
        cmd.current_dir(&self.work_dir);
        cmd
    }

    /// Write `content` to `relative` below the work directory, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.work_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write the default `goss-provisioner.toml`.
    pub fn write_config(&self, content: &str) -> PathBuf {
        self.write("goss-provisioner.toml", content)
    }

    /// Where the local-shell transport places this context's files once uploaded.
    ///
    /// Absolute local paths are rebased below `/tmp`.
    pub fn uploaded_root(&self) -> PathBuf {
        let local = self.root.path();
        Path::new("/tmp").join(local.strip_prefix("/").unwrap_or(local))
    }

    /// Install an executable script standing in for the goss binary.
    ///
    /// It prints its arguments and exits with `status`.
    #[cfg(unix)]
    pub fn fake_goss(&self, status: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.path().join("bin").join("goss");
        fs::create_dir_all(path.parent().expect("bin has a parent")).expect("Failed to create bin");
        fs::write(&path, format!("#!/bin/sh\necho \"fake goss $*\"\nexit {}\n", status))
            .expect("Failed to write fake goss");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fake goss executable");
        path
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(self.uploaded_root());
    }
}

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::domain::AppError;
use crate::ports::{Transport, Ui};

#[derive(Debug, Clone)]
enum Outcome {
    Exit(i32),
    Fail(String),
}

/// Scripted in-memory transport recording every interaction.
///
/// Commands exit 0 unless a rule whose fragment they contain says otherwise.
#[derive(Default)]
pub struct FakeTransport {
    rules: Mutex<Vec<(String, Outcome)>>,
    commands: Mutex<Vec<String>>,
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
    remote_files: Mutex<BTreeMap<String, Vec<u8>>>,
    output: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `fragment` exit with `status`.
    pub fn exit_with(&self, fragment: &str, status: i32) {
        self.rules.lock().unwrap().push((fragment.to_string(), Outcome::Exit(status)));
    }

    /// Commands containing `fragment` fail to execute at all.
    pub fn fail_on(&self, fragment: &str, details: &str) {
        self.rules.lock().unwrap().push((fragment.to_string(), Outcome::Fail(details.to_string())));
    }

    /// Lines every command prints before exiting.
    pub fn print(&self, line: &str) {
        self.output.lock().unwrap().push(line.to_string());
    }

    pub fn put_remote_file(&self, path: &str, content: &[u8]) {
        self.remote_files.lock().unwrap().insert(path.to_string(), content.to_vec());
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn uploaded_paths(&self) -> Vec<String> {
        self.uploads.lock().unwrap().iter().map(|(path, _)| path.clone()).collect()
    }

    pub fn uploaded(&self, path: &str) -> Option<Vec<u8>> {
        self.uploads.lock().unwrap().iter().find(|(p, _)| p == path).map(|(_, bytes)| bytes.clone())
    }
}

impl Transport for FakeTransport {
    fn run_command(&self, command: &str, ui: &mut dyn Ui) -> Result<i32, AppError> {
        self.commands.lock().unwrap().push(command.to_string());

        let outcome = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| command.contains(fragment.as_str()))
            .map(|(_, outcome)| outcome.clone());

        match outcome {
            Some(Outcome::Fail(details)) => Err(AppError::transport_error("run", details)),
            Some(Outcome::Exit(status)) => Ok(status),
            None => {
                for line in self.output.lock().unwrap().iter() {
                    ui.message(line);
                }
                Ok(0)
            }
        }
    }

    fn upload_file(&self, remote_path: &str, source: &mut dyn Read) -> Result<(), AppError> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes).map_err(|e| AppError::transport_error("upload", e))?;
        self.uploads.lock().unwrap().push((remote_path.to_string(), bytes));
        Ok(())
    }

    fn upload_directory(
        &self,
        remote_path: &str,
        _local_dir: &Path,
        _excludes: &[String],
    ) -> Result<(), AppError> {
        let details = format!("directory upload to {} is not scripted", remote_path);
        Err(AppError::transport_error("upload", details))
    }

    fn download_file(&self, remote_path: &str, destination: &mut dyn Write) -> Result<(), AppError> {
        let files = self.remote_files.lock().unwrap();
        let content = files
            .get(remote_path)
            .ok_or_else(|| AppError::transport_error("download", format!("{} not found", remote_path)))?;
        destination.write_all(content).map_err(|e| AppError::transport_error("download", e))
    }
}

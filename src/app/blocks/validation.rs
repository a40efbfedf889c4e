use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::app::blocks::{Block, download_file, not_validated, run_checked};
use crate::domain::command_text::{mkdir_command, remote_dir};
use crate::domain::{AppError, IncludeResolver, TargetPlatform, Validation, ValidationSpec};
use crate::ports::{EnvProvider, Transport, Ui};

const NAME: &str = "goss validate";

/// Exit status of `goss validate` when at least one assertion failed.
const ASSERTIONS_FAILED: i32 = 1;

/// Uploads the gossfile suite and runs `goss validate` against the target.
pub struct ValidationBlock<E: EnvProvider> {
    spec: ValidationSpec,
    validation: Option<Validation>,
    resolver: IncludeResolver<E>,
    results_dir: PathBuf,
}

impl<E: EnvProvider> ValidationBlock<E> {
    pub fn new(spec: ValidationSpec, env: E) -> Self {
        Self {
            spec,
            validation: None,
            resolver: IncludeResolver::new(env),
            results_dir: PathBuf::from("."),
        }
    }

    /// Local directory the result artifact is downloaded to.
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Validated settings.
    pub fn validation(&self) -> Result<&Validation, AppError> {
        self.validation.as_ref().ok_or_else(|| not_validated(NAME))
    }

    /// Run against the binary installed by the installation block.
    pub fn attach_target(
        &mut self,
        binary_path: &str,
        platform: TargetPlatform,
    ) -> Result<(), AppError> {
        let validation = self.validation()?.clone().with_target(binary_path, platform)?;
        self.validation = Some(validation);
        Ok(())
    }

    /// Root gossfile, discovered includes, and vars file, without duplicates.
    fn upload_set(&self, validation: &Validation, ui: &mut dyn Ui) -> Vec<String> {
        let mut files = vec![validation.goss_file.clone()];

        ui.message(&format!(
            "Detecting whether \"{}\" includes other gossfiles ...",
            validation.goss_file
        ));
        match self.resolver.resolve(
            Path::new(&validation.goss_file),
            validation.vars_file.as_deref().map(Path::new),
            &validation.vars_inline,
            &validation.env_vars,
        ) {
            Ok(includes) => {
                ui.message(&format!(
                    "Found [{}] referenced in \"{}\"",
                    includes.iter().cloned().collect::<Vec<_>>().join(", "),
                    validation.goss_file
                ));
                files.extend(includes);
            }
            Err(err) => ui.message(&format!(
                "Error detecting included goss files: {}. Continuing as not fatal",
                err
            )),
        }

        files.extend(validation.vars_file.iter().cloned());

        let mut unique = Vec::with_capacity(files.len());
        for file in files {
            if !unique.contains(&file) {
                unique.push(file);
            }
        }
        unique
    }

    fn upload(
        &self,
        transport: &dyn Transport,
        ui: &mut dyn Ui,
        platform: TargetPlatform,
        src: &str,
    ) -> Result<(), AppError> {
        let metadata = fs::metadata(src).map_err(|e| AppError::file_error(src, e))?;
        if !metadata.is_file() {
            return Err(AppError::file_error(src, "not a regular file"));
        }
        let mut file = File::open(src).map_err(|e| AppError::file_error(src, e))?;

        let dst = Validation::remote_path(src);
        run_checked(
            transport,
            ui,
            &mkdir_command(&remote_dir(&dst), platform),
            "error creating directories",
        )?;

        ui.message(&format!("Uploading \"{}\" to \"{}\"", src, dst));
        transport.upload_file(&dst, &mut file)
    }

    fn download_results(
        &self,
        transport: &dyn Transport,
        ui: &mut dyn Ui,
        output_file: &str,
    ) -> Result<(), AppError> {
        let remote = Validation::remote_path(output_file);
        let file_name = Path::new(output_file).file_name().ok_or_else(|| {
            AppError::config_error(format!("output file \"{}\" has no file name", output_file))
        })?;
        let local = self.results_dir.join(file_name);

        ui.message(&format!(
            "Downloading goss test result file \"{}\" (target system) to \"{}\" (local) ...",
            remote,
            local.display()
        ));
        download_file(transport, &remote, &local)?;

        let resolved = std::path::absolute(&local).unwrap_or(local);
        ui.message(&format!(
            "Successfully downloaded test result file from target system to \"{}\"",
            resolved.display()
        ));
        Ok(())
    }
}

impl<E: EnvProvider> Block for ValidationBlock<E> {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&mut self) -> Result<(), AppError> {
        self.validation = Some(self.spec.validate()?);
        Ok(())
    }

    fn command(&self) -> Result<String, AppError> {
        Ok(self.validation()?.command())
    }

    fn run(&self, transport: &dyn Transport, ui: &mut dyn Ui) -> Result<(), AppError> {
        let validation = self.validation()?;

        let files = self.upload_set(validation, ui);
        ui.message(&format!("Uploading [{}] to target system ...", files.join(", ")));
        for src in &files {
            self.upload(transport, ui, validation.platform, src)?;
        }

        ui.message("Running goss validate ...");
        let command = validation.command();
        match transport.run_command(&command, ui)? {
            0 => ui.message("goss validate finished: all tests passed"),
            ASSERTIONS_FAILED => ui.message("goss validate finished: one or more tests failed"),
            status => {
                return Err(AppError::CommandFailed {
                    what: "goss validate did not complete".into(),
                    command,
                    status,
                });
            }
        }

        match &validation.output_file {
            Some(output_file) => self.download_results(transport, ui, output_file),
            None => Ok(()),
        }
    }
}

use crate::app::blocks::{Block, not_validated, run_checked};
use crate::domain::command_text::{mkdir_command, remote_dir};
use crate::domain::{AppError, Installation, InstallationSpec};
use crate::ports::{Transport, Ui};

const NAME: &str = "curl/wget installation";

/// Downloads the goss binary onto the target and checks that it runs.
#[derive(Debug, Clone)]
pub struct InstallationBlock {
    spec: InstallationSpec,
    installation: Option<Installation>,
}

impl InstallationBlock {
    pub fn new(spec: InstallationSpec) -> Self {
        Self { spec, installation: None }
    }

    /// Validated settings.
    pub fn installation(&self) -> Result<&Installation, AppError> {
        self.installation.as_ref().ok_or_else(|| not_validated(NAME))
    }
}

impl Block for InstallationBlock {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&mut self) -> Result<(), AppError> {
        self.installation = Some(self.spec.validate()?);
        Ok(())
    }

    fn command(&self) -> Result<String, AppError> {
        Ok(self.installation()?.download_command())
    }

    fn run(&self, transport: &dyn Transport, ui: &mut dyn Ui) -> Result<(), AppError> {
        let installation = self.installation()?;

        if installation.skip_installation {
            ui.message(&format!("Skipping {}", NAME));
            return Ok(());
        }

        let dir = remote_dir(&installation.download_path);
        ui.message(&format!("Creating download path \"{}\" ...", dir));
        run_checked(
            transport,
            ui,
            &mkdir_command(&dir, installation.platform),
            "error creating directories",
        )?;

        ui.message(&format!(
            "Installing goss version {} from {}",
            installation.version, installation.url
        ));
        run_checked(transport, ui, &installation.download_command(), "unable to download goss")?;

        ui.message("Trying to invoke goss ...");
        run_checked(transport, ui, &installation.verify_command(), "unable to install goss")
    }
}

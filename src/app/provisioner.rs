use std::path::PathBuf;

use crate::app::blocks::{Block, InstallationBlock, ValidationBlock};
use crate::app::config::Config;
use crate::app::pipeline::{run_all, validate_all};
use crate::domain::{AppError, BlockErrors, Installation, Validation};
use crate::ports::{EnvProvider, Transport, Ui};

/// Installation followed by validation, prepared from one configuration.
pub struct Provisioner<E: EnvProvider> {
    installation: InstallationBlock,
    validation: ValidationBlock<E>,
}

impl<E: EnvProvider> Provisioner<E> {
    /// Validate both blocks and point validation at the binary the installation produces.
    pub fn prepare(config: Config, env: E) -> Result<Self, AppError> {
        let mut installation = InstallationBlock::new(config.installation);
        let mut validation = ValidationBlock::new(config.validate, env);

        validate_all(&mut [&mut installation, &mut validation])?;

        let target = installation.installation()?;
        if let Err(err) = validation.attach_target(&target.download_path, target.platform) {
            let mut errors = BlockErrors::default();
            errors.push(validation.name(), err);
            return Err(AppError::BlockValidation(errors));
        }

        Ok(Self { installation, validation })
    }

    /// Download the result artifact into `dir` instead of the working directory.
    pub fn with_results_dir(self, dir: impl Into<PathBuf>) -> Self {
        Self { validation: self.validation.with_results_dir(dir), ..self }
    }

    pub fn installation(&self) -> Result<&Installation, AppError> {
        self.installation.installation()
    }

    pub fn validation(&self) -> Result<&Validation, AppError> {
        self.validation.validation()
    }

    /// Blocks in execution order.
    pub fn blocks(&self) -> [&dyn Block; 2] {
        [&self.installation, &self.validation]
    }

    pub fn provision(&self, transport: &dyn Transport, ui: &mut dyn Ui) -> Result<(), AppError> {
        let target = self.installation()?;
        ui.say("Starting goss provisioner ...");
        ui.say(&format!("Configured to run on target system {}/{}", target.platform, target.arch));

        run_all(&self.blocks(), transport, ui)
    }
}

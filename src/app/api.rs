//! API facade over configuration loading, include discovery, and provisioning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::adapters::{ConsoleUi, LocalShellTransport, ProcessEnv};
use crate::app::blocks::Block;
use crate::app::config::load_config;
use crate::app::provisioner::Provisioner;
use crate::domain::{AppError, IncludeResolver, Installation, Validation};

/// Validated settings of both blocks.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub installation: Installation,
    pub validation: Validation,
}

/// One block's name and the command it would run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub name: String,
    pub command: String,
}

/// Inputs for gossfile include discovery.
#[derive(Debug, Clone, Default)]
pub struct IncludesOptions {
    pub gossfile: PathBuf,
    pub vars_file: Option<PathBuf>,
    pub vars_inline: BTreeMap<String, String>,
    pub env_vars: BTreeMap<String, String>,
    /// Follow includes of includes until nothing new appears.
    pub recursive: bool,
}

/// Inputs for a provisioning run on the local machine.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub config: PathBuf,
    /// Where the result artifact is copied to, if one is configured.
    pub results_dir: PathBuf,
}

fn prepare(config_path: &Path) -> Result<Provisioner<ProcessEnv>, AppError> {
    Provisioner::prepare(load_config(config_path)?, ProcessEnv)
}

/// Decode and validate the configuration at `config_path`.
pub fn check(config_path: &Path) -> Result<CheckOutcome, AppError> {
    let provisioner = prepare(config_path)?;
    Ok(CheckOutcome {
        installation: provisioner.installation()?.clone(),
        validation: provisioner.validation()?.clone(),
    })
}

/// Commands each block would run, in execution order.
pub fn render(config_path: &Path) -> Result<Vec<RenderedBlock>, AppError> {
    let provisioner = prepare(config_path)?;
    let mut rendered = Vec::new();
    for block in provisioner.blocks() {
        rendered.push(RenderedBlock { name: block.name().to_string(), command: block.command()? });
    }
    Ok(rendered)
}

/// Gossfiles referenced by `options.gossfile`, rendered with the process environment.
pub fn includes(options: &IncludesOptions) -> Result<Vec<String>, AppError> {
    let resolver = IncludeResolver::new(ProcessEnv);
    let vars_file = options.vars_file.as_deref();
    let (vars_inline, env_vars) = (&options.vars_inline, &options.env_vars);

    let found = if options.recursive {
        resolver.resolve_closure(&options.gossfile, vars_file, vars_inline, env_vars)?
    } else {
        resolver.resolve(&options.gossfile, vars_file, vars_inline, env_vars)?
    };
    Ok(found.into_iter().collect())
}

/// Install goss and validate the machine this process runs on.
pub fn provision(options: &ProvisionOptions) -> Result<(), AppError> {
    let provisioner = prepare(&options.config)?.with_results_dir(&options.results_dir);
    provisioner.provision(&LocalShellTransport::new(), &mut ConsoleUi::new())
}

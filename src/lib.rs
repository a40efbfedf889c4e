//! goss-provisioner: install the goss test runner on a target machine and validate it
//! against a declarative gossfile suite.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::Provisioner;
pub use app::api::{
    CheckOutcome, IncludesOptions, ProvisionOptions, RenderedBlock, check, includes, provision,
    render,
};
pub use app::blocks::{Block, InstallationBlock, ValidationBlock, download_file};
pub use app::config::{Config, load_config, parse_config_content};
pub use app::pipeline::{run_all, validate_all};
pub use domain::{AppError, ErrorCategory, TargetPlatform};

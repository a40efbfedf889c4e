use std::path::Path;

use crate::app::api;
use crate::domain::AppError;

pub fn run_check(config: &Path) -> Result<(), AppError> {
    let outcome = api::check(config)?;
    let (installation, validation) = (&outcome.installation, &outcome.validation);

    println!("✅ Configuration is valid: {}", config.display());
    println!("  Target: {}/{}", installation.platform, installation.arch);
    if installation.skip_installation {
        println!("  Installation: skipped");
    } else {
        println!("  Installation: goss {} from {}", installation.version, installation.url);
    }
    println!("  Binary: {}", installation.download_path);
    println!("  Gossfile: {}", validation.goss_file);
    if let Some(vars_file) = &validation.vars_file {
        println!("  Vars file: {}", vars_file);
    }
    if let Some(output_file) = &validation.output_file {
        println!("  Results: {}", output_file);
    }
    Ok(())
}

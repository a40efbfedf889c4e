//! CLI Adapter.

mod check;
mod includes;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::api;
use crate::app::config::DEFAULT_CONFIG_FILE;
use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "goss-provisioner")]
#[command(version)]
#[command(
    about = "Install goss on a target machine and validate it against a gossfile suite",
    long_about = None
)]
struct Cli {
    /// Provisioner configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print the resolved settings
    #[clap(visible_alias = "c")]
    Check,
    /// Print the command each block would run
    #[clap(visible_alias = "r")]
    Render,
    /// List the gossfiles a gossfile includes
    #[clap(visible_alias = "inc")]
    Includes {
        /// Root gossfile
        gossfile: PathBuf,
        /// YAML file providing template variables
        #[arg(long)]
        vars_file: Option<PathBuf>,
        /// Inline template variable, overriding the vars file
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = includes::parse_key_value)]
        vars: Vec<(String, String)>,
        /// Environment variable visible to the template
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = includes::parse_key_value)]
        env: Vec<(String, String)>,
        /// Follow includes of included gossfiles
        #[arg(short, long)]
        recursive: bool,
    },
    /// Install goss and validate the local machine
    #[clap(visible_alias = "p")]
    Provision {
        /// Directory the result file is copied to
        #[arg(long, default_value = ".")]
        results_dir: PathBuf,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Check => check::run_check(&cli.config),
        Commands::Render => run_render(&cli.config),
        Commands::Includes { gossfile, vars_file, vars, env, recursive } => {
            let options = api::IncludesOptions {
                gossfile,
                vars_file,
                vars_inline: vars.into_iter().collect(),
                env_vars: env.into_iter().collect(),
                recursive,
            };
            includes::run_includes(&options)
        }
        Commands::Provision { results_dir } => {
            api::provision(&api::ProvisionOptions { config: cli.config, results_dir })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_render(config: &std::path::Path) -> Result<(), AppError> {
    for block in api::render(config)? {
        println!("{}: {}", block.name, block.command);
    }
    Ok(())
}

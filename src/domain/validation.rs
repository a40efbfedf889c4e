//! `goss validate` parameters and command synthesis.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::command_text::{
    elevation_prefix, export_env_vars, remote_join, sanitize_command, sorted_entries,
};
use crate::domain::installation::{DEFAULT_ARCH, LATEST, default_download_path};
use crate::domain::{AppError, TargetPlatform};

pub const DEFAULT_GOSS_FILE: &str = "./goss.yaml";
pub const DEFAULT_SLEEP: &str = "1s";
pub const DEFAULT_RETRY_TIMEOUT: &str = "0s";

/// Every uploaded file is placed below this directory on the target.
pub const REMOTE_ROOT: &str = "/tmp";

pub const VALID_FORMATS: &[&str] = &[
    "documentation",
    "json",
    "json_oneline",
    "junit",
    "nagios",
    "nagios_verbose",
    "rspecish",
    "silent",
    "tap",
];
pub const VALID_FORMAT_OPTIONS: &[&str] = &["perfdata", "verbose", "pretty"];
pub const VALID_PACKAGE_TYPES: &[&str] = &["apk", "dpkg", "pacman", "rpm"];
pub const VALID_LOG_LEVELS: &[&str] = &["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Validation settings as decoded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSpec {
    #[serde(default)]
    pub use_sudo: bool,
    /// Root gossfile, relative to the working directory.
    #[serde(default)]
    pub goss_file: String,
    #[serde(default)]
    pub vars_file: String,
    #[serde(default)]
    pub vars_inline: BTreeMap<String, String>,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub log_level: String,
    #[serde(default)]
    pub retry_timeout: String,
    /// Pause between retries.
    #[serde(default)]
    pub sleep: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub format_options: String,
    /// Result file written on the target and copied back after the run.
    #[serde(default)]
    pub output_file: String,
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,
}

/// Validation settings with defaults filled in and vocabularies checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub binary_path: String,
    pub platform: TargetPlatform,
    pub use_sudo: bool,
    pub goss_file: String,
    pub vars_file: Option<String>,
    pub vars_inline: BTreeMap<String, String>,
    pub package: Option<String>,
    pub log_level: Option<String>,
    pub retry_timeout: String,
    pub sleep: String,
    pub format: Option<String>,
    pub format_options: Option<String>,
    pub output_file: Option<String>,
    pub env_vars: BTreeMap<String, String>,
}

impl ValidationSpec {
    pub fn validate(&self) -> Result<Validation, AppError> {
        let log_level = one_of("log level", &self.log_level, VALID_LOG_LEVELS)?;
        let package = one_of("package type", &self.package, VALID_PACKAGE_TYPES)?;
        let format = one_of("format", &self.format, VALID_FORMATS)?;
        let format_options = one_of("format option", &self.format_options, VALID_FORMAT_OPTIONS)?;

        let retry_timeout = duration_or("retry_timeout", &self.retry_timeout, DEFAULT_RETRY_TIMEOUT)?;
        let sleep = duration_or("sleep", &self.sleep, DEFAULT_SLEEP)?;

        Ok(Validation {
            binary_path: default_download_path(LATEST, TargetPlatform::default(), DEFAULT_ARCH),
            platform: TargetPlatform::default(),
            use_sudo: self.use_sudo,
            goss_file: optional(&self.goss_file).unwrap_or_else(|| DEFAULT_GOSS_FILE.to_string()),
            vars_file: optional(&self.vars_file),
            vars_inline: self.vars_inline.clone(),
            package,
            log_level,
            retry_timeout,
            sleep,
            format,
            format_options,
            output_file: optional(&self.output_file),
            env_vars: self.env_vars.clone(),
        })
    }
}

impl Validation {
    /// Point the run at the installed binary on the given platform.
    pub fn with_target(
        self,
        binary_path: impl Into<String>,
        platform: TargetPlatform,
    ) -> Result<Self, AppError> {
        if self.use_sudo && !platform.supports_elevation() {
            return Err(AppError::ElevationUnsupported(platform.to_string()));
        }
        Ok(Self { binary_path: binary_path.into(), platform, ..self })
    }

    /// Location of a local file once uploaded below [`REMOTE_ROOT`].
    pub fn remote_path(local: &str) -> String {
        remote_join(REMOTE_ROOT, local)
    }

    /// Remote location of the result artifact, when one is configured.
    pub fn remote_output_file(&self) -> Option<String> {
        self.output_file.as_deref().map(Self::remote_path)
    }

    pub fn command(&self) -> String {
        let package = self.package.as_deref().map(|p| format!("--package=\"{}\"", p));
        let log_level = match (&self.package, &self.log_level) {
            (Some(_), Some(level)) => format!("--log-level=\"{}\"", level),
            _ => String::new(),
        };
        let vars = self
            .vars_file
            .as_deref()
            .map(|file| format!("--vars=\"{}\"", Self::remote_path(file)));
        let vars_inline: String = match self.vars_file {
            Some(_) => sorted_entries(&self.vars_inline)
                .into_iter()
                .map(|(k, v)| format!("--vars-inline='{}: {}' ", k, v))
                .collect(),
            None => String::new(),
        };
        let format = self.format.as_deref().map(|f| format!("--format=\"{}\"", f));
        let format_options =
            self.format_options.as_deref().map(|o| format!("--format-options=\"{}\"", o));
        let tee = match (self.remote_output_file(), self.platform) {
            (Some(path), TargetPlatform::Linux) => format!("| tee \"{}\"", path),
            (Some(path), TargetPlatform::Windows) => format!("| Tee-Object -FilePath \"{}\"", path),
            (None, _) => String::new(),
        };

        sanitize_command(&format!(
            "{} {} {} {} {} --gossfile=\"{}\" {} {} validate --retry-timeout={} --sleep={} {} {} {}",
            elevation_prefix(self.use_sudo),
            export_env_vars(&self.env_vars, self.platform),
            self.binary_path,
            package.unwrap_or_default(),
            log_level,
            Self::remote_path(&self.goss_file),
            vars.unwrap_or_default(),
            vars_inline,
            self.retry_timeout,
            self.sleep,
            format.unwrap_or_default(),
            format_options.unwrap_or_default(),
            tee,
        ))
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn one_of(what: &'static str, value: &str, valid: &[&str]) -> Result<Option<String>, AppError> {
    match optional(value) {
        None => Ok(None),
        Some(value) if valid.contains(&value.as_str()) => Ok(Some(value)),
        Some(_) => Err(AppError::InvalidOption { what, valid: valid.join(" ") }),
    }
}

fn duration_or(field: &str, value: &str, default: &str) -> Result<String, AppError> {
    match optional(value) {
        None => Ok(default.to_string()),
        Some(value) if is_duration(&value) => Ok(value),
        Some(value) => Err(AppError::config_error(format!(
            "invalid {} \"{}\": expected a duration such as 500ms, 10s or 1m30s",
            field, value
        ))),
    }
}

/// Accepts the duration strings the goss CLI understands (`0`, `1s`, `1m30s`, `1.5h`).
fn is_duration(value: &str) -> bool {
    const UNITS: &[&str] = &["ns", "us", "µs", "ms", "s", "m", "h"];

    if value.is_empty() {
        return false;
    }
    if value == "0" {
        return true;
    }

    let mut rest = value;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(rest.len());
        let number = &rest[..digits];
        if number.is_empty() || number.parse::<f64>().is_err() {
            return false;
        }
        rest = &rest[digits..];

        // Longest match first so `ms` is not read as `m`.
        let Some(unit) = UNITS
            .iter()
            .filter(|unit| rest.starts_with(**unit))
            .max_by_key(|unit| unit.len())
        else {
            return false;
        };
        rest = &rest[unit.len()..];
    }
    true
}

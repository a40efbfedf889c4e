//! Goss binary installation parameters and download command synthesis.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use crate::domain::command_text::{elevation_prefix, export_env_vars, sanitize_command};
use crate::domain::{AppError, TargetPlatform};

/// Version sentinel resolving to the newest upstream release.
pub const LATEST: &str = "latest";
pub const DEFAULT_ARCH: &str = "amd64";

/// Download URL of the newest release for `<os>` and `<arch>`.
pub fn latest_download_url(platform: TargetPlatform, arch: &str) -> String {
    format!("https://github.com/goss-org/goss/releases/latest/download/goss-{}-{}", platform, arch)
}

/// Download URL of a pinned release.
pub fn version_download_url(version: &str, platform: TargetPlatform, arch: &str) -> String {
    format!(
        "https://github.com/goss-org/goss/releases/download/v{}/goss-{}-{}",
        version, platform, arch
    )
}

/// Where the binary lands when no download path is configured.
pub fn default_download_path(version: &str, platform: TargetPlatform, arch: &str) -> String {
    format!("/tmp/goss-{}-{}-{}", version, platform, arch)
}

/// Installation settings as decoded from configuration.
///
/// Empty strings count as unset, so templated configuration that interpolates
/// to nothing falls back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallationSpec {
    /// Run the download with sudo.
    #[serde(default)]
    pub use_sudo: bool,
    /// Goss version; `latest` or a release number with optional `v` prefix.
    #[serde(default)]
    pub version: String,
    /// Architecture of the target system.
    #[serde(default)]
    pub arch: String,
    /// Target operating system.
    #[serde(default)]
    pub os: String,
    /// Explicit download URL.
    #[serde(default)]
    pub url: String,
    /// Skip TLS certificate verification.
    #[serde(default)]
    pub skip_ssl: bool,
    /// Remote path the binary is downloaded to.
    #[serde(default)]
    pub download_path: String,
    /// Basic auth user.
    #[serde(default)]
    pub username: String,
    /// Basic auth password.
    #[serde(default)]
    pub password: String,
    /// Environment exported before the download.
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,
    /// Assume the binary is already present.
    #[serde(default)]
    pub skip_installation: bool,
}

/// Basic auth credentials for the download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: Option<String>,
}

/// Installation settings with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub use_sudo: bool,
    pub version: String,
    pub arch: String,
    pub platform: TargetPlatform,
    pub url: String,
    pub skip_ssl: bool,
    pub download_path: String,
    pub credentials: Option<BasicAuth>,
    pub env_vars: BTreeMap<String, String>,
    pub skip_installation: bool,
}

impl InstallationSpec {
    /// Fill defaults and reject illegal combinations.
    pub fn validate(&self) -> Result<Installation, AppError> {
        let platform = match non_empty(&self.os) {
            None => TargetPlatform::default(),
            Some(os) => os.parse()?,
        };

        if self.use_sudo && !platform.supports_elevation() {
            return Err(AppError::ElevationUnsupported(platform.to_string()));
        }

        let version = match non_empty(&self.version) {
            None => LATEST.to_string(),
            Some(version) => version.strip_prefix('v').unwrap_or(version).to_string(),
        };
        let arch = non_empty(&self.arch).unwrap_or(DEFAULT_ARCH).to_string();

        let url = match non_empty(&self.url) {
            Some(url) => {
                Url::parse(url).map_err(|e| {
                    AppError::config_error(format!("invalid url \"{}\": {}", url, e))
                })?;
                url.to_string()
            }
            None if version == LATEST => latest_download_url(platform, &arch),
            None => version_download_url(&version, platform, &arch),
        };

        let download_path = non_empty(&self.download_path)
            .map(str::to_string)
            .unwrap_or_else(|| default_download_path(&version, platform, &arch));

        let credentials = match (non_empty(&self.username), non_empty(&self.password)) {
            (Some(username), password) => Some(BasicAuth {
                username: username.to_string(),
                password: password.map(str::to_string),
            }),
            (None, Some(_)) => {
                return Err(AppError::config_error("password is set but username is missing"));
            }
            (None, None) => None,
        };

        Ok(Installation {
            use_sudo: self.use_sudo,
            version,
            arch,
            platform,
            url,
            skip_ssl: self.skip_ssl,
            download_path,
            credentials,
            env_vars: self.env_vars.clone(),
            skip_installation: self.skip_installation,
        })
    }
}

impl Installation {
    /// One shell line trying curl first and wget as fallback.
    pub fn download_command(&self) -> String {
        let env = export_env_vars(&self.env_vars, self.platform);
        let sudo = elevation_prefix(self.use_sudo);
        let (curl_ssl, wget_ssl) =
            if self.skip_ssl { ("-k", "--no-check-certificate") } else { ("", "") };
        let (curl_auth, wget_auth) = self.auth_flags();

        sanitize_command(&format!(
            "{env} {sudo} curl -sL {curl_ssl} {curl_auth} -o {path} {url} || {env} {sudo} wget -q {wget_ssl} {wget_auth} -O {path} {url}",
            path = self.download_path,
            url = self.url,
        ))
    }

    /// Marks the binary executable and checks that it runs.
    pub fn verify_command(&self) -> String {
        let path = &self.download_path;
        match self.platform {
            TargetPlatform::Linux => sanitize_command(&format!(
                "{} chmod 555 {} && {} --version",
                elevation_prefix(self.use_sudo),
                path,
                path
            )),
            TargetPlatform::Windows => format!("{} --version", path),
        }
    }

    fn auth_flags(&self) -> (String, String) {
        let Some(auth) = &self.credentials else {
            return (String::new(), String::new());
        };

        match &auth.password {
            Some(password) => (
                format!("-u=\"{}\":\"{}\"", auth.username, password),
                format!("--user=\"{}\" --password=\"{}\"", auth.username, password),
            ),
            None => (format!("-u=\"{}\"", auth.username), format!("--user=\"{}\"", auth.username)),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

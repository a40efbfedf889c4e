use std::fmt;
use std::str::FromStr;

use crate::domain::AppError;

/// Operating system of the machine being provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPlatform {
    #[default]
    Linux,
    Windows,
}

impl TargetPlatform {
    pub const ALL: [TargetPlatform; 2] = [TargetPlatform::Linux, TargetPlatform::Windows];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Linux => "Linux",
            TargetPlatform::Windows => "Windows",
        }
    }

    /// Whether a remote command may be prefixed with an elevation primitive.
    pub fn supports_elevation(&self) -> bool {
        matches!(self, TargetPlatform::Linux)
    }

    /// Space-separated list used in validation messages.
    pub fn valid_options() -> String {
        Self::ALL.iter().map(TargetPlatform::as_str).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = AppError;

    /// Case-insensitive; `linux`, `LINUX`, and `Linux` all name the same platform.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::InvalidOption { what: "OS", valid: Self::valid_options() })
    }
}

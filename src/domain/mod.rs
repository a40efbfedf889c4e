pub mod command_text;
pub mod error;
pub mod gossfile;
pub mod installation;
pub mod platform;
pub mod validation;

pub use error::{AppError, BlockError, BlockErrors, ErrorCategory};
pub use gossfile::{IncludeResolver, TemplateFilter};
pub use installation::{Installation, InstallationSpec};
pub use platform::TargetPlatform;
pub use validation::{Validation, ValidationSpec};

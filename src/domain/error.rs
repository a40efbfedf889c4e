use std::fmt;

use thiserror::Error;

/// Library-wide error type for provisioning operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or inconsistent configuration.
    #[error("{0}")]
    Configuration(String),

    /// Value outside a closed vocabulary.
    #[error("invalid {what}. Valid options: [{valid}]")]
    InvalidOption { what: &'static str, valid: String },

    /// Privilege elevation requested on a platform without an elevation primitive.
    #[error("sudo is not supported on {0}")]
    ElevationUnsupported(String),

    /// Provisioner configuration could not be decoded.
    #[error(transparent)]
    ConfigDecode(#[from] toml::de::Error),

    /// Local file missing, unreadable, or not a regular file.
    #[error("file error for \"{path}\": {details}")]
    File { path: String, details: String },

    /// Vars file malformed or template expression failed to render.
    #[error("template error: {0}")]
    Template(String),

    /// Rendered document is not valid structured data.
    #[error("cannot parse {what}: {details}")]
    Parse { what: String, details: String },

    /// Remote operation could not be carried out.
    #[error("transport error during {operation}: {details}")]
    Transport { operation: String, details: String },

    /// Remote command ran but reported a failing exit status.
    #[error("{what}: \"{command}\" exited with status {status}")]
    CommandFailed { what: String, command: String, status: i32 },

    /// One or more blocks failed validation.
    #[error(transparent)]
    BlockValidation(BlockErrors),

    /// A block failed while running.
    #[error("error running \"{block}\": {source}")]
    BlockRun {
        block: String,
        #[source]
        source: Box<AppError>,
    },
}

/// Coarse error classes used to decide whether a failure is tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    File,
    Template,
    Parse,
    Transport,
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn file_error(path: impl fmt::Display, err: impl fmt::Display) -> Self {
        AppError::File { path: path.to_string(), details: err.to_string() }
    }

    pub fn transport_error(operation: impl Into<String>, err: impl fmt::Display) -> Self {
        AppError::Transport { operation: operation.into(), details: err.to_string() }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Configuration(_)
            | AppError::InvalidOption { .. }
            | AppError::ElevationUnsupported(_)
            | AppError::ConfigDecode(_)
            | AppError::BlockValidation(_) => ErrorCategory::Config,
            AppError::File { .. } => ErrorCategory::File,
            AppError::Template(_) => ErrorCategory::Template,
            AppError::Parse { .. } => ErrorCategory::Parse,
            AppError::Transport { .. } | AppError::CommandFailed { .. } => ErrorCategory::Transport,
            AppError::BlockRun { source, .. } => source.category(),
        }
    }
}

/// A validation failure attributed to the block that produced it.
#[derive(Debug)]
pub struct BlockError {
    pub block: String,
    pub error: AppError,
}

/// Every validation failure collected in one pass.
#[derive(Debug, Default)]
pub struct BlockErrors {
    errors: Vec<BlockError>,
}

impl BlockErrors {
    pub fn push(&mut self, block: impl Into<String>, error: AppError) {
        self.errors.push(BlockError { block: block.into(), error });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockError> {
        self.errors.iter()
    }

    /// Collapse into `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() { Ok(()) } else { Err(AppError::BlockValidation(self)) }
    }
}

impl fmt::Display for BlockErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.errors.len() == 1 { "error" } else { "errors" };
        write!(f, "{} {} occurred:", self.errors.len(), noun)?;
        for entry in &self.errors {
            write!(f, "\n\t* error in {} block: {}", entry.block, entry.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for BlockErrors {}

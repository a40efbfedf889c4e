use crate::app::api::{self, IncludesOptions};
use crate::domain::AppError;

pub fn run_includes(options: &IncludesOptions) -> Result<(), AppError> {
    let found = api::includes(options)?;
    if found.is_empty() {
        println!("No gossfiles included by {}", options.gossfile.display());
    }
    for path in found {
        println!("{}", path);
    }
    Ok(())
}

/// Split a `KEY=VALUE` argument at the first `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got \"{}\"", raw)),
    }
}

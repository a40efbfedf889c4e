use std::collections::BTreeMap;

use crate::ports::EnvProvider;

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn vars(&self) -> BTreeMap<String, String> {
        // Entries that are not valid Unicode cannot appear in a template.
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

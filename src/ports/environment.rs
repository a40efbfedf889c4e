use std::collections::BTreeMap;

/// Source of environment variables visible to gossfile templates.
pub trait EnvProvider {
    fn vars(&self) -> BTreeMap<String, String>;
}

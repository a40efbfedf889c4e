use std::collections::BTreeMap;

use crate::ports::EnvProvider;

/// Fixed environment for template rendering tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv(pub BTreeMap<String, String>);

impl<const N: usize> From<[(&str, &str); N]> for StaticEnv {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

impl EnvProvider for StaticEnv {
    fn vars(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

//! Discovery of gossfiles referenced through the `gossfile` section.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::AppError;
use crate::domain::gossfile::TemplateFilter;
use crate::ports::EnvProvider;

/// The part of a rendered gossfile that names other gossfiles.
///
/// goss reads `gossfile`; `gossfiles` is accepted too and both are merged.
#[derive(Debug, Default, Deserialize)]
struct GossDocument {
    #[serde(default)]
    gossfile: Option<BTreeMap<String, serde_yaml::Value>>,
    #[serde(default)]
    gossfiles: Option<BTreeMap<String, serde_yaml::Value>>,
}

impl GossDocument {
    fn includes(self) -> BTreeSet<String> {
        let listed = self.gossfile.into_iter().chain(self.gossfiles);
        listed.flat_map(BTreeMap::into_keys).collect()
    }
}

/// Renders a gossfile and lists the gossfiles it includes.
///
/// Environment overrides are layered on top of the provider's environment
/// for rendering only; the process environment is never modified.
pub struct IncludeResolver<E: EnvProvider> {
    env: E,
}

impl<E: EnvProvider> IncludeResolver<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// One level of discovery: the keys of the `gossfile` mapping of `spec_path`.
    ///
    /// A document without that section yields an empty set.
    pub fn resolve(
        &self,
        spec_path: &Path,
        vars_file: Option<&Path>,
        vars_inline: &BTreeMap<String, String>,
        env_overrides: &BTreeMap<String, String>,
    ) -> Result<BTreeSet<String>, AppError> {
        let filter = TemplateFilter::new(
            vars_file,
            &inline_vars_document(vars_inline),
            self.environment(env_overrides),
        )?;

        let raw = fs::read(spec_path).map_err(|e| AppError::file_error(spec_path.display(), e))?;
        let rendered = filter.apply(&raw, &spec_path.display().to_string())?;

        let document: serde_yaml::Value =
            serde_yaml::from_str(&rendered).map_err(|e| parse_error(spec_path, e))?;
        if document.is_null() {
            return Ok(BTreeSet::new());
        }

        let document: GossDocument =
            serde_yaml::from_value(document).map_err(|e| parse_error(spec_path, e))?;

        Ok(document.includes())
    }

    /// Repeat [`Self::resolve`] on every discovered file until nothing new appears.
    ///
    /// The root itself is not part of the result unless another file includes it.
    pub fn resolve_closure(
        &self,
        spec_path: &Path,
        vars_file: Option<&Path>,
        vars_inline: &BTreeMap<String, String>,
        env_overrides: &BTreeMap<String, String>,
    ) -> Result<BTreeSet<String>, AppError> {
        let mut found = BTreeSet::new();
        let mut pending = vec![spec_path.to_path_buf()];

        while let Some(path) = pending.pop() {
            for include in self.resolve(&path, vars_file, vars_inline, env_overrides)? {
                if found.insert(include.clone()) {
                    pending.push(include.into());
                }
            }
        }

        Ok(found)
    }

    fn environment(&self, overrides: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut env = self.env.vars();
        env.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        env
    }
}

/// Inline variables as a YAML document, one `key: value` line each.
fn inline_vars_document(vars_inline: &BTreeMap<String, String>) -> String {
    vars_inline.iter().map(|(k, v)| format!("{}: {}\n", k, v)).collect()
}

fn parse_error(path: &Path, err: serde_yaml::Error) -> AppError {
    AppError::Parse { what: format!("gossfile {}", path.display()), details: err.to_string() }
}

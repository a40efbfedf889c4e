use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use minijinja::{Environment, UndefinedBehavior, Value, context};
use serde_yaml::Mapping;

use super::go_template;
use crate::domain::AppError;

/// Variable-substitution filter applied to gossfiles before parsing.
///
/// Gossfiles are Go text templates. They see `.Vars` (vars file merged with
/// inline vars, inline wins) and `.Env`. Undefined variables are errors.
#[derive(Debug, Clone)]
pub struct TemplateFilter {
    vars: Mapping,
    env: BTreeMap<String, String>,
}

impl TemplateFilter {
    pub fn new(
        vars_file: Option<&Path>,
        inline_vars: &str,
        env: BTreeMap<String, String>,
    ) -> Result<Self, AppError> {
        let mut vars = match vars_file {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    AppError::Template(format!("cannot read vars file {}: {}", path.display(), e))
                })?;
                parse_vars(&content, &path.display().to_string())?
            }
            None => Mapping::new(),
        };

        for (key, value) in parse_vars(inline_vars, "inline vars")? {
            vars.insert(key, value);
        }

        Ok(Self { vars, env })
    }

    /// Render raw gossfile bytes as a Go text template.
    pub fn apply(&self, raw: &[u8], name: &str) -> Result<String, AppError> {
        let source = std::str::from_utf8(raw)
            .map_err(|e| AppError::Template(format!("{} is not valid UTF-8: {}", name, e)))?;
        let translated = go_template::translate(source)
            .map_err(|e| AppError::Template(format!("cannot parse {}: {}", name, e)))?;

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_syntax(go_template::syntax().map_err(|e| {
            AppError::Template(format!("cannot configure template syntax: {}", e))
        })?);
        go_template::register_functions(&mut env, self.env.clone());

        let ctx = context! {
            Vars => Value::from_serialize(&self.vars),
            Env => Value::from_serialize(&self.env),
        };

        env.render_str(&translated, ctx)
            .map_err(|e| AppError::Template(format!("cannot render {}: {}", name, e)))
    }
}

fn parse_vars(content: &str, origin: &str) -> Result<Mapping, AppError> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| AppError::Template(format!("malformed {}: {}", origin, e)))?;

    match value {
        serde_yaml::Value::Null => Ok(Mapping::new()),
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        _ => Err(AppError::Template(format!("{} must be a mapping of variables", origin))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn filter(inline: &str) -> TemplateFilter {
        TemplateFilter::new(None, inline, BTreeMap::new()).unwrap()
    }

    #[test]
    fn renders_inline_vars() {
        let rendered = filter("name: nginx\n").apply(b"service: {{ .Vars.name }}", "goss.yaml");
        assert_eq!(rendered.unwrap(), "service: nginx");
    }

    #[test]
    fn inline_vars_override_vars_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name: apache\nport: 80").unwrap();

        let filter = TemplateFilter::new(Some(file.path()), "name: nginx\n", BTreeMap::new()).unwrap();
        let rendered = filter.apply(b"{{ .Vars.name }}:{{ .Vars.port }}", "goss.yaml").unwrap();

        assert_eq!(rendered, "nginx:80");
    }

    #[test]
    fn env_is_exposed() {
        let env = BTreeMap::from([("ROLE".to_string(), "web".to_string())]);
        let filter = TemplateFilter::new(None, "", env).unwrap();

        assert_eq!(filter.apply(b"{{ .Env.ROLE }}", "goss.yaml").unwrap(), "web");
    }

    fn with_role(role: &str) -> TemplateFilter {
        let env = BTreeMap::from([("ROLE".to_string(), role.to_string())]);
        TemplateFilter::new(None, "ports:\n  ssh: 22\n  http: 80\npkgs: [curl, vim]\n", env).unwrap()
    }

    #[test]
    fn jinja_markers_in_plain_text_are_not_interpreted() {
        let source = b"command:\n  echo '{#' '{%':\n    exit-status: 0\n";
        let rendered = filter("").apply(source, "goss.yaml").unwrap();
        assert_eq!(rendered.as_bytes(), source);
    }

    #[test]
    fn go_conditionals_select_a_branch() {
        let source = b"{{ if eq .Env.ROLE \"web\" }}nginx{{ else if eq .Env.ROLE \"db\" }}postgres{{ else }}none{{ end }}";

        assert_eq!(with_role("web").apply(source, "goss.yaml").unwrap(), "nginx");
        assert_eq!(with_role("db").apply(source, "goss.yaml").unwrap(), "postgres");
        assert_eq!(with_role("cache").apply(source, "goss.yaml").unwrap(), "none");
    }

    #[test]
    fn go_pipelines_pass_the_value_last() {
        let rendered = with_role("web").apply(b"{{ .Env.ROLE | printf \"role-%s\" }}", "goss.yaml");
        assert_eq!(rendered.unwrap(), "role-web");
    }

    #[test]
    fn go_range_walks_lists_and_sorted_maps() {
        let filter = with_role("web");
        let source = b"{{ range .Vars.pkgs }}{{ . }},{{ end }} {{ range $k, $v := .Vars.ports }}{{ $k }}={{ $v }};{{ end }}";

        assert_eq!(filter.apply(source, "goss.yaml").unwrap(), "curl,vim, http=80;ssh=22;");
    }

    #[test]
    fn go_helpers_and_trim_markers() {
        let source = b"{{ $r := getEnv \"ROLE\" }}\n  {{- $r | toUpper }} {{ len .Vars.pkgs }} {{ getEnv \"NOPE\" \"x\" }}\n";
        assert_eq!(with_role("web").apply(source, "goss.yaml").unwrap(), "WEB 2 x\n");
    }

    #[test]
    fn unbalanced_go_template_is_a_template_error() {
        let err = filter("").apply(b"{{ if true }}open", "goss.yaml").unwrap_err();
        assert!(matches!(err, AppError::Template(msg) if msg.contains("missing {{end}}")));
    }

    #[test]
    fn undefined_variable_is_a_template_error() {
        let err = filter("").apply(b"{{ .Vars.missing.deeper }}", "goss.yaml").unwrap_err();
        assert!(matches!(err, AppError::Template(_)));
    }

    #[test]
    fn malformed_vars_file_is_a_template_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key: [unclosed").unwrap();

        let err = TemplateFilter::new(Some(file.path()), "", BTreeMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Template(msg) if msg.starts_with("malformed")));
    }

    #[test]
    fn missing_vars_file_is_a_template_error() {
        let err = TemplateFilter::new(Some(Path::new("/nonexistent/vars.yaml")), "", BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, AppError::Template(_)));
    }

    #[test]
    fn scalar_vars_document_is_rejected() {
        let err = TemplateFilter::new(None, "just a string", BTreeMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Template(msg) if msg.contains("must be a mapping")));
    }
}

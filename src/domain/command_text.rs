//! Helpers shared by every synthesized remote command.

use crate::domain::TargetPlatform;

/// Collapse runs of whitespace to single spaces and trim both ends.
pub fn sanitize_command(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map entries ordered by key, so generated commands are deterministic.
pub fn sorted_entries<'a, I>(entries: I) -> Vec<(&'a str, &'a str)>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut pairs: Vec<_> = entries.into_iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
    pairs
}

/// Render environment overrides in the target shell's export syntax.
///
/// Linux: `export A=1 B=2 ;`. Windows: `set "A=1" && set "B=2" && `.
/// Empty input renders as an empty string.
pub fn export_env_vars<'a, I>(vars: I, platform: TargetPlatform) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let entries = sorted_entries(vars);
    if entries.is_empty() {
        return String::new();
    }

    match platform {
        TargetPlatform::Windows => {
            entries.iter().map(|(k, v)| format!("set \"{}={}\" && ", k, v)).collect()
        }
        TargetPlatform::Linux => {
            let assignments: String = entries.iter().map(|(k, v)| format!("{}={} ", k, v)).collect();
            format!("export {};", assignments)
        }
    }
}

/// `sudo` when elevation is requested, empty otherwise.
pub fn elevation_prefix(use_sudo: bool) -> &'static str {
    if use_sudo { "sudo" } else { "" }
}

/// Command creating `dir` and its parents on the target.
pub fn mkdir_command(dir: &str, platform: TargetPlatform) -> String {
    match platform {
        TargetPlatform::Linux => format!("mkdir -p {}", dir),
        TargetPlatform::Windows => format!("powershell -Command \"mkdir -p '{}' -Force\"", dir),
    }
}

/// Join path segments with `/` and lexically clean the result.
///
/// Remote paths always use forward slashes regardless of the host OS.
pub fn remote_join(root: &str, path: &str) -> String {
    let joined = match (root.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => root.to_string(),
        (false, false) => format!("{}/{}", root, path),
    };
    clean_remote_path(&joined)
}

/// Parent directory of a remote path; `.` for a bare file name.
pub fn remote_dir(path: &str) -> String {
    let cleaned = clean_remote_path(path);
    match cleaned.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => cleaned[..idx].to_string(),
        None => ".".to_string(),
    }
}

/// Resolve `.` and `..` segments and duplicate separators.
fn clean_remote_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

mod common;

use common::TestContext;
use predicates::prelude::*;

const DEFAULT_INSTALL: &str = "curl -sL -o /tmp/goss-latest-Linux-amd64 https://github.com/goss-org/goss/releases/latest/download/goss-Linux-amd64 || wget -q -O /tmp/goss-latest-Linux-amd64 https://github.com/goss-org/goss/releases/latest/download/goss-Linux-amd64";

#[test]
fn check_reports_resolved_settings() {
    let ctx = TestContext::new();
    ctx.write_config(
        r#"
[installation]
version = "v0.4.2"

[validate]
goss_file = "specs/goss.yaml"
output_file = "results.xml"
format = "junit"
"#,
    );

    ctx.cli()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Target: Linux/amd64"))
        .stdout(predicate::str::contains("Installation: goss 0.4.2 from https://github.com/goss-org/goss/releases/download/v0.4.2/goss-Linux-amd64"))
        .stdout(predicate::str::contains("Gossfile: specs/goss.yaml"))
        .stdout(predicate::str::contains("Results: results.xml"));
}

#[test]
fn check_without_config_file_fails() {
    let ctx = TestContext::new();

    ctx.cli()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: file error for \"goss-provisioner.toml\""));
}

#[test]
fn check_reads_config_from_flag() {
    let ctx = TestContext::new();
    ctx.write("ci/provisioner.toml", "[installation]\nskip_installation = true\n");

    ctx.cli()
        .args(["--config", "ci/provisioner.toml", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installation: skipped"));
}

#[test]
fn check_lists_every_invalid_block() {
    let ctx = TestContext::new();
    ctx.write_config(
        r#"
[installation]
os = "Windows"
use_sudo = true

[validate]
log_level = "verbose"
"#,
    );

    ctx.cli()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 errors occurred"))
        .stderr(predicate::str::contains(
            "error in curl/wget installation block: sudo is not supported on Windows",
        ))
        .stderr(predicate::str::contains(
            "error in goss validate block: invalid log level. Valid options: [TRACE DEBUG INFO WARN ERROR]",
        ));
}

#[test]
fn unknown_config_field_is_rejected() {
    let ctx = TestContext::new();
    ctx.write_config("[validate]\nretries = 3\n");

    ctx.cli()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field `retries`"));
}

#[test]
fn render_prints_both_commands() {
    let ctx = TestContext::new();
    ctx.write_config("");

    ctx.cli()
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("curl/wget installation: {}", DEFAULT_INSTALL)))
        .stdout(predicate::str::contains(
            "goss validate: /tmp/goss-latest-Linux-amd64 --gossfile=\"/tmp/goss.yaml\" validate --retry-timeout=0s --sleep=1s",
        ));
}

#[test]
fn render_quotes_windows_environment() {
    let ctx = TestContext::new();
    ctx.write_config(
        r#"
[installation]
os = "Windows"
download_path = "C:/goss/goss.exe"

[validate]
env_vars = { B = "2", A = "1" }
"#,
    );

    ctx.cli()
        .arg("render")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "goss validate: set \"A=1\" && set \"B=2\" && C:/goss/goss.exe --gossfile=",
        ));
}

#[test]
fn includes_renders_vars_and_env() {
    let ctx = TestContext::new();
    ctx.write("vars.yaml", "suite: web\n");
    ctx.write(
        "goss.yaml",
        "gossfile:\n  specs/{{ .Vars.suite }}-{{ .Env.STAGE }}.yaml: {}\n  specs/{{ .Vars.extra }}.yaml: {}\n",
    );

    ctx.cli()
        .args(["includes", "goss.yaml", "--vars-file", "vars.yaml", "--var", "extra=db"])
        .args(["--env", "STAGE=prod"])
        .assert()
        .success()
        .stdout(predicate::eq("specs/db.yaml\nspecs/web-prod.yaml\n"));
}

#[test]
fn includes_reports_empty_set() {
    let ctx = TestContext::new();
    ctx.write("goss.yaml", "service:\n  sshd:\n    running: true\n");

    ctx.cli()
        .args(["includes", "goss.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No gossfiles included by goss.yaml"));
}

#[test]
fn includes_recursive_follows_nested_files() {
    let ctx = TestContext::new();
    ctx.write("goss.yaml", "gossfile:\n  specs/base.yaml: {}\n");
    ctx.write("specs/base.yaml", "gossfile:\n  specs/users.yaml: {}\n");
    ctx.write("specs/users.yaml", "user:\n  root:\n    exists: true\n");

    ctx.cli()
        .args(["includes", "goss.yaml"])
        .assert()
        .success()
        .stdout(predicate::eq("specs/base.yaml\n"));

    ctx.cli()
        .args(["includes", "--recursive", "goss.yaml"])
        .assert()
        .success()
        .stdout(predicate::eq("specs/base.yaml\nspecs/users.yaml\n"));
}

#[test]
fn includes_with_undefined_variable_fails() {
    let ctx = TestContext::new();
    ctx.write("goss.yaml", "gossfile:\n  {{ .Vars.missing }}.yaml: {}\n");

    ctx.cli()
        .args(["includes", "goss.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: template error"));
}

#[test]
fn malformed_var_argument_is_a_usage_error() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["includes", "goss.yaml", "--var", "novalue"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

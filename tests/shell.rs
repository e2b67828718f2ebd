//! End-to-end runs of the `intek-sh` binary with a script on stdin.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

const SYSTEM_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// Run the shell with a clean environment holding only `vars`
fn run_shell(script: &str, vars: &[(&str, &str)], cwd: Option<&Path>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_intek-sh"));
    cmd.env_clear()
        .envs(vars.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().expect("failed to spawn intek-sh");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn printenv_lists_inherited_environment() {
    let output = run_shell("printenv\n", &[("ALPHA", "1"), ("BETA", "two")], None);
    assert_eq!(stdout(&output), "ALPHA=1\nBETA=two\n");
    assert!(output.status.success());
}

#[test]
fn export_printenv_and_unset() {
    let script = "export FOO=bar\nprintenv FOO\nexport FOO\nprintenv FOO\nunset FOO\nprintenv FOO\nunset NEVER_SET\n";
    let output = run_shell(script, &[], None);
    assert_eq!(stdout(&output), "bar\n\n");
}

#[test]
fn export_keeps_everything_after_first_equals() {
    let output = run_shell("export A=B=C\nprintenv A\n", &[], None);
    assert_eq!(stdout(&output), "B=C\n");
}

#[test]
fn two_stage_pipeline() {
    let output = run_shell("echo hello | cat\n", &[("PATH", SYSTEM_PATH)], None);
    assert_eq!(stdout(&output), "hello\n");
}

#[test]
fn three_stage_pipeline() {
    let output = run_shell(
        "echo one two three | tr a-z A-Z | wc -w\n",
        &[("PATH", SYSTEM_PATH)],
        None,
    );
    assert_eq!(stdout(&output).trim(), "3");
}

#[test]
fn pipeline_continues_on_next_line() {
    let output = run_shell("echo hello |\ncat\n", &[("PATH", SYSTEM_PATH)], None);
    assert_eq!(stdout(&output), "hello\n");
}

#[test]
fn backslash_joins_lines() {
    let output = run_shell("echo a \\\nb\n", &[("PATH", SYSTEM_PATH)], None);
    assert_eq!(stdout(&output), "a b\n");
}

#[test]
fn unknown_command_is_reported_and_shell_continues() {
    let output = run_shell(
        "zzz_not_a_real_cmd\necho still here\n",
        &[("PATH", SYSTEM_PATH)],
        None,
    );
    assert_eq!(
        stdout(&output),
        "intek-sh: zzz_not_a_real_cmd: command not found\nstill here\n"
    );
}

#[test]
fn no_path_means_nothing_is_found() {
    let output = run_shell("ls\n", &[], None);
    assert_eq!(stdout(&output), "intek-sh: ls: command not found\n");
    assert_eq!(output.status.code(), Some(127));
}

#[test]
fn exported_path_is_used_for_lookup() {
    let output = run_shell(
        &format!("echo nope\nexport PATH={}\necho yes\n", SYSTEM_PATH),
        &[],
        None,
    );
    assert_eq!(
        stdout(&output),
        "intek-sh: echo: command not found\nyes\n"
    );
}

#[test]
fn exported_variables_reach_children() {
    let output = run_shell(
        "export GREETING=hi\nenv\n",
        &[("PATH", SYSTEM_PATH)],
        None,
    );
    assert!(stdout(&output).lines().any(|line| line == "GREETING=hi"));
}

#[test]
fn cd_without_home() {
    let dir = tempdir().unwrap();
    let expected = dir.path().canonicalize().unwrap();
    let output = run_shell("cd\npwd\n", &[("PATH", SYSTEM_PATH)], Some(&expected));
    assert_eq!(
        stdout(&output),
        format!("intek-sh: cd: HOME not set\n{}\n", expected.display())
    );
}

#[test]
fn cd_to_home_and_to_argument() {
    let home = tempdir().unwrap();
    let home_path = home.path().canonicalize().unwrap();
    fs::create_dir(home_path.join("sub")).unwrap();

    let script = "cd\npwd\ncd sub\npwd\n";
    let output = run_shell(
        script,
        &[("PATH", SYSTEM_PATH), ("HOME", home_path.to_str().unwrap())],
        None,
    );
    assert_eq!(
        stdout(&output),
        format!(
            "{}\n{}\n",
            home_path.display(),
            home_path.join("sub").display()
        )
    );
}

#[test]
fn cd_failure_reports_reason() {
    let output = run_shell("cd /no/such/dir\nexport OK=1\nprintenv OK\n", &[], None);
    assert_eq!(
        stdout(&output),
        "intek-sh: cd: /no/such/dir: No such file or directory\n1\n"
    );
}

#[test]
fn direct_paths() {
    let dir = tempdir().unwrap();
    let runnable = dir.path().join("hello.sh");
    fs::write(&runnable, "#!/bin/sh\necho \"hello $1\"\n").unwrap();
    fs::set_permissions(&runnable, fs::Permissions::from_mode(0o755)).unwrap();
    let locked = dir.path().join("locked.sh");
    fs::write(&locked, "#!/bin/sh\necho never\n").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let output = run_shell(
        "./hello.sh world\n./locked.sh\n./missing.sh\n",
        &[("PATH", SYSTEM_PATH)],
        Some(dir.path()),
    );
    assert_eq!(
        stdout(&output),
        "hello world\n\
         intek-sh: ./locked.sh: Permission denied\n\
         intek-sh: ./missing.sh: command not found\n"
    );
}

#[test]
fn exit_with_code() {
    let output = run_shell("exit 0\nprintenv\n", &[("LEFT", "over")], None);
    assert_eq!(stdout(&output), "exit\n");
    assert_eq!(output.status.code(), Some(0));

    let output = run_shell("exit 3\n", &[], None);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn exit_with_bad_code() {
    let output = run_shell("exit abc\nprintenv\n", &[("LEFT", "over")], None);
    assert_eq!(stdout(&output), "exit\nintek-sh: exit:\n");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn end_of_input_exits_cleanly() {
    let output = run_shell("export A=1\n", &[], None);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert!(output.stderr.is_empty());
}

#[test]
fn builtin_output_is_not_piped() {
    let output = run_shell(
        "export FOO=bar\nprintenv FOO | wc -c\n",
        &[("PATH", SYSTEM_PATH)],
        None,
    );
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().map(str::trim).collect();
    assert_eq!(lines, ["bar", "0"]);
}

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn combined_output(output: &Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn btshell_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_btshell").expect("btshell test binary not built")
}

fn run_with_input(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(btshell_bin())
        .args(args)
        .env("BTSHELL_NO_LOGS", "true")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn btshell");
    child
        .stdin
        .take()
        .expect("btshell stdin")
        .write_all(input)
        .expect("write input");
    child.wait_with_output().expect("wait for btshell")
}

#[test]
fn btshell_help_mentions_name() {
    let output = Command::new(btshell_bin())
        .arg("--help")
        .output()
        .expect("run btshell --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("btshell"));
    assert!(combined.contains("--ctl-cmd"));
}

#[test]
fn btshell_list_menus_prints_every_menu() {
    let output = Command::new(btshell_bin())
        .arg("--list-menus")
        .output()
        .expect("run btshell --list-menus");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for header in ["main:", "advertise:", "scan:", "gatt:", "common:"] {
        assert!(stdout.contains(header), "missing {header} in {stdout}");
    }
    assert!(!stdout.contains('\r'));
}

#[test]
fn btshell_rejects_zero_history_size() {
    let output = Command::new(btshell_bin())
        .args(["--history-size", "0"])
        .output()
        .expect("run btshell --history-size 0");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--history-size"));
}

#[test]
fn btshell_rejects_unknown_controller() {
    let output = Command::new(btshell_bin())
        .args(["--ctl-cmd", "definitely-not-a-controller"])
        .output()
        .expect("run btshell --ctl-cmd");
    assert!(!output.status.success());
}

#[cfg(unix)]
#[test]
fn btshell_routes_commands_to_owning_menu() {
    let output = run_with_input(
        &["--ctl-cmd", "/bin/cat"],
        b"scan on\nuuids\nback\nquit\n",
    );
    assert!(output.status.success(), "{}", combined_output(&output));
    // A typed `back` reaches the controller as an empty line.
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "scan on\nmenu scan\nuuids\n\n"
    );
    let echo = String::from_utf8_lossy(&output.stderr);
    assert!(echo.contains("scan on\r\n"));
}

#[cfg(unix)]
#[test]
fn btshell_ends_when_input_closes() {
    let output = run_with_input(&["--ctl-cmd", "/bin/cat"], b"power on\n");
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "power on\n");
}

#[cfg(unix)]
#[test]
fn btshell_reports_controller_failure() {
    let output = run_with_input(&["--ctl-cmd", "/bin/sh -c 'exit 3'"], b"");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("exited with"));
}

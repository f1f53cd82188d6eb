use assert_cmd::Command;

#[test]
fn help_lists_session_flags() {
    let output = Command::cargo_bin("clacker")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--seconds"));
    assert!(stdout.contains("--corpus"));
    assert!(stdout.contains("--corpus-file"));
}

#[test]
fn refuses_to_run_without_a_tty() {
    // assert_cmd pipes stdin, so the tty check trips before any terminal setup
    Command::cargo_bin("clacker")
        .unwrap()
        .write_stdin("")
        .assert()
        .failure();
}

#[test]
fn rejects_unknown_corpus() {
    Command::cargo_bin("clacker")
        .unwrap()
        .args(["--corpus", "poetry"])
        .assert()
        .failure();
}

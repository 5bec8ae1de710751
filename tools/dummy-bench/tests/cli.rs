///
/// dummy-bench CLI Integration Tests
///
/// Runs the built `dummy-bench` binary against synthetic and file-backed
/// workloads and checks its report lines and exit status.
///
/// Run all:  `cargo test -p dummy-bench --test cli`
///

use std::io::Write;
use std::process::{Command, Output};

fn bench(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dummy-bench"))
        .args(args)
        .output()
        .expect("failed to run dummy-bench")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn synthetic_workload_reports_time_and_totals() {
    let output = bench(&["--threads", "2", "--chunks", "5", "--chunk-size", "10", "--suffix", "ab"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let out = stdout(&output);
    assert!(out.starts_with("Time taken: "), "unexpected stdout: {}", out);
    assert!(out.contains("5 chunks, 50 bytes in, 60 bytes out, 2 threads"), "unexpected stdout: {}", out);
}

#[test]
fn file_workload() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello from a file").unwrap();
    file.flush().unwrap();

    let output = bench(&["-t", "1", "--input", &file.path().to_string_lossy(), "--suffix", "!"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("1 chunks, 17 bytes in, 18 bytes out, 1 threads"));
}

#[test]
fn thread_count_flag_sets_worker_count() {
    let output = bench(&["--threads", "3", "--chunks", "2", "--chunk-size", "1"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("2 chunks, 2 bytes in, 4 bytes out, 3 threads"));
}

#[test]
fn positional_thread_count_is_rejected() {
    let output = bench(&["2", "--chunks", "1"]);
    assert!(!output.status.success());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.bin");

    let output = bench(&["--input", &missing.to_string_lossy()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {}", stderr);
}

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn shaker(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shaker"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run shaker")
}

fn write_shader(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn wrong_positional_count_prints_usage() {
    let root = TempDir::new().unwrap();
    let shader = write_shader(root.path(), "red.frag", "void main() {}\n");

    let output = shaker(&[shader.to_str().unwrap(), "640"]);

    assert_eq!(output.status.code(), Some(7));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "stdout was: {stdout}");
}

#[test]
fn lone_non_numeric_width_is_a_count_error() {
    let root = TempDir::new().unwrap();
    let shader = write_shader(root.path(), "red.frag", "void main() {}\n");

    let output = shaker(&[shader.to_str().unwrap(), "wide"]);

    assert_eq!(output.status.code(), Some(7));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "stdout was: {stdout}");
}

#[test]
fn broken_shader_log_is_printed_once() {
    let root = TempDir::new().unwrap();
    let shader = write_shader(root.path(), "broken.frag", "void main() { glx_FragColor = ; }\n");

    let output = Command::new(env!("CARGO_BIN_EXE_shaker"))
        .arg(&shader)
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to run shaker");

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("could not compile fragment shader").count(),
        1,
        "stderr was: {stderr}"
    );
}

#[test]
fn no_arguments_is_a_usage_error() {
    let output = shaker(&[]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn missing_shader_file_names_the_path() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nowhere.frag");

    let output = shaker(&[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nowhere.frag"), "stderr was: {stderr}");
}

#[test]
fn zero_width_is_an_invalid_argument() {
    let root = TempDir::new().unwrap();
    let shader = write_shader(root.path(), "red.frag", "void main() {}\n");

    let output = shaker(&[shader.to_str().unwrap(), "0", "600"]);

    assert_eq!(output.status.code(), Some(8));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "stdout was: {stdout}");
}

#[test]
fn non_numeric_height_is_an_invalid_argument() {
    let root = TempDir::new().unwrap();
    let shader = write_shader(root.path(), "red.frag", "void main() {}\n");

    let output = shaker(&[shader.to_str().unwrap(), "640", "tall"]);

    assert_eq!(output.status.code(), Some(8));
}

#[test]
fn fragment_syntax_error_exits_before_any_window() {
    let root = TempDir::new().unwrap();
    let shader = write_shader(
        root.path(),
        "broken.frag",
        "void main() { glx_FragColor = vec4(1.0, 0.0, ; }\n",
    );

    let output = shaker(&[shader.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fragment"), "stderr was: {stderr}");
}

#[test]
fn unmatched_varying_is_a_link_failure() {
    let root = TempDir::new().unwrap();
    let shader = write_shader(
        root.path(),
        "varying.frag",
        "layout(location = 0) in vec2 uv;\n\
         void main() { glx_FragColor = vec4(uv, 0.0, 1.0); }\n",
    );

    let output = shaker(&[shader.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(6));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("link"), "stderr was: {stderr}");
}

#[test]
fn help_exits_cleanly() {
    let output = shaker(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--fps"));
}

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn fragpad(root: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fragpad"));
    command
        .env("FRAGPAD_CONFIG_DIR", root.path().join("config"))
        .env("FRAGPAD_DATA_DIR", root.path().join("data"))
        .env("RUST_LOG", "warn");
    command
}

#[test]
fn init_writes_default_shader_and_refuses_to_clobber() {
    let root = TempDir::new().unwrap();
    let shader = root.path().join("shaders/pulse.frag");

    let status = fragpad(&root)
        .arg("init")
        .arg(&shader)
        .status()
        .expect("failed to run fragpad init");
    assert!(status.success());
    let written = fs::read_to_string(&shader).unwrap();
    assert!(written.contains("gl_FragColor"));
    assert!(written.contains("uniform float u_time;"));

    fs::write(&shader, "// mine\n").unwrap();
    let status = fragpad(&root)
        .arg("init")
        .arg(&shader)
        .status()
        .expect("failed to rerun fragpad init");
    assert!(!status.success());
    assert_eq!(fs::read_to_string(&shader).unwrap(), "// mine\n");

    let status = fragpad(&root)
        .args(["init", "--force"])
        .arg(&shader)
        .status()
        .expect("failed to run fragpad init --force");
    assert!(status.success());
    assert_eq!(fs::read_to_string(&shader).unwrap(), written);
}

#[test]
fn check_accepts_the_default_shader() {
    let root = TempDir::new().unwrap();
    let shader = root.path().join("default.frag");
    assert!(fragpad(&root)
        .arg("init")
        .arg(&shader)
        .status()
        .unwrap()
        .success());

    let output = fragpad(&root)
        .arg("check")
        .arg(&shader)
        .output()
        .expect("failed to run fragpad check");
    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("ok"));
}

#[test]
fn check_reports_diagnostics_for_broken_shader() {
    let root = TempDir::new().unwrap();
    let shader = root.path().join("broken.frag");
    fs::write(
        &shader,
        "uniform float u_time;\nvoid main() {\n    gl_FragColor = vec4(u_time)\n}\n",
    )
    .unwrap();

    let output = fragpad(&root)
        .arg("check")
        .arg(&shader)
        .output()
        .expect("failed to run fragpad check");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to compile"), "{stderr}");
    assert!(stderr.lines().count() > 1, "{stderr}");
}

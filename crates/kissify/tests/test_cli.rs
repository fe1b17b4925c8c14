use std::{fs, path::Path, process::Command};

use tempfile::TempDir;

fn kissify(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kissify"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, contents).expect("Failed to write file");
}

#[test]
fn test_prints_to_stdout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "menu.js", "var A = require(\"./a\");\nA();\n");

    let output = kissify(temp_dir.path())
        .args(["--module-name", "widgets/menu", "menu.js"])
        .output()
        .expect("Failed to run kissify");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("KISSY.add(\"widgets/menu\""), "{stdout}");
    assert!(stdout.contains("requires:"), "{stdout}");
    assert!(stdout.contains("\"./a\""), "{stdout}");
    assert!(!stdout.contains("require(\"./a\")"), "{stdout}");
}

#[test]
fn test_output_directory_and_module_ids() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "src/widgets/menu.js", "require(\"css!./menu.css\");\n");
    write(temp_dir.path(), "src/app.js", "var menu = require(\"./widgets/menu\");\n");
    write(
        temp_dir.path(),
        "kissify.toml",
        "[module-ids]\nenabled = true\nsource-root = \"src\"\nmodule-root = \"shop\"\n",
    );

    let status = kissify(temp_dir.path())
        .args(["-o", "out", "src/widgets/menu.js", "src/app.js"])
        .status()
        .expect("Failed to run kissify");
    assert!(status.success());

    let menu = fs::read_to_string(temp_dir.path().join("out/menu.js")).expect("menu output");
    assert!(menu.starts_with("KISSY.add(\"shop/widgets/menu\""), "{menu}");
    assert!(menu.contains("\"./menu.css\""), "{menu}");

    let app = fs::read_to_string(temp_dir.path().join("out/app.js")).expect("app output");
    assert!(app.starts_with("KISSY.add(\"shop/app\""), "{app}");
    assert!(app.contains("menu"), "{app}");
}

#[test]
fn test_failing_input_does_not_block_others() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "esm.js", "import a from \"./a\";\n");
    write(temp_dir.path(), "cjs.js", "require(\"./a\");\n");

    let output = kissify(temp_dir.path())
        .args(["-o", "out", "esm.js", "cjs.js"])
        .output()
        .expect("Failed to run kissify");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("esm.js"), "{stderr}");
    assert!(stderr.contains("1 of 2 modules failed"), "{stderr}");
    assert!(temp_dir.path().join("out/cjs.js").exists());
    assert!(!temp_dir.path().join("out/esm.js").exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "a.js", "require(\"./b\");\n");
    write(temp_dir.path(), "kissify.toml", "[names]\nnamespace = \"not valid\"\n");

    let output = kissify(temp_dir.path())
        .arg("a.js")
        .output()
        .expect("Failed to run kissify");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("names.namespace"), "{stderr}");
}

#[test]
fn test_inputs_sharing_a_stem_are_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "src/a/index.js", "require(\"./x\");\n");
    write(temp_dir.path(), "src/b/index.js", "require(\"./y\");\n");

    let output = kissify(temp_dir.path())
        .args(["-o", "out", "src/a/index.js", "src/b/index.js"])
        .output()
        .expect("Failed to run kissify");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("src/a/index.js"), "{stderr}");
    assert!(stderr.contains("src/b/index.js"), "{stderr}");
    assert!(!temp_dir.path().join("out/index.js").exists());
}

#[test]
fn test_module_ids_resolve_parent_components() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "src/widgets/menu.js", "require(\"./a\");\n");
    write(temp_dir.path(), "lib/util.js", "require(\"./b\");\n");
    write(
        temp_dir.path(),
        "kissify.toml",
        "[module-ids]\nenabled = true\nsource-root = \"src\"\n",
    );

    let output = kissify(temp_dir.path())
        .args(["lib/../src/widgets/menu.js"])
        .output()
        .expect("Failed to run kissify");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("KISSY.add(\"widgets/menu\""), "{stdout}");

    let output = kissify(temp_dir.path())
        .args(["src/../lib/util.js"])
        .output()
        .expect("Failed to run kissify");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("KISSY.add(function"), "{stdout}");
}

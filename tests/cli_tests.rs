//! Integration tests for the tfimport CLI
//!
//! These tests run the built binary end-to-end.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const STATE: &str = r#"{
  "version": 4,
  "terraform_version": "1.5.7",
  "resources": [
    {
      "mode": "managed",
      "type": "onelogin_apps",
      "name": "payroll",
      "provider": "provider[\"registry.terraform.io/onelogin/onelogin\"]",
      "instances": [
        {
          "schema_version": 0,
          "attributes": {
            "id": "101",
            "name": "Payroll",
            "connectorId": 7,
            "visible": true,
            "tags": ["hr", "finance"],
            "parameters": [
              {"paramKeyName": "email", "userAttributeMappings": "_macro_"}
            ],
            "description": null
          }
        }
      ]
    }
  ]
}"#;

const MANIFEST: &str = "onelogin_apps:\n  - type: onelogin_apps\n    name: payroll\n    provider: onelogin\n    import_id: \"101\"\n";

/// Run tfimport and return output
fn run_tfimport(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tfimport"))
        .args(args)
        .output()
        .expect("Failed to execute tfimport")
}

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_tfimport_version() {
    let output = run_tfimport(&["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("tfimport"));
}

#[test]
fn test_tfimport_help() {
    let output = run_tfimport(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("import"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("scan"));
}

#[test]
fn test_tfimport_import_help() {
    let output = run_tfimport(&["import", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--auto-approve"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--source"));
}

#[test]
fn test_tfimport_invalid_command() {
    let output = run_tfimport(&["nonexistent"]);

    assert!(!output.status.success());
}

#[test]
fn test_render_state_to_stdout() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "terraform.tfstate", STATE);

    let output = run_tfimport(&["render", "-C", temp.path().to_str().unwrap()]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "provider onelogin {\n\talias = \"onelogin\"\n}\n\n\
         resource onelogin_apps payroll {\n\
         \tprovider = onelogin\n\
         \tname = \"Payroll\"\n\
         \tconnector_id = 7\n\
         \tvisible = true\n\
         \ttags = [\"hr\", \"finance\"]\n\
         \n\
         \tparameters {\n\
         \t\tparam_key_name = \"email\"\n\
         \t\tuser_attribute_mappings = \"_macro_\"\n\
         \t}\n\
         }\n\n"
    );
}

#[test]
fn test_render_missing_state_fails() {
    let temp = TempDir::new().unwrap();

    let output = run_tfimport(&["render", "-C", temp.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unable to read state file"));
}

#[test]
fn test_scan_lists_resources() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "main.tf",
        "provider onelogin {\n}\nresource \"onelogin_apps\" \"payroll\" {\n}\n",
    );

    let output = run_tfimport(&["scan", "-C", temp.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("onelogin_apps.payroll"));
    assert!(stdout.contains("onelogin"));
}

#[test]
fn test_import_without_source_fails() {
    let temp = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tfimport"))
        .args(["import", "onelogin_apps", "-C", temp.path().to_str().unwrap()])
        .env_remove("TFIMPORT_SOURCE")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No resource source configured"));
}

#[test]
fn test_import_dry_run_leaves_plan_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "resources.yaml", MANIFEST);
    write(temp.path(), "main.tf", "");

    let output = run_tfimport(&[
        "import",
        "onelogin_apps",
        "--dry-run",
        "--source",
        temp.path().join("resources.yaml").to_str().unwrap(),
        "-C",
        temp.path().to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("onelogin_apps.payroll"));
    assert_eq!(std::fs::read_to_string(temp.path().join("main.tf")).unwrap(), "");
}

/// Full run against a stand-in `terraform` that accepts every command
#[cfg(unix)]
#[test]
fn test_import_end_to_end_with_stub_state_tool() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    std::fs::create_dir(&bin).unwrap();
    let stub = bin.join("terraform");
    std::fs::write(&stub, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

    write(temp.path(), "resources.yaml", MANIFEST);
    write(temp.path(), "terraform.tfstate", STATE);

    let path = format!(
        "{}:{}",
        bin.display(),
        std::env::var("PATH").unwrap_or_default()
    );
    let run = || {
        Command::new(env!("CARGO_BIN_EXE_tfimport"))
            .args([
                "import",
                "onelogin_apps",
                "--auto-approve",
                "--source",
                temp.path().join("resources.yaml").to_str().unwrap(),
                "-C",
                temp.path().to_str().unwrap(),
            ])
            .env("PATH", &path)
            .output()
            .unwrap()
    };

    let first = run();
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    let generated = std::fs::read_to_string(temp.path().join("main.tf")).unwrap();
    assert!(generated.contains("resource onelogin_apps payroll {\n\tprovider = onelogin\n"));

    let second = run();
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stdout).contains("No new resources to import from remote"));
    assert_eq!(std::fs::read_to_string(temp.path().join("main.tf")).unwrap(), generated);
}

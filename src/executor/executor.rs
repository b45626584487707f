use anyhow::Result;
use std::path::Path;
use std::process::Output;

use crate::import::ImportError;
use crate::traits::CommandExecutor;

/// Trait for state tools that can adopt existing resources (Terraform, OpenTofu)
pub trait Executor: Send + Sync {
    /// Check if the tool is installed and available
    /// Runs the version command to verify
    fn check_installed(&self) -> Result<bool>;

    /// Initialize the working directory (`init`)
    fn init(&self, working_dir: &Path) -> Result<()>;

    /// Adopt an existing remote object into state under `address`
    fn import(&self, address: &str, import_id: &str, working_dir: &Path) -> Result<()>;

    /// Get the name of this executor (e.g., "opentofu", "terraform")
    fn get_name(&self) -> &str;

    /// Binary invoked for every command
    fn binary(&self) -> &str;
}

/// Run `binary args..` and turn a non-zero exit into `ImportError::ExecutorFailed`
pub(crate) fn run_checked(
    command: &dyn CommandExecutor,
    binary: &str,
    args: &[&str],
    working_dir: &Path,
) -> Result<Output> {
    let output = command.execute(binary, args, working_dir)?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        log::debug!("{}", stdout.trim());
    }

    if !output.status.success() {
        return Err(ImportError::ExecutorFailed {
            command: format!("{} {}", binary, args.join(" ")),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    Ok(output)
}

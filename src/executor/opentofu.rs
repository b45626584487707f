use super::executor::{run_checked, Executor};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::traits::CommandExecutor;

/// Shared implementation for CLIs that speak the Terraform command surface
struct StateToolCli {
    name: &'static str,
    binary: &'static str,
    command: Arc<dyn CommandExecutor>,
}

impl StateToolCli {
    fn check_installed(&self) -> Result<bool> {
        // Command not found or failed to execute both mean "not installed"
        match self.command.execute(self.binary, &["version"], Path::new(".")) {
            Ok(output) => Ok(output.status.success()),
            Err(_) => Ok(false),
        }
    }

    fn init(&self, working_dir: &Path) -> Result<()> {
        log::info!("Initializing with '{} init'...", self.binary);
        run_checked(self.command.as_ref(), self.binary, &["init", "-input=false"], working_dir)?;
        Ok(())
    }

    fn import(&self, address: &str, import_id: &str, working_dir: &Path) -> Result<()> {
        run_checked(
            self.command.as_ref(),
            self.binary,
            &["import", "-input=false", address, import_id],
            working_dir,
        )?;
        Ok(())
    }
}

/// OpenTofu executor implementation
pub struct OpenTofuExecutor {
    cli: StateToolCli,
}

impl OpenTofuExecutor {
    pub fn new(command: Arc<dyn CommandExecutor>) -> Self {
        Self {
            cli: StateToolCli {
                name: "opentofu",
                binary: "tofu",
                command,
            },
        }
    }
}

impl Executor for OpenTofuExecutor {
    fn check_installed(&self) -> Result<bool> {
        self.cli.check_installed()
    }

    fn init(&self, working_dir: &Path) -> Result<()> {
        self.cli.init(working_dir)
    }

    fn import(&self, address: &str, import_id: &str, working_dir: &Path) -> Result<()> {
        self.cli.import(address, import_id, working_dir)
    }

    fn get_name(&self) -> &str {
        self.cli.name
    }

    fn binary(&self) -> &str {
        self.cli.binary
    }
}

/// Terraform executor implementation
pub struct TerraformExecutor {
    cli: StateToolCli,
}

impl TerraformExecutor {
    pub fn new(command: Arc<dyn CommandExecutor>) -> Self {
        Self {
            cli: StateToolCli {
                name: "terraform",
                binary: "terraform",
                command,
            },
        }
    }
}

impl Executor for TerraformExecutor {
    fn check_installed(&self) -> Result<bool> {
        self.cli.check_installed()
    }

    fn init(&self, working_dir: &Path) -> Result<()> {
        self.cli.init(working_dir)
    }

    fn import(&self, address: &str, import_id: &str, working_dir: &Path) -> Result<()> {
        self.cli.import(address, import_id, working_dir)
    }

    fn get_name(&self) -> &str {
        self.cli.name
    }

    fn binary(&self) -> &str {
        self.cli.binary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportError;
    use crate::traits::{MockCommandExecutor, MockCommandResult};

    #[test]
    fn test_import_runs_binary_with_address_and_id() {
        let command = Arc::new(MockCommandExecutor::new());
        let executor = OpenTofuExecutor::new(command.clone());

        executor.init(Path::new("/work")).unwrap();
        executor.import("app.x", "42", Path::new("/work")).unwrap();

        assert_eq!(
            command.calls(),
            vec!["tofu init -input=false", "tofu import -input=false app.x 42"]
        );
    }

    #[test]
    fn test_failed_import_is_executor_error() {
        let command = Arc::new(MockCommandExecutor::with_outputs(vec![MockCommandResult::failure(
            "terraform import",
            1,
            "Error: Cannot import non-existent remote object\n",
        )]));
        let executor = TerraformExecutor::new(command);

        let err = executor.import("app.x", "42", Path::new(".")).unwrap_err();
        match err.downcast_ref::<ImportError>() {
            Some(ImportError::ExecutorFailed {
                command,
                exit_code,
                stderr,
            }) => {
                assert_eq!(command, "terraform import -input=false app.x 42");
                assert_eq!(*exit_code, Some(1));
                assert_eq!(stderr, "Error: Cannot import non-existent remote object");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_check_installed() {
        let command = Arc::new(MockCommandExecutor::with_outputs(vec![MockCommandResult::failure(
            "tofu version",
            127,
            "not found",
        )]));
        let tofu = OpenTofuExecutor::new(command.clone());
        let terraform = TerraformExecutor::new(command);

        assert!(!tofu.check_installed().unwrap());
        assert!(terraform.check_installed().unwrap());
        assert_eq!(tofu.get_name(), "opentofu");
        assert_eq!(terraform.binary(), "terraform");
    }
}

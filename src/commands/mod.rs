pub mod import;
pub mod render;
pub mod scan;

pub use import::ImportCommand;
pub use render::RenderCommand;
pub use scan::ScanCommand;

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::ImportConfig;
use crate::traits::FileSystem;

/// Options shared by every command that reads `.tfimport.yaml`
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Config file (defaults to .tfimport.yaml in the working directory)
    #[arg(short, long, env = "TFIMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory the state tool runs in
    #[arg(short = 'C', long, env = "TFIMPORT_WORKING_DIR")]
    working_dir: Option<PathBuf>,

    /// HCL file scanned and rewritten, relative to the working directory
    #[arg(long, env = "TFIMPORT_PLAN_FILE")]
    plan_file: Option<PathBuf>,

    /// State file read after import, relative to the working directory
    #[arg(long, env = "TFIMPORT_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// State tool: terraform, opentofu or tofu
    #[arg(short, long, env = "TFIMPORT_EXECUTOR")]
    executor: Option<String>,
}

impl SettingsArgs {
    /// Config file values, overridden by flags and environment
    pub fn load(&self, fs: &dyn FileSystem) -> Result<ImportConfig> {
        let lookup_dir = self.working_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let mut config = ImportConfig::discover(fs, self.config.as_deref(), &lookup_dir)?;

        if let Some(working_dir) = &self.working_dir {
            config.working_dir = working_dir.clone();
        }
        if let Some(plan_file) = &self.plan_file {
            config.plan_file = plan_file.clone();
        }
        if let Some(state_file) = &self.state_file {
            config.state_file = state_file.clone();
        }
        if let Some(executor) = &self.executor {
            config.executor = executor.clone();
        }

        log::debug!("Effective config: {:?}", config);
        Ok(config)
    }
}

use anyhow::{Context as _, Result};
use clap::Args;
use std::path::PathBuf;

use super::SettingsArgs;
use crate::context::Context;
use crate::import::{Reconciler, StateParser};

/// Convert a state file to HCL without touching the plan file
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// State file (defaults to the configured state file)
    state: Option<PathBuf>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit a terraform { required_providers } block
    #[arg(long)]
    required_providers: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

impl RenderCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let mut config = self.settings.load(ctx.fs.as_ref())?;
        if self.required_providers {
            config.required_providers = true;
        }

        let state_path = self.state.unwrap_or_else(|| config.state_path());
        let snapshot = StateParser::new(&state_path).parse(ctx.fs.as_ref())?;
        let rendered = Reconciler::new(&config).render(&snapshot);

        for diagnostic in &rendered.diagnostics {
            ctx.output.warning(&format!("Skipped {}", diagnostic));
        }

        match self.output {
            Some(path) => {
                ctx.fs
                    .write(&path, &rendered.text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                ctx.output.success(&format!(
                    "Rendered {} resources to {}",
                    snapshot.resources.len(),
                    path.display()
                ));
            }
            None => print!("{}", rendered.text),
        }

        Ok(())
    }
}

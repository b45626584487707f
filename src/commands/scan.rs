use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::SettingsArgs;
use crate::context::Context;
use crate::hcl::scan_str;

/// List the provider and resource declarations found in the plan file
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// File to scan (defaults to the configured plan file)
    file: Option<PathBuf>,

    #[command(flatten)]
    settings: SettingsArgs,
}

impl ScanCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let config = self.settings.load(ctx.fs.as_ref())?;
        let path = self.file.unwrap_or_else(|| config.plan_path());

        let index = scan_str(&ctx.fs.read_to_string(&path)?);
        if index.is_empty() {
            ctx.output
                .info(&format!("No declarations found in {}", path.display()));
            return Ok(());
        }

        ctx.output.section("Providers");
        for provider in index.provider_names() {
            ctx.output.list_item(provider);
        }

        ctx.output.section("Resources");
        for address in index.resource_addresses() {
            ctx.output.list_item(address);
        }

        for duplicate in index.duplicate_resources() {
            ctx.output
                .warning(&format!("{} is declared more than once", duplicate));
        }

        Ok(())
    }
}

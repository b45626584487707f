use anyhow::{Context as _, Result};
use clap::Args;

use super::SettingsArgs;
use crate::context::Context;
use crate::import::{ManifestImporter, ManifestLocation, Outcome, PlanFile, Reconciler};

/// Import remote resources of one kind and rewrite the plan file from state
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Resource kind to import, e.g. onelogin_apps
    kind: String,

    /// Import only the resource with this id
    #[arg(long)]
    id: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    auto_approve: bool,

    /// Show what would be imported without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Manifest of remote definitions (path or http(s) URL)
    #[arg(short, long, env = "TFIMPORT_SOURCE")]
    source: Option<String>,

    /// Bearer token for URL sources
    #[arg(long, env = "TFIMPORT_SOURCE_TOKEN", hide_env_values = true)]
    source_token: Option<String>,

    #[command(flatten)]
    settings: SettingsArgs,
}

impl ImportCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let mut config = self.settings.load(ctx.fs.as_ref())?;
        if self.auto_approve {
            config.auto_approve = true;
        }
        if self.source.is_some() {
            config.source = self.source;
        }
        if self.source_token.is_some() {
            config.source_token = self.source_token;
        }

        let source = config.source.as_deref().context(
            "No resource source configured (pass --source or set `source` in .tfimport.yaml)",
        )?;
        let importer = ManifestImporter::new(
            &self.kind,
            ManifestLocation::parse(source),
            ctx.fs.as_ref(),
            ctx.http.as_ref(),
        )
        .with_token(config.source_token.clone());

        let plan_path = config.plan_path();
        let mut plan_file = PlanFile::open(&plan_path)?;

        let result = Reconciler::new(&config)
            .with_dry_run(self.dry_run)
            .run(ctx, &mut plan_file, &importer, self.id.as_deref());
        let closed = plan_file.close();
        let outcome = result?;
        closed?;

        match outcome {
            Outcome::Imported { count, diagnostics } => {
                ctx.output.success(&format!(
                    "Imported {} resources into {}",
                    count,
                    plan_path.display()
                ));
                if !diagnostics.is_empty() {
                    ctx.output.dimmed(&format!(
                        "{} attributes could not be written; add them by hand",
                        diagnostics.len()
                    ));
                }
            }
            Outcome::DryRun { planned } => {
                ctx.output
                    .info(&format!("Dry run: {} resources would be imported", planned));
            }
            Outcome::NothingToImport | Outcome::Aborted => {}
        }

        Ok(())
    }
}

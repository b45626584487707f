//! Reconciles remote definitions with the plan file
//!
//! A run scans the plan file for existing declarations, plans the new ones,
//! appends skeleton blocks so the state tool accepts `import`, imports each
//! resource and finally rewrites the plan file from the resulting state.

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::io::{Read, Seek, Write};

use super::definition::{disambiguate, sanitize_identifier, ResourceDefinition};
use super::importer::Importable;
use super::plan_file::{PlanFile, Truncate};
use super::shape::AttributeShaper;
use super::state_parser::{StateParser, StateSnapshot};
use crate::config::ImportConfig;
use crate::context::Context;
use crate::hcl::{quote, scan_str, DeclarationIndex, Diagnostic, HclWriter};

/// Definitions that are not declared yet, plus the providers they need
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub resources: Vec<ResourceDefinition>,
    /// Provider names in first-seen order
    pub providers: Vec<String>,
}

impl ImportPlan {
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Placeholder declarations appended before the state tool runs
    pub fn skeleton(&self) -> String {
        let mut out = String::new();
        for provider in &self.providers {
            out.push_str(&provider_block(provider));
        }
        for resource in &self.resources {
            out.push_str(&format!(
                "resource {} {} {{}}\n",
                resource.resource_type, resource.name
            ));
        }
        out
    }
}

/// Generated HCL and the keys that could not be rendered
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every remote definition is already declared
    NothingToImport,
    /// The operator declined the confirmation
    Aborted,
    /// Planned only; nothing was changed
    DryRun { planned: usize },
    Imported {
        count: usize,
        diagnostics: Vec<Diagnostic>,
    },
}

pub struct Reconciler<'a> {
    config: &'a ImportConfig,
    dry_run: bool,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sanitize and disambiguate the whole remote batch, then keep what the
    /// index does not declare yet.
    ///
    /// Disambiguating before filtering keeps renamed identities stable, so a
    /// second run over the generated file finds every definition declared.
    pub fn plan(&self, remote: Vec<ResourceDefinition>, index: &DeclarationIndex) -> ImportPlan {
        let sanitized = remote
            .into_iter()
            .map(|mut definition| {
                definition.resource_type = sanitize_identifier(&definition.resource_type);
                definition.name = sanitize_identifier(&definition.name);
                definition
            })
            .collect();

        let resources: Vec<ResourceDefinition> = disambiguate(sanitized)
            .into_iter()
            .filter(|definition| {
                let declared = index.has_resource(&definition.address());
                if declared {
                    log::debug!("{} already declared", definition.address());
                }
                !declared
            })
            .collect();

        let mut seen = HashSet::new();
        let providers = resources
            .iter()
            .map(|definition| definition.provider.as_str())
            .filter(|provider| !provider.is_empty() && !index.has_provider(provider))
            .filter(|provider| seen.insert(*provider))
            .map(str::to_string)
            .collect();

        ImportPlan {
            resources,
            providers,
        }
    }

    /// Render the whole plan file from a state snapshot
    pub fn render(&self, snapshot: &StateSnapshot) -> Rendered {
        let shaper = AttributeShaper::new(self.config);
        let mut writer = HclWriter::new();

        if self.config.required_providers {
            writer.push_str(&required_providers_block(snapshot));
        }

        let mut known_providers = HashSet::new();
        for resource in &snapshot.resources {
            if resource.is_data_source() {
                log::debug!("Skipping data source {}", resource.address());
                continue;
            }

            let provider = resource.provider_ref().name;
            if !provider.is_empty() && known_providers.insert(provider.clone()) {
                writer.push_str(&provider_block(&provider));
            }

            let address = resource.address();
            for (idx, instance) in resource.instances.iter().enumerate() {
                let scope = if resource.instances.len() > 1 {
                    format!("{}[{}]", address, idx)
                } else {
                    address.clone()
                };

                writer.push_str(&format!(
                    "resource {} {} {{\n",
                    resource.resource_type, resource.name
                ));
                if !provider.is_empty() {
                    writer.push_str(&format!("\tprovider = {}\n", provider));
                }

                match shaper.shape(&resource.resource_type, &instance.attributes) {
                    Some(attributes) => writer.write_attributes(&attributes, 1, &scope),
                    None if instance.attributes.is_null() => {}
                    None => writer.report(scope, "instance attributes are not an object"),
                }

                writer.push_str("}\n\n");
            }

            writer.push_str(resource.trailing_content());
        }

        let (text, diagnostics) = writer.finish();
        Rendered { text, diagnostics }
    }

    /// Full reconciliation against `plan_file`.
    ///
    /// The caller owns the plan file and closes it whatever the result.
    pub fn run<H: Read + Write + Seek + Truncate>(
        &self,
        ctx: &Context,
        plan_file: &mut PlanFile<H>,
        importer: &dyn Importable,
        search_id: Option<&str>,
    ) -> Result<Outcome> {
        let index = scan_str(&plan_file.read_to_string()?);
        for duplicate in index.duplicate_resources() {
            ctx.output
                .warning(&format!("{} is declared more than once", duplicate));
        }

        let remote = importer.import_from_remote(search_id)?;
        log::info!("{} definitions returned for {}", remote.len(), importer.kind());

        let plan = self.plan(remote, &index);
        if plan.is_empty() {
            ctx.output.info("No new resources to import from remote");
            return Ok(Outcome::NothingToImport);
        }

        ctx.output.section("Resources to import");
        for definition in &plan.resources {
            ctx.output.list_item(&format!(
                "{} (id: {})",
                definition.address(),
                definition.import_id
            ));
        }
        for provider in &plan.providers {
            ctx.output.key_value("New provider", provider);
        }
        ctx.output.blank();

        if self.dry_run {
            return Ok(Outcome::DryRun {
                planned: plan.len(),
            });
        }

        if !self.config.auto_approve {
            let prompt = format!(
                "This will import {} resources. Do you want to continue?",
                plan.len()
            );
            if !ctx.input.confirm(&prompt, false)? {
                ctx.output.info("User aborted operation!");
                return Ok(Outcome::Aborted);
            }
        }

        let executor = ctx.executor_registry.get(&self.config.executor)?;
        if !executor.check_installed()? {
            bail!(
                "{} is not installed or not on PATH (looked for '{}')",
                executor.get_name(),
                executor.binary()
            );
        }

        plan_file.append(&plan.skeleton())?;

        let working_dir = &self.config.working_dir;
        executor.init(working_dir)?;
        for definition in &plan.resources {
            log::info!(
                "Importing {} ({})",
                definition.address(),
                definition.import_id
            );
            executor.import(&definition.address(), &definition.import_id, working_dir)?;
        }

        let snapshot = StateParser::new(&self.config.state_path()).parse(ctx.fs.as_ref())?;
        let rendered = self.render(&snapshot);
        plan_file.overwrite(&rendered.text)?;

        for diagnostic in &rendered.diagnostics {
            ctx.output.warning(&format!("Skipped {}", diagnostic));
        }

        Ok(Outcome::Imported {
            count: plan.len(),
            diagnostics: rendered.diagnostics,
        })
    }
}

fn provider_block(name: &str) -> String {
    format!("provider {} {{\n\talias = \"{}\"\n}}\n\n", name, name)
}

/// `terraform { required_providers { .. } }` for providers whose state
/// address names a registry source
fn required_providers_block(snapshot: &StateSnapshot) -> String {
    let mut seen = HashSet::new();
    let entries: Vec<String> = snapshot
        .resources
        .iter()
        .map(|resource| resource.provider_ref())
        .filter_map(|provider| provider.source.map(|source| (provider.name, source)))
        .filter(|(name, _)| seen.insert(name.clone()))
        .map(|(name, source)| {
            format!(
                "\t\t{} = {{\n\t\t\tsource = {}\n\t\t}}\n",
                name,
                quote(&source)
            )
        })
        .collect();

    if entries.is_empty() {
        return String::new();
    }

    format!(
        "terraform {{\n\trequired_providers {{\n{}\t}}\n}}\n\n",
        entries.concat()
    )
}

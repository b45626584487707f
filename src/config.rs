use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::traits::FileSystem;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".tfimport.yaml";

/// Everything a reconciliation run needs, built once and passed down
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Directory the state tool runs in; relative paths resolve against it
    pub working_dir: PathBuf,

    /// HCL file that is scanned and rewritten
    pub plan_file: PathBuf,

    /// State file read after import
    pub state_file: PathBuf,

    /// Registered executor name (`terraform` or `opentofu`)
    pub executor: String,

    /// Skip the confirmation prompt
    pub auto_approve: bool,

    /// Emit a `terraform { required_providers { ... } }` block
    pub required_providers: bool,

    /// Attributes dropped from every resource (computed fields)
    pub exclude_attributes: Vec<String>,

    /// Per resource type attribute rules
    pub shapes: BTreeMap<String, ShapeRule>,

    /// Manifest path or URL the importer reads definitions from
    pub source: Option<String>,

    /// Bearer token sent to URL sources
    #[serde(skip_serializing)]
    pub source_token: Option<String>,
}

/// Attribute filter for one resource type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeRule {
    /// When non-empty, only these attributes are kept
    pub include: Vec<String>,
    /// Attributes dropped in addition to the global list
    pub exclude: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            plan_file: PathBuf::from("main.tf"),
            state_file: PathBuf::from("terraform.tfstate"),
            executor: "terraform".to_string(),
            auto_approve: false,
            required_providers: false,
            exclude_attributes: vec!["id".to_string()],
            shapes: BTreeMap::new(),
            source: None,
            source_token: None,
        }
    }
}

impl ImportConfig {
    /// Load configuration from a YAML file
    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs.read_to_string(path)?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load `path` if given, else `.tfimport.yaml` in `working_dir` when present,
    /// else defaults
    pub fn discover(fs: &dyn FileSystem, path: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = path {
            log::debug!("Loading config from {}", path.display());
            return Self::from_file(fs, path);
        }

        let default_path = working_dir.join(CONFIG_FILE_NAME);
        if fs.exists(&default_path) {
            log::debug!("Loading config from {}", default_path.display());
            return Self::from_file(fs, &default_path);
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    pub fn plan_path(&self) -> PathBuf {
        self.resolve(&self.plan_file)
    }

    pub fn state_path(&self) -> PathBuf {
        self.resolve(&self.state_file)
    }

    /// Rule for a resource type, if any
    pub fn shape_for(&self, resource_type: &str) -> Option<&ShapeRule> {
        self.shapes.get(resource_type)
    }
}

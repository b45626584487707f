use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::error::{ImportError, Result};
use crate::traits::FileSystem;

/// In-memory representation of a Terraform/OpenTofu state file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// State format version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,

    #[serde(default)]
    pub resources: Vec<StateResource>,
}

/// A resource recorded in state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateResource {
    /// `managed` or `data`
    #[serde(default)]
    pub mode: String,

    pub name: String,

    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default)]
    pub provider: String,

    #[serde(default)]
    pub instances: Vec<ResourceInstance>,

    /// Text emitted verbatim after this resource's generated blocks
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,

    /// Same passthrough text in its base64 byte-array form
    #[serde(
        default,
        rename = "Content",
        deserialize_with = "decode_base64_text",
        skip_serializing
    )]
    encoded_content: String,
}

fn decode_base64_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use base64::Engine as _;
    use serde::de::Error as _;

    let Some(encoded) = Option::<String>::deserialize(deserializer)? else {
        return Ok(String::new());
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map_err(D::Error::custom)?;
    String::from_utf8(bytes).map_err(D::Error::custom)
}

/// One instance of a resource; the attribute tree keeps its key order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceInstance {
    #[serde(default)]
    pub attributes: Value,
}

/// Provider referenced by a state resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRef {
    /// Local provider name, e.g. `aws`
    pub name: String,
    /// Registry source, e.g. `hashicorp/aws`, when the address carries one
    pub source: Option<String>,
}

const PUBLIC_REGISTRIES: [&str; 2] = ["registry.terraform.io", "registry.opentofu.org"];

impl StateResource {
    /// `TYPE.NAME`
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }

    pub fn provider_ref(&self) -> ProviderRef {
        parse_provider(&self.provider)
    }

    /// Passthrough text for this resource; a plain `content` wins over `Content`
    pub fn trailing_content(&self) -> &str {
        if self.content.is_empty() {
            &self.encoded_content
        } else {
            &self.content
        }
    }

    /// Data sources are read-only and never declared as resources
    pub fn is_data_source(&self) -> bool {
        self.mode == "data"
    }
}

impl StateSnapshot {
    /// Decode state JSON
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn instance_count(&self) -> usize {
        self.resources.iter().map(|r| r.instances.len()).sum()
    }
}

/// Parse a provider address as written in state.
///
/// Handles the legacy `provider.aws` / `provider.aws.west` form and the
/// current `provider["registry.terraform.io/hashicorp/aws"]` form, including
/// module prefixes and alias suffixes.
pub fn parse_provider(provider: &str) -> ProviderRef {
    if let Some(pos) = provider.rfind("provider[\"") {
        let quoted = &provider[pos + "provider[\"".len()..];
        let address = quoted.split('"').next().unwrap_or_default();
        let name = address.rsplit('/').next().unwrap_or(address).to_string();
        return ProviderRef {
            name,
            source: source_from_address(address),
        };
    }

    let name = match provider.rfind("provider.") {
        Some(pos) => provider[pos + "provider.".len()..]
            .split('.')
            .next()
            .unwrap_or_default(),
        None => provider,
    };

    ProviderRef {
        name: name.to_string(),
        source: None,
    }
}

fn source_from_address(address: &str) -> Option<String> {
    let parts: Vec<&str> = address.split('/').collect();
    match parts.as_slice() {
        [host, namespace, name] if PUBLIC_REGISTRIES.contains(host) => {
            Some(format!("{}/{}", namespace, name))
        }
        [_, _, _] => Some(address.to_string()),
        [namespace, name] => Some(format!("{}/{}", namespace, name)),
        _ => None,
    }
}

/// Reads the state file the state tool leaves behind after import
pub struct StateParser {
    state_path: PathBuf,
}

impl StateParser {
    pub fn new(state_path: &Path) -> Self {
        Self {
            state_path: state_path.to_path_buf(),
        }
    }

    /// Read and decode the state file
    pub fn parse(&self, fs: &dyn FileSystem) -> Result<StateSnapshot> {
        log::info!("Collecting state from {}", self.state_path.display());

        let content = fs
            .read_to_string(&self.state_path)
            .map_err(|e| ImportError::StateRead {
                path: self.state_path.clone(),
                reason: format!("{:#}", e),
            })?;

        let snapshot = StateSnapshot::from_json(&content).map_err(|source| ImportError::StateDecode {
            path: self.state_path.clone(),
            source,
        })?;

        log::debug!(
            "Decoded {} resources ({} instances)",
            snapshot.resources.len(),
            snapshot.instance_count()
        );

        Ok(snapshot)
    }
}

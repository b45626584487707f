use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A remote resource slated for import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Resource type, e.g. `onelogin_apps`
    #[serde(rename = "type", alias = "Type")]
    pub resource_type: String,

    /// Resource name; `type.name` is the declaration identity
    #[serde(alias = "Name")]
    pub name: String,

    /// Provider alias the resource is declared under
    #[serde(default, alias = "Provider")]
    pub provider: String,

    /// Identifier passed to the state tool's import command
    #[serde(alias = "ImportID", alias = "importId")]
    pub import_id: String,
}

impl ResourceDefinition {
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
        import_id: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            provider: provider.into(),
            import_id: import_id.into(),
        }
    }

    /// The `TYPE.NAME` address used in HCL and by the state tool
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

/// Make a name usable as an HCL block label and by the declaration scanner.
///
/// Characters outside `[A-Za-z0-9_-]` become `_`; a leading digit gets a `_`
/// prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }

    out
}

/// Give every definition in the batch a unique `type.name`.
///
/// The first definition with a given address keeps its name. Each later one is
/// renamed `_<name>_<n>`, where `n` counts collisions for that address starting
/// at 0 and skips any candidate already used in the batch. Output order and
/// length match the input.
pub fn disambiguate(definitions: Vec<ResourceDefinition>) -> Vec<ResourceDefinition> {
    let mut taken: HashSet<String> = definitions.iter().map(ResourceDefinition::address).collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(definitions.len());
    let mut collisions: HashMap<String, usize> = HashMap::new();

    definitions
        .into_iter()
        .map(|mut definition| {
            let address = definition.address();
            if seen.insert(address.clone()) {
                return definition;
            }

            let counter = collisions.entry(address.clone()).or_insert(0);
            let renamed = loop {
                let candidate = format!("_{}_{}", definition.name, counter);
                *counter += 1;
                let candidate_address = format!("{}.{}", definition.resource_type, candidate);
                if taken.insert(candidate_address.clone()) {
                    seen.insert(candidate_address);
                    break candidate;
                }
            };

            log::info!("Renaming duplicate {} to {}.{}", address, definition.resource_type, renamed);
            definition.name = renamed;
            definition
        })
        .collect()
}

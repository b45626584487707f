//! Test helpers for creating state files and remote definitions
//!
//! `StateBuilder` produces state JSON in the layout the state tool writes
//! after `import`, so reconciliation tests can stand in for a real run.

#![cfg(test)]

use crate::import::{Importable, ImportError, ResourceDefinition};
use crate::traits::{FileSystem, MockFileSystem};
use serde_json::{json, Value};
use std::path::Path;

/// Builder for a version 4 state document
pub struct StateBuilder {
    resources: Vec<Value>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    /// Add a managed resource with a single instance.
    ///
    /// `provider` is the local provider name; the address is written in the
    /// registry form `provider["registry.terraform.io/<provider>/<provider>"]`.
    pub fn resource(self, resource_type: &str, name: &str, provider: &str, attributes: Value) -> Self {
        self.resource_with_provider_address(
            resource_type,
            name,
            &format!(
                "provider[\"registry.terraform.io/{}/{}\"]",
                provider, provider
            ),
            attributes,
        )
    }

    /// Add a managed resource with a verbatim provider address
    pub fn resource_with_provider_address(
        mut self,
        resource_type: &str,
        name: &str,
        provider_address: &str,
        attributes: Value,
    ) -> Self {
        self.resources.push(json!({
            "mode": "managed",
            "type": resource_type,
            "name": name,
            "provider": provider_address,
            "instances": [
                { "schema_version": 0, "attributes": attributes }
            ]
        }));
        self
    }

    /// Attach a raw JSON field (e.g. `content`) to the last added resource
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        if let Some(Value::Object(resource)) = self.resources.last_mut() {
            resource.insert(key.to_string(), value);
        }
        self
    }

    pub fn build(&self) -> String {
        json!({
            "version": 4,
            "terraform_version": "1.5.7",
            "serial": 1,
            "resources": self.resources,
        })
        .to_string()
    }

    /// Write the state JSON to `path` on the mock filesystem
    pub fn write_to(&self, fs: &MockFileSystem, path: &Path) {
        fs.write(path, &self.build()).unwrap();
    }
}

/// Importer returning a fixed batch of definitions
pub struct StaticImporter {
    pub definitions: Vec<ResourceDefinition>,
}

impl StaticImporter {
    pub fn new(definitions: Vec<ResourceDefinition>) -> Self {
        Self { definitions }
    }
}

impl Importable for StaticImporter {
    fn kind(&self) -> &str {
        "static"
    }

    fn import_from_remote(&self, search_id: Option<&str>) -> Result<Vec<ResourceDefinition>, ImportError> {
        Ok(self
            .definitions
            .iter()
            .filter(|d| search_id.is_none_or(|id| d.import_id == id))
            .cloned()
            .collect())
    }
}

/// `onelogin_apps` definition with an import id derived from the name
pub fn app(name: &str) -> ResourceDefinition {
    ResourceDefinition::new("onelogin_apps", name, "onelogin", format!("{}-id", name))
}

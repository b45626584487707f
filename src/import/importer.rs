use anyhow::{Context, Result as AnyResult, bail};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::definition::ResourceDefinition;
use super::error::{ImportError, Result};
use crate::traits::FileSystem;

/// Source of remote resource definitions for one resource kind
pub trait Importable {
    /// Resource kind selector, e.g. `onelogin_apps`
    fn kind(&self) -> &str;

    /// Fetch definitions, optionally restricted to a single import id
    fn import_from_remote(&self, search_id: Option<&str>) -> Result<Vec<ResourceDefinition>>;
}

/// HTTP client trait for testing
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str, bearer_token: Option<&str>) -> AnyResult<String>;
}

/// Real HTTP client using reqwest
pub struct ReqwestClient;

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, bearer_token: Option<&str>) -> AnyResult<String> {
        let client = reqwest::blocking::Client::new();
        let mut request = client.get(url);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .with_context(|| format!("Failed to fetch URL: {}", url))?;

        if !response.status().is_success() {
            bail!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            );
        }

        response
            .text()
            .with_context(|| format!("Failed to read response body: {}", url))
    }
}

/// Where a manifest lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLocation {
    Path(PathBuf),
    Url(String),
}

impl ManifestLocation {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::Path(PathBuf::from(location))
        }
    }
}

impl std::fmt::Display for ManifestLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Resource definitions grouped by kind
type Manifest = BTreeMap<String, Vec<ResourceDefinition>>;

/// Reads definitions from a JSON or YAML manifest shaped as
/// `{ "<kind>": [ { "type": .., "name": .., "provider": .., "import_id": .. } ] }`
pub struct ManifestImporter<'a> {
    kind: String,
    location: ManifestLocation,
    fs: &'a dyn FileSystem,
    http: &'a dyn HttpClient,
    token: Option<String>,
}

impl<'a> ManifestImporter<'a> {
    pub fn new(
        kind: &str,
        location: ManifestLocation,
        fs: &'a dyn FileSystem,
        http: &'a dyn HttpClient,
    ) -> Self {
        Self {
            kind: kind.to_lowercase(),
            location,
            fs,
            http,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn fetch(&self) -> Result<String> {
        let fetched = match &self.location {
            ManifestLocation::Path(path) => self.fs.read_to_string(path),
            ManifestLocation::Url(url) => self.http.get(url, self.token.as_deref()),
        };
        fetched.map_err(|e| ImportError::Source(format!("{:#}", e)))
    }

    fn decode(&self, content: &str) -> Result<Manifest> {
        let decoded: std::result::Result<Manifest, String> = if content.trim_start().starts_with('{') {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        };

        decoded.map_err(|e| {
            ImportError::Source(format!("Invalid manifest {}: {}", self.location, e))
        })
    }
}

impl Importable for ManifestImporter<'_> {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn import_from_remote(&self, search_id: Option<&str>) -> Result<Vec<ResourceDefinition>> {
        log::info!("Fetching {} definitions from {}", self.kind, self.location);

        let manifest = self.decode(&self.fetch()?)?;

        let definitions = manifest
            .into_iter()
            .find(|(kind, _)| kind.to_lowercase() == self.kind)
            .map(|(_, definitions)| definitions)
            .ok_or_else(|| {
                ImportError::Source(format!(
                    "Unknown resource kind '{}' in {}",
                    self.kind, self.location
                ))
            })?;

        let definitions: Vec<ResourceDefinition> = definitions
            .into_iter()
            .filter(|d| search_id.is_none_or(|id| d.import_id == id))
            .map(with_default_provider)
            .collect();

        log::debug!("{} definitions after filtering", definitions.len());
        Ok(definitions)
    }
}

/// Resource types are prefixed with their provider's local name (`aws_iam_user`)
fn with_default_provider(mut definition: ResourceDefinition) -> ResourceDefinition {
    if definition.provider.is_empty() {
        definition.provider = definition
            .resource_type
            .split('_')
            .next()
            .unwrap_or_default()
            .to_string();
    }
    definition
}

/// HTTP client returning canned bodies per URL
#[cfg(test)]
pub struct MockHttpClient {
    pub bodies: std::collections::HashMap<String, String>,
    pub seen_tokens: std::sync::Mutex<Vec<Option<String>>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            bodies: std::collections::HashMap::new(),
            seen_tokens: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }
}

#[cfg(test)]
impl HttpClient for MockHttpClient {
    fn get(&self, url: &str, bearer_token: Option<&str>) -> AnyResult<String> {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(bearer_token.map(str::to_string));
        self.bodies
            .get(url)
            .cloned()
            .with_context(|| format!("HTTP request failed with status 404 Not Found: {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;
    use std::path::Path;

    const MANIFEST_YAML: &str = r#"
onelogin_apps:
  - type: onelogin_apps
    name: payroll
    provider: onelogin
    import_id: "101"
  - Type: onelogin_apps
    Name: wiki
    ImportID: "102"
aws_iam_user:
  - type: aws_iam_user
    name: deploy
    import_id: deploy
"#;

    fn importer<'a>(
        kind: &str,
        fs: &'a MockFileSystem,
        http: &'a MockHttpClient,
    ) -> ManifestImporter<'a> {
        ManifestImporter::new(
            kind,
            ManifestLocation::Path(PathBuf::from("/work/resources.yaml")),
            fs,
            http,
        )
    }

    #[test]
    fn test_location_parse() {
        assert_eq!(
            ManifestLocation::parse("https://example.com/r.json"),
            ManifestLocation::Url("https://example.com/r.json".to_string())
        );
        assert_eq!(
            ManifestLocation::parse("./r.yaml"),
            ManifestLocation::Path(PathBuf::from("./r.yaml"))
        );
    }

    #[test]
    fn test_reads_kind_from_yaml_file() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("/work/resources.yaml"), MANIFEST_YAML).unwrap();
        let http = MockHttpClient::new();

        let definitions = importer("ONELOGIN_APPS", &fs, &http)
            .import_from_remote(None)
            .unwrap();

        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].address(), "onelogin_apps.payroll");
        // Provider derived from the type prefix
        assert_eq!(definitions[1].provider, "onelogin");
        assert_eq!(definitions[1].import_id, "102");
    }

    #[test]
    fn test_search_id_filters() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("/work/resources.yaml"), MANIFEST_YAML).unwrap();
        let http = MockHttpClient::new();
        let importer = importer("onelogin_apps", &fs, &http);

        let found = importer.import_from_remote(Some("102")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "wiki");

        assert!(importer.import_from_remote(Some("999")).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_kind() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("/work/resources.yaml"), MANIFEST_YAML).unwrap();
        let http = MockHttpClient::new();

        let err = importer("okta_users", &fs, &http)
            .import_from_remote(None)
            .unwrap_err();
        assert!(err.to_string().contains("Unknown resource kind 'okta_users'"));
    }

    #[test]
    fn test_url_source_with_json_and_token() {
        let fs = MockFileSystem::new();
        let url = "https://inventory.example.com/resources.json";
        let http = MockHttpClient::new().with_body(
            url,
            r#"{"aws_iam_user": [{"type": "aws_iam_user", "name": "ci", "import_id": "ci"}]}"#,
        );

        let definitions = ManifestImporter::new("aws_iam_user", ManifestLocation::parse(url), &fs, &http)
            .with_token(Some("secret".to_string()))
            .import_from_remote(None)
            .unwrap();

        assert_eq!(definitions[0].provider, "aws");
        assert_eq!(
            *http.seen_tokens.lock().unwrap(),
            vec![Some("secret".to_string())]
        );
    }

    #[test]
    fn test_source_failures_are_source_errors() {
        let fs = MockFileSystem::new();
        let http = MockHttpClient::new();

        let missing = importer("onelogin_apps", &fs, &http)
            .import_from_remote(None)
            .unwrap_err();
        assert!(matches!(missing, ImportError::Source(_)));

        fs.write(Path::new("/work/resources.yaml"), "onelogin_apps: [unclosed").unwrap();
        let invalid = importer("onelogin_apps", &fs, &http)
            .import_from_remote(None)
            .unwrap_err();
        assert!(invalid.to_string().contains("Invalid manifest /work/resources.yaml"));
    }
}

pub mod definition;
pub mod error;
pub mod importer;
pub mod plan_file;
pub mod reconcile;
pub mod shape;
pub mod state_parser;

pub use definition::ResourceDefinition;
pub use error::ImportError;
pub use importer::{HttpClient, Importable, ManifestImporter, ManifestLocation, ReqwestClient};
pub use plan_file::PlanFile;
pub use reconcile::{Outcome, Reconciler};
pub use state_parser::StateParser;

#[cfg(test)]
pub use importer::MockHttpClient;

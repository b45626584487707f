#[allow(clippy::module_inception)]
pub mod executor;
pub mod opentofu;
pub mod registry;

pub use executor::Executor;
pub use opentofu::{OpenTofuExecutor, TerraformExecutor};
pub use registry::{DefaultExecutorRegistry, ExecutorRegistry};

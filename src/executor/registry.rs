use super::{Executor, OpenTofuExecutor, TerraformExecutor};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::CommandExecutor;

/// Trait for executor registry that manages available executors
pub trait ExecutorRegistry: Send + Sync {
    /// Register an executor with the given name
    fn register(&mut self, name: String, executor: Box<dyn Executor>);

    /// Get an executor by name
    fn get(&self, name: &str) -> Result<Arc<dyn Executor>>;

    /// Check if an executor is registered
    #[allow(dead_code)]
    fn has(&self, name: &str) -> bool;

    /// List all registered executor names, sorted
    fn list(&self) -> Vec<String>;
}

/// Default implementation of executor registry using a HashMap
pub struct DefaultExecutorRegistry {
    executors: RwLock<HashMap<String, Arc<dyn Executor>>>,
}

impl DefaultExecutorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            executors: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new registry with Terraform and OpenTofu (also reachable as `tofu`)
    pub fn with_defaults(command: Arc<dyn CommandExecutor>) -> Self {
        let mut registry = Self::new();
        registry.register(
            "terraform".to_string(),
            Box::new(TerraformExecutor::new(Arc::clone(&command))),
        );
        registry.register(
            "opentofu".to_string(),
            Box::new(OpenTofuExecutor::new(Arc::clone(&command))),
        );
        registry.register("tofu".to_string(), Box::new(OpenTofuExecutor::new(command)));
        registry
    }
}

impl ExecutorRegistry for DefaultExecutorRegistry {
    fn register(&mut self, name: String, executor: Box<dyn Executor>) {
        let mut executors = self.executors.write().unwrap();
        executors.insert(name, Arc::from(executor));
    }

    fn get(&self, name: &str) -> Result<Arc<dyn Executor>> {
        let found = self.executors.read().unwrap().get(name).cloned();
        found.with_context(|| {
            format!("Unknown executor: {} (available: {})", name, self.list().join(", "))
        })
    }

    fn has(&self, name: &str) -> bool {
        let executors = self.executors.read().unwrap();
        executors.contains_key(name)
    }

    fn list(&self) -> Vec<String> {
        let executors = self.executors.read().unwrap();
        let mut names: Vec<String> = executors.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for DefaultExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

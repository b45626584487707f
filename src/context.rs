use crate::executor::{DefaultExecutorRegistry, ExecutorRegistry};
use crate::import::{HttpClient, ReqwestClient};
use crate::traits::{
    CommandExecutor, FileSystem, InquireUserInput, Output, RealCommandExecutor, RealFileSystem,
    TerminalOutput, UserInput,
};
#[cfg(test)]
use crate::import::MockHttpClient;
#[cfg(test)]
use crate::traits::{MockCommandExecutor, MockFileSystem, MockOutput, MockUserInput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub input: Arc<dyn UserInput>,
    pub output: Arc<dyn Output>,
    pub executor_registry: Arc<dyn ExecutorRegistry>,
    pub http: Arc<dyn HttpClient>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new() -> Self {
        let command: Arc<dyn CommandExecutor> = Arc::new(RealCommandExecutor::new());
        Self {
            fs: Arc::new(RealFileSystem),
            input: Arc::new(InquireUserInput),
            output: Arc::new(TerminalOutput),
            executor_registry: Arc::new(DefaultExecutorRegistry::with_defaults(command)),
            http: Arc::new(ReqwestClient),
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test() -> Self {
        let command = Arc::new(MockCommandExecutor::new());
        Self::test_with(
            Arc::new(MockFileSystem::new()),
            Arc::new(MockUserInput::new()),
            Arc::new(MockOutput::new()),
            command,
        )
    }

    /// Create a test context with specific mock implementations.
    ///
    /// The executor registry is built over `command`, so state tool calls can
    /// be asserted through it.
    #[cfg(test)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        input: Arc<dyn UserInput>,
        output: Arc<dyn Output>,
        command: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            fs,
            input,
            output,
            executor_registry: Arc::new(DefaultExecutorRegistry::with_defaults(command)),
            http: Arc::new(MockHttpClient::new()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            input: Arc::clone(&self.input),
            output: Arc::clone(&self.output),
            executor_registry: Arc::clone(&self.executor_registry),
            http: Arc::clone(&self.http),
        }
    }
}

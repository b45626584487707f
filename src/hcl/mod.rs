//! HCL generation and the narrow scanning needed to avoid duplicate declarations

pub mod naming;
pub mod scanner;
pub mod writer;

pub use naming::normalize;
pub use scanner::{scan_str, DeclarationIndex};
pub use writer::{quote, Diagnostic, HclWriter};

//! Build-time template compiler: source tree → escaped modules + nested descriptor.
//! 建置期樣板編譯器：將來源樹轉為跳脫後的模組與巢狀描述子。

mod util;

pub mod compiler;
pub mod config;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod export;
pub mod manifest;

pub use compiler::{CompiledTemplate, TemplateCompiler};
pub use config::CompilerConfig;
pub use descriptor::{join_key, Descriptor, DescriptorError, DescriptorNode, FileNode};
pub use error::CompileError;
pub use export::{export_name, CompiledExport};
pub use manifest::{Manifest, ManifestError};

//! Agent tools — each pipeline stage exposed as individually callable tools.

pub mod builtin;
pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::*;

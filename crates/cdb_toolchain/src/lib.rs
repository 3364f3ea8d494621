//! Toolchain identities and heuristic resolution from compiler invocations.
//!
//! A compilation database names the compiler each file was built with, but not
//! which configured toolchain that corresponds to. [`ToolchainResolver`] maps
//! an invocation's leading argument and a source [`Language`] onto an entry of
//! an injected [`ToolchainRegistry`], falling back through name heuristics to
//! the [`BuildEnvironment`] default.

#![warn(missing_docs)]

pub mod registry;
pub mod resolver;
pub mod types;

pub use registry::{BuildEnvironment, StaticRegistry, ToolchainRegistry};
pub use resolver::{
    classify_compiler, needs_driver_mode, Resolution, ResolutionStep, ToolchainResolver,
    DRIVER_MODE_FLAG,
};
pub use types::{HostOs, Language, Toolchain, ToolchainFamily, ToolchainId};

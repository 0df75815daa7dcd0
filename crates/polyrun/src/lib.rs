//! A library for compiling and running untrusted code.
//!
//! Polyrun takes source code plus a file name or language tag and returns the
//! captured output of compiling (when needed) and running it. Each request
//! gets its own uniquely named workspace directory, which is removed on every
//! exit path.
//!
//! # Features
//!
//! - **Four languages** — Python, C, C++ and Java, behind one request/response contract.
//! - **TOML configuration** — Per-language compiler and runtime commands.
//! - **Wall-clock timeout** — Runaway programs and their descendants are killed.
//! - **In-band failures** — Compile errors, crashes and timeouts are results, not errors.
//!
//! Polyrun does not sandbox the programs it runs: they execute with the
//! privileges, filesystem and network access of the host process.

pub use config::{Config, ConfigError, EXAMPLE_CONFIG};
pub use pipeline::{Pipeline, PipelineError};
pub use resolver::ResolveError;
pub use runner::{Runner, RunnerError};
pub use types::{ExecutionRequest, ExecutionResult, LanguageTarget, RunOutput, SupportedLanguage};
pub use workspace::{Workspace, WorkspaceError};

pub mod config;
pub mod pipeline;
pub mod process;
pub mod resolver;
pub mod runner;
pub mod types;
pub mod workspace;

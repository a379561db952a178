//! eml2cal binary internals: CLI, config, mailbox handling, extraction,
//! run orchestration

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod extractor;
pub mod mailbox;
pub mod preprocess;
pub mod process;
pub mod report;
pub mod secret;

pub use cli::Cli;
pub use config::Config;
pub use error::{RunError, RunResult};

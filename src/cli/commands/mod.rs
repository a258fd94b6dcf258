//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that touch stored
//! inspections share a [`Workspace`]: resolved configuration, the opened
//! backend and the form and category catalogs.

pub mod categories;
pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod edit;
pub mod list;
pub mod new;
pub mod view;
pub mod workspace;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use workspace::Workspace;

pub mod commands;
pub mod config;
pub mod context;
pub mod poller;
pub mod repl;
pub mod speech;

pub use context::CliContext;
pub use repl::readline;

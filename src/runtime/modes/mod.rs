//! Mode routing
//!
//! `serve` runs the HTTP server; `migrate`, `seed` and `config generate`
//! are one-shot maintenance commands.

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;

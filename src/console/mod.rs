//! Console client for the gateway
//!
//! A thin HTTP client plus the command-line front end that drives it.

pub mod cli;
pub mod client;

pub use cli::{run, Cli, Commands};
pub use client::{ConsoleError, DownloadedFile, GatewayClient};

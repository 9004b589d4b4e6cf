//! Core library for the `routecheck` CLI.
//!
//! Projects group HTTP routes under a base URL and live in a SQLite file
//! ([`store`]). The [`runner`] replays a project's routes through an
//! [`http::Executor`] and reports one result per route. The `routecheck`
//! binary wires these together behind a small command-line interface.
pub mod args;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod runner;
pub mod shutdown;
pub mod store;

#[cfg(test)]
mod test_support;

//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{
    Cli, Command, ProjectCommand, ProjectCreateArgs, ProjectDeleteArgs, RouteAddArgs,
    RouteCommand, RouteDeleteArgs, RouteListArgs, RouteSelector, RouteUpdateArgs, TestArgs,
};
pub use defaults::{default_config_path, default_db_path};
pub use parsers::{parse_concurrency, parse_duration_arg, parse_method};
pub use types::{OutputFormat, RouteTarget};

use clap::{Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{HttpMethod, RouteId, RouteUpdate};
use crate::error::ValidationError;
use crate::runner::{RunOptions, RunRequest};

use super::parsers::{parse_concurrency, parse_duration_arg, parse_method};
use super::types::{OutputFormat, RouteTarget};

#[derive(Debug, Parser, Clone)]
#[command(
    version,
    about = "Register HTTP API routes under named projects and check that they respond."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the SQLite database (defaults to ~/.config/routecheck/routecheck.db)
    #[arg(long, global = true, env = "ROUTECHECK_DB")]
    pub db: Option<PathBuf>,

    /// Path to config file (TOML/JSON). Defaults to ./routecheck.toml or ./routecheck.json if present.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by ROUTECHECK_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output format for listings and test results
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage the routes of a project
    #[command(subcommand)]
    Route(RouteCommand),
    /// Call the routes of a project and report status and latency
    Test(TestArgs),
}

#[derive(Debug, Subcommand, Clone)]
pub enum ProjectCommand {
    /// Register a new project
    Create(ProjectCreateArgs),
    /// List all projects
    List,
    /// Delete a project and all of its routes
    Delete(ProjectDeleteArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ProjectCreateArgs {
    /// Unique project name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Base URL prepended to every route path
    #[arg(long, short = 'u')]
    pub url: String,

    /// Free-text description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ProjectDeleteArgs {
    /// Name of the project to delete
    #[arg(long, short = 'n')]
    pub name: String,
}

#[derive(Debug, Subcommand, Clone)]
pub enum RouteCommand {
    /// Add a route to a project
    Add(RouteAddArgs),
    /// List the routes of a project
    List(RouteListArgs),
    /// Change selected fields of a route
    Update(RouteUpdateArgs),
    /// Delete a route
    Delete(RouteDeleteArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RouteAddArgs {
    /// Owning project
    #[arg(long, short = 'p')]
    pub project: String,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    #[arg(long, short = 'm', value_parser = parse_method)]
    pub method: HttpMethod,

    /// Path appended to the project base URL, starting with '/'
    #[arg(long)]
    pub path: String,

    /// Route name (defaults to "<METHOD> <path>")
    #[arg(long)]
    pub name: Option<String>,

    /// Free-text description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RouteListArgs {
    /// Project whose routes are listed
    #[arg(long, short = 'p')]
    pub project: String,
}

/// Selects an existing route by id or by name.
#[derive(Debug, Args, Clone)]
#[group(required = true, multiple = false)]
pub struct RouteSelector {
    /// Route id
    #[arg(long)]
    pub id: Option<i64>,

    /// Route name
    #[arg(long = "route")]
    pub route: Option<String>,
}

impl RouteSelector {
    /// # Errors
    ///
    /// Returns an error when neither `--id` nor `--route` was given.
    pub fn target(&self) -> Result<RouteTarget, ValidationError> {
        match (self.id, self.route.as_ref()) {
            (Some(id), _) => Ok(RouteTarget::Id(RouteId::new(id))),
            (None, Some(name)) => Ok(RouteTarget::Name(name.clone())),
            (None, None) => Err(ValidationError::MissingRouteSelector),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct RouteUpdateArgs {
    /// Owning project
    #[arg(long, short = 'p')]
    pub project: String,

    #[command(flatten)]
    pub selector: RouteSelector,

    /// New HTTP method
    #[arg(long, short = 'm', value_parser = parse_method)]
    pub method: Option<HttpMethod>,

    /// New path
    #[arg(long)]
    pub path: Option<String>,

    /// New description
    #[arg(long, short = 'd', conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long = "clear-description")]
    pub clear_description: bool,

    /// New route name
    #[arg(long)]
    pub rename: Option<String>,
}

impl RouteUpdateArgs {
    /// Flags that were given are applied even when empty.
    #[must_use]
    pub fn to_update(&self) -> RouteUpdate {
        let description = if self.clear_description {
            Some(None)
        } else {
            self.description.clone().map(Some)
        };
        RouteUpdate {
            method: self.method,
            path: self.path.clone(),
            name: self.rename.clone(),
            description,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct RouteDeleteArgs {
    /// Owning project
    #[arg(long, short = 'p')]
    pub project: String,

    #[command(flatten)]
    pub selector: RouteSelector,
}

#[derive(Debug, Args, Clone)]
pub struct TestArgs {
    /// Project to test
    #[arg(long, short = 'p')]
    pub project: String,

    /// Only test the route with this name
    #[arg(long)]
    pub route: Option<String>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long, default_value = "5s", value_parser = parse_duration_arg)]
    pub timeout: Duration,

    /// Maximum number of requests in flight
    #[arg(long, default_value = "1", value_parser = parse_concurrency)]
    pub concurrency: NonZeroUsize,
}

impl TestArgs {
    #[must_use]
    pub fn to_request(&self) -> RunRequest {
        let mut request = RunRequest::project(self.project.clone()).with_options(RunOptions {
            timeout: self.timeout,
            concurrency: self.concurrency,
        });
        if let Some(route) = self.route.as_ref() {
            request = request.with_route(route.clone());
        }
        request
    }
}

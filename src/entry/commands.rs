use std::io::Write;

use serde_json::json;
use tracing::{debug, info};

use routecheck::args::{
    Cli, Command, OutputFormat, ProjectCommand, ProjectCreateArgs, RouteAddArgs, RouteCommand,
    RouteSelector, RouteTarget, RouteUpdateArgs, TestArgs, default_db_path,
};
use routecheck::domain::{NewProject, NewRoute, Project, Route};
use routecheck::error::{AppError, AppResult};
use routecheck::http::HttpExecutor;
use routecheck::runner::TestRunner;
use routecheck::shutdown::shutdown_channel;
use routecheck::store::{Database, ProjectStore, RouteStore};

use crate::system::output::{render_entity, render_projects, render_results, render_routes};
use crate::system::signals::setup_signal_shutdown_handler;

pub(super) async fn execute(cli: Cli) -> AppResult<()> {
    let db_path = cli.db.unwrap_or_else(default_db_path);
    debug!("Using database {}", db_path.display());
    let db = Database::open(&db_path).await?;
    let format = cli.output_format;

    match cli.command {
        Command::Project(command) => project_command(&db, command, format).await,
        Command::Route(command) => route_command(&db, command, format).await,
        Command::Test(args) => test_command(&db, &args, format).await,
    }
}

async fn project_command(
    db: &Database,
    command: ProjectCommand,
    format: OutputFormat,
) -> AppResult<()> {
    let projects = db.projects();
    match command {
        ProjectCommand::Create(args) => {
            let project = projects.create(new_project(args)).await?;
            info!("Created project '{}' ({})", project.name, project.id);
            let text = format!(
                "Created project '{}' (#{}) with base URL {}.",
                project.name, project.id, project.base_url
            );
            emit(&render_entity(&project, &text, format)?)
        }
        ProjectCommand::List => emit(&render_projects(&projects.list().await?, format)?),
        ProjectCommand::Delete(args) => {
            projects.delete_by_name(&args.name).await?;
            info!("Deleted project '{}'", args.name);
            let text = format!("Deleted project '{}' and its routes.", args.name);
            let value = json!({ "deleted": "project", "name": args.name });
            emit(&render_entity(&value, &text, format)?)
        }
    }
}

fn new_project(args: ProjectCreateArgs) -> NewProject {
    let mut project = NewProject::new(args.name, args.url);
    if let Some(description) = args.description {
        project = project.with_description(description);
    }
    project
}

async fn route_command(db: &Database, command: RouteCommand, format: OutputFormat) -> AppResult<()> {
    let routes = db.routes();
    match command {
        RouteCommand::Add(args) => {
            let project = db.projects().get_by_name(&args.project).await?;
            let route = routes.create(new_route(&project, args)).await?;
            info!("Added route '{}' to project '{}'", route.name, project.name);
            let text = format!(
                "Added route '{}' (#{}): {} {}",
                route.name,
                route.id,
                route.method,
                project.route_url(&route.path)
            );
            emit(&render_entity(&route, &text, format)?)
        }
        RouteCommand::List(args) => {
            let project = db.projects().get_by_name(&args.project).await?;
            let listed = routes.list_by_project(project.id).await?;
            emit(&render_routes(&project, &listed, format)?)
        }
        RouteCommand::Update(args) => update_route(db, &args, format).await,
        RouteCommand::Delete(args) => {
            let project = db.projects().get_by_name(&args.project).await?;
            let route = resolve_route(db, &project, &args.selector).await?;
            routes.delete(route.id).await?;
            info!("Deleted route '{}' from project '{}'", route.name, project.name);
            let text = format!("Deleted route '{}' (#{}).", route.name, route.id);
            let value = json!({ "deleted": "route", "id": route.id, "name": route.name });
            emit(&render_entity(&value, &text, format)?)
        }
    }
}

fn new_route(project: &Project, args: RouteAddArgs) -> NewRoute {
    let mut route = NewRoute::new(project.id, args.method, args.path);
    if let Some(name) = args.name {
        route = route.with_name(name);
    }
    if let Some(description) = args.description {
        route = route.with_description(description);
    }
    route
}

async fn update_route(db: &Database, args: &RouteUpdateArgs, format: OutputFormat) -> AppResult<()> {
    let project = db.projects().get_by_name(&args.project).await?;
    let route = resolve_route(db, &project, &args.selector).await?;
    let update = args.to_update();
    if update.is_empty() {
        debug!("No changes requested for route '{}'", route.name);
    }
    let updated = db.routes().update(route.id, update).await?;
    info!("Updated route '{}' in project '{}'", updated.name, project.name);
    let text = format!(
        "Updated route '{}' (#{}): {} {}",
        updated.name,
        updated.id,
        updated.method,
        project.route_url(&updated.path)
    );
    emit(&render_entity(&updated, &text, format)?)
}

/// Finds the selected route and checks it belongs to `project`.
async fn resolve_route(
    db: &Database,
    project: &Project,
    selector: &RouteSelector,
) -> AppResult<Route> {
    let target = selector.target()?;
    match &target {
        RouteTarget::Id(id) => {
            let route = db.routes().get_by_id(*id).await?;
            if route.project_id != project.id {
                return Err(AppError::RouteNotInProject {
                    project: project.name.clone(),
                    route: target.to_string(),
                });
            }
            Ok(route)
        }
        RouteTarget::Name(name) => Ok(db.routes().get_by_name(project.id, name).await?),
    }
}

async fn test_command(db: &Database, args: &TestArgs, format: OutputFormat) -> AppResult<()> {
    let runner = TestRunner::new(db.projects(), db.routes(), HttpExecutor::new()?);
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let outcome = runner.run(&args.to_request(), Some(shutdown_rx)).await;

    drop(shutdown_tx.send(()));
    drop(signal_handle.await);

    let results = outcome?;
    emit(&render_results(&results, format)?)?;

    let failed = results.iter().filter(|result| !result.responded()).count();
    if failed > 0 {
        return Err(AppError::RouteFailures {
            failed,
            total: results.len(),
        });
    }
    Ok(())
}

fn emit(output: &str) -> AppResult<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

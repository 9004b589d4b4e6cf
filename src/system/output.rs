use serde::Serialize;

use routecheck::args::OutputFormat;
use routecheck::domain::{Project, Route};
use routecheck::error::AppResult;
use routecheck::runner::{RouteOutcome, RouteResult};

const GUTTER: &str = "  ";
const EMPTY_CELL: &str = "-";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column-aligned text table; the last column is never padded.
struct Table {
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

impl Table {
    const fn new(headers: &'static [&'static str]) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn render(&self) -> String {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|header| header.chars().count())
            .collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        push_line(&mut out, self.headers.iter().copied(), &widths);
        for row in &self.rows {
            push_line(&mut out, row.iter().map(String::as_str), &widths);
        }
        out
    }
}

fn push_line<'cell>(out: &mut String, cells: impl Iterator<Item = &'cell str>, widths: &[usize]) {
    let mut line = String::new();
    for (index, (cell, width)) in cells.zip(widths).enumerate() {
        if index > 0 {
            line.push_str(GUTTER);
        }
        line.push_str(cell);
        let padding = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat_n(' ', padding));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Renders a single value as JSON, or `text` as a line.
pub fn render_entity<T: Serialize + ?Sized>(
    value: &T,
    text: &str,
    format: OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => to_json(value),
        OutputFormat::Text => Ok(format!("{}\n", text)),
    }
}

pub fn render_projects(projects: &[Project], format: OutputFormat) -> AppResult<String> {
    if format == OutputFormat::Json {
        return to_json(projects);
    }
    if projects.is_empty() {
        return Ok("No projects.\n".to_owned());
    }
    let mut table = Table::new(&["ID", "NAME", "BASE URL", "CREATED", "DESCRIPTION"]);
    for project in projects {
        table.push(vec![
            project.id.to_string(),
            project.name.clone(),
            project.base_url.clone(),
            project.created_at.format(TIMESTAMP_FORMAT).to_string(),
            project
                .description
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_owned()),
        ]);
    }
    Ok(table.render())
}

pub fn render_routes(project: &Project, routes: &[Route], format: OutputFormat) -> AppResult<String> {
    if format == OutputFormat::Json {
        return to_json(routes);
    }
    if routes.is_empty() {
        return Ok(format!("No routes in project '{}'.\n", project.name));
    }
    let mut table = Table::new(&["ID", "NAME", "METHOD", "URL", "DESCRIPTION"]);
    for route in routes {
        table.push(vec![
            route.id.to_string(),
            route.name.clone(),
            route.method.to_string(),
            project.route_url(&route.path),
            route
                .description
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_owned()),
        ]);
    }
    Ok(table.render())
}

pub fn render_results(results: &[RouteResult], format: OutputFormat) -> AppResult<String> {
    if format == OutputFormat::Json {
        return to_json(results);
    }
    if results.is_empty() {
        return Ok("No routes to test.\n".to_owned());
    }
    let mut table = Table::new(&[
        "ID", "NAME", "METHOD", "PATH", "STATUS", "DURATION", "DETAIL",
    ]);
    for result in results {
        let (status, duration, detail) = match &result.outcome {
            RouteOutcome::Response { status, duration } => (
                status.to_string(),
                format!("{}ms", duration.as_millis()),
                String::new(),
            ),
            RouteOutcome::Failed { kind, error } => {
                (kind.as_str().to_owned(), EMPTY_CELL.to_owned(), error.clone())
            }
            RouteOutcome::Cancelled => (
                "Cancelled".to_owned(),
                EMPTY_CELL.to_owned(),
                String::new(),
            ),
        };
        table.push(vec![
            result.route_id.to_string(),
            result.route_name.clone(),
            result.method.to_string(),
            result.path.clone(),
            status,
            duration,
            detail,
        ]);
    }
    let responded = results.iter().filter(|result| result.responded()).count();
    let mut out = table.render();
    out.push('\n');
    out.push_str(&summary_line(responded, results.len()));
    Ok(out)
}

fn summary_line(responded: usize, total: usize) -> String {
    format!("{} of {} route(s) responded.\n", responded, total)
}

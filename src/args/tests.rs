use super::*;
use crate::domain::{HttpMethod, RouteId};
use crate::error::ValidationError;
use clap::Parser;
use std::time::Duration;

fn parse(args: &[&str]) -> Result<Cli, String> {
    Cli::try_parse_from(args).map_err(|err| format!("parse failed: {}", err))
}

#[test]
fn parse_duration_arg_accepts_units() -> Result<(), String> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("5s", Duration::from_secs(5)),
        ("7", Duration::from_secs(7)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input).map_err(|err| err.to_string())?;
        if parsed != expected {
            return Err(format!("{} parsed as {:?}", input, parsed));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_arg_rejects_bad_input() -> Result<(), String> {
    let cases = ["", "s", "0", "0ms", "5d", "-1s"];
    for input in cases {
        if parse_duration_arg(input).is_ok() {
            return Err(format!("Expected '{}' to be rejected", input));
        }
    }
    match parse_duration_arg("10w") {
        Err(ValidationError::InvalidDurationUnit { unit }) if unit == "w" => Ok(()),
        other => Err(format!("Unexpected result: {:?}", other)),
    }
}

#[test]
fn parse_concurrency_requires_positive_value() -> Result<(), String> {
    let parsed = parse_concurrency("4").map_err(|err| err.to_string())?;
    if parsed.get() != 4 {
        return Err(format!("Unexpected concurrency: {}", parsed));
    }
    match parse_concurrency("0") {
        Err(ValidationError::ValueTooSmall { min: 1 }) => {}
        other => return Err(format!("Expected ValueTooSmall, got {:?}", other)),
    }
    if parse_concurrency("many").is_ok() {
        return Err("Expected non-numeric concurrency to fail".to_owned());
    }
    Ok(())
}

#[test]
fn test_command_defaults() -> Result<(), String> {
    let cli = parse(&["routecheck", "test", "-p", "demo"])?;
    let Command::Test(test) = cli.command else {
        return Err("Expected test command".to_owned());
    };
    if test.timeout != Duration::from_secs(5) || test.concurrency.get() != 1 {
        return Err(format!("Unexpected defaults: {:?}", test));
    }
    let request = test.to_request();
    if request.project != "demo" || request.route.is_some() {
        return Err(format!("Unexpected request: {:?}", request));
    }
    if cli.output_format != OutputFormat::Text || cli.verbose || cli.no_color {
        return Err("Unexpected global defaults".to_owned());
    }
    Ok(())
}

#[test]
fn test_command_with_route_and_options() -> Result<(), String> {
    let cli = parse(&[
        "routecheck",
        "test",
        "-p",
        "demo",
        "--route",
        "GET users",
        "--timeout",
        "750ms",
        "--concurrency",
        "3",
        "--output-format",
        "json",
    ])?;
    let Command::Test(test) = cli.command else {
        return Err("Expected test command".to_owned());
    };
    let request = test.to_request();
    if request.route.as_deref() != Some("GET users") {
        return Err(format!("Unexpected route: {:?}", request.route));
    }
    if request.options.timeout != Duration::from_millis(750)
        || request.options.concurrency.get() != 3
    {
        return Err(format!("Unexpected options: {:?}", request.options));
    }
    if cli.output_format != OutputFormat::Json {
        return Err("Global flag after subcommand was not applied".to_owned());
    }
    Ok(())
}

#[test]
fn route_add_parses_method_case_insensitively() -> Result<(), String> {
    let cli = parse(&[
        "routecheck",
        "route",
        "add",
        "-p",
        "demo",
        "-m",
        "patch",
        "--path",
        "/users/1",
    ])?;
    match cli.command {
        Command::Route(RouteCommand::Add(add)) => {
            if add.method != HttpMethod::Patch || add.path != "/users/1" || add.name.is_some() {
                return Err(format!("Unexpected args: {:?}", add));
            }
            Ok(())
        }
        other => Err(format!("Expected route add, got {:?}", other)),
    }
}

#[test]
fn route_add_rejects_unknown_method() -> Result<(), String> {
    let result = Cli::try_parse_from([
        "routecheck",
        "route",
        "add",
        "-p",
        "demo",
        "-m",
        "TRACE",
        "--path",
        "/x",
    ]);
    if result.is_ok() {
        return Err("Expected TRACE to be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn route_update_builds_sparse_update() -> Result<(), String> {
    let cli = parse(&[
        "routecheck",
        "route",
        "update",
        "-p",
        "demo",
        "--id",
        "7",
        "--path",
        "/v2",
    ])?;
    let Command::Route(RouteCommand::Update(update)) = cli.command else {
        return Err("Expected route update".to_owned());
    };
    if update.selector.target().map_err(|err| err.to_string())? != RouteTarget::Id(RouteId::new(7))
    {
        return Err(format!("Unexpected selector: {:?}", update.selector));
    }
    let changes = update.to_update();
    if changes.path.as_deref() != Some("/v2")
        || changes.method.is_some()
        || changes.name.is_some()
        || changes.description.is_some()
    {
        return Err(format!("Unexpected update: {:?}", changes));
    }
    Ok(())
}

#[test]
fn route_update_clear_description_and_rename() -> Result<(), String> {
    let cli = parse(&[
        "routecheck",
        "route",
        "update",
        "-p",
        "demo",
        "--route",
        "GET users",
        "--clear-description",
        "--rename",
        "list users",
    ])?;
    let Command::Route(RouteCommand::Update(update)) = cli.command else {
        return Err("Expected route update".to_owned());
    };
    let changes = update.to_update();
    if changes.description != Some(None) || changes.name.as_deref() != Some("list users") {
        return Err(format!("Unexpected update: {:?}", changes));
    }
    Ok(())
}

#[test]
fn route_update_keeps_empty_description() -> Result<(), String> {
    let cli = parse(&[
        "routecheck",
        "route",
        "update",
        "-p",
        "demo",
        "--id",
        "1",
        "-d",
        "",
    ])?;
    let Command::Route(RouteCommand::Update(update)) = cli.command else {
        return Err("Expected route update".to_owned());
    };
    if update.to_update().description != Some(Some(String::new())) {
        return Err("Empty description flag was dropped".to_owned());
    }
    Ok(())
}

#[test]
fn route_selector_requires_exactly_one() -> Result<(), String> {
    let missing = Cli::try_parse_from(["routecheck", "route", "delete", "-p", "demo"]);
    if missing.is_ok() {
        return Err("Expected missing selector to fail".to_owned());
    }
    let both = Cli::try_parse_from([
        "routecheck",
        "route",
        "delete",
        "-p",
        "demo",
        "--id",
        "1",
        "--route",
        "x",
    ]);
    if both.is_ok() {
        return Err("Expected conflicting selectors to fail".to_owned());
    }
    Ok(())
}

#[test]
fn clear_description_conflicts_with_description() -> Result<(), String> {
    let result = Cli::try_parse_from([
        "routecheck",
        "route",
        "update",
        "-p",
        "demo",
        "--id",
        "1",
        "-d",
        "text",
        "--clear-description",
    ]);
    if result.is_ok() {
        return Err("Expected conflicting description flags to fail".to_owned());
    }
    Ok(())
}

#[test]
fn default_paths_live_under_routecheck_dir() -> Result<(), String> {
    let db = default_db_path();
    let config = default_config_path();
    if db.file_name().and_then(|name| name.to_str()) != Some("routecheck.db") {
        return Err(format!("Unexpected db path: {}", db.display()));
    }
    if db.parent() != config.parent() {
        return Err("Database and config should share a directory".to_owned());
    }
    Ok(())
}

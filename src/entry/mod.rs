mod commands;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use routecheck::args::Cli;
use routecheck::config::{apply_config, load_config};
use routecheck::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let (mut cli, matches) = parse_args()?;
    if let Some(config) = load_config(cli.config.as_deref())? {
        apply_config(&mut cli, &matches, &config)?;
    }

    crate::system::logger::init_logging(cli.verbose, cli.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(commands::execute(cli))
}

fn parse_args() -> AppResult<(Cli, ArgMatches)> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    Ok((cli, matches))
}

use anyhow::Result;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use literate_crypto::build::{build_site, routes};
use literate_crypto::config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "literate_crypto=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let overrides = [
        Arg::with_name("data")
            .long("data")
            .value_name("FILE")
            .takes_value(true)
            .help("The exercise data file (default: src/data/matasano.json)"),
        Arg::with_name("output")
            .long("output")
            .value_name("DIR")
            .takes_value(true)
            .help("The output directory (default: dist)"),
        Arg::with_name("template")
            .long("template")
            .value_name("FILE")
            .takes_value(true)
            .help("The production HTML template (default: index-production.html)"),
    ];

    let matches = App::new("literate-crypto")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Writes a static entry point for every route of the site")
        .setting(AppSettings::VersionlessSubcommands)
        .args(&overrides)
        .subcommand(
            SubCommand::with_name("routes")
                .about("Prints the route array without writing anything")
                .args(&overrides),
        )
        .get_matches();

    let cwd = std::env::current_dir()?;
    let mut config = Config::from_directory(&cwd)?;

    match matches.subcommand() {
        ("routes", Some(sub_matches)) => {
            apply_overrides(&mut config, &matches);
            apply_overrides(&mut config, sub_matches);
            for route in routes(&config)? {
                println!("{}", route);
            }
        }
        _ => {
            apply_overrides(&mut config, &matches);
            build_site(&config)?;
        }
    }
    Ok(())
}

fn apply_overrides(config: &mut Config, matches: &ArgMatches) {
    if let Some(data) = matches.value_of_os("data") {
        config.data_file = PathBuf::from(data);
    }
    if let Some(output) = matches.value_of_os("output") {
        config.output_directory = PathBuf::from(output);
    }
    if let Some(template) = matches.value_of_os("template") {
        config.template = PathBuf::from(template);
    }
}

mod aggregator;
mod builder;
mod cli;
mod decode;
mod error;
mod fmt;
mod layout;
mod models;
mod normalizer;
#[cfg(feature = "pdf")]
mod pdf;
mod settings;
mod style;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "salesreport=warn",
        1 => "salesreport=info",
        _ => "salesreport=debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("SALESREPORT_LOG").unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init { force } => cli::init::run(force),
        Commands::Generate(args) => cli::generate::run(args),
        Commands::Preview { file } => cli::preview::run(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

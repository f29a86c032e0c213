use clap::Parser;
use colored::Colorize;

use tinyhop::cli::{Cli, Commands};
use tinyhop::config::{StaticConfig, validate_config};
use tinyhop::errors::TinyhopError;
use tinyhop::runtime::modes::run_server;
use tinyhop::system::init_logging;

const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

fn exit_with(err: &TinyhopError) -> ! {
    eprintln!("{}", err.format_colored());
    std::process::exit(1);
}

fn generate_config(output_path: Option<String>) {
    let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());
    match StaticConfig::default().save_to_file(&path) {
        Ok(()) => println!("{} {}", "Configuration written to".green(), path),
        Err(e) => exit_with(&TinyhopError::file_operation(format!(
            "Failed to write {}: {}",
            path, e
        ))),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output_path }) = cli.command {
        generate_config(output_path);
        return Ok(());
    }

    let config = StaticConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        exit_with(&TinyhopError::validation(format!(
            "Failed to load configuration: {}",
            e
        )))
    });
    if let Err(e) = validate_config(&config) {
        exit_with(&e);
    }

    let _guard = init_logging(&config.logging).unwrap_or_else(|e| exit_with(&e));

    run_server(&config).await
}

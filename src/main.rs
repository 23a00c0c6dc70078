use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use passgen::cli::{handlers, Args};
use passgen::core::config::Config;

fn main() -> ExitCode {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();
    let config = Config::load();

    env_logger::Builder::new()
        .filter_level(config.log_level)
        .format_timestamp_secs()
        .format_module_path(true)
        .target(env_logger::Target::Stderr)
        .init();
    config.report_warnings();
    log::debug!("Loaded config: {:?}", config);

    let Some(command) = args.command else {
        if let Err(e) = Args::command().print_help() {
            eprintln!("Error: {}", e);
        }
        return ExitCode::FAILURE;
    };

    let result = handlers::run(command, &config, &mut io::stdout().lock(), &mut io::stderr().lock());
    match result {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

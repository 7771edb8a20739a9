//! Main application entry point and high-level flow coordination.
//!
//! After argument parsing this module sets up logging and configuration, then
//! hands off to the command handler:
//!
//! - `args`: Command-line argument parsing and help/version display
//! - `config`: Configuration loading and validation
//! - `commands`: The chart, terms and luck handlers
//! - `logger`: Centralized logging functionality

use anyhow::Result;

use saju::args::{self, CliAction, GlobalArgs, ParsedArgs};
use saju::commands;
use saju::config::{self, Config};
use saju::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use saju::logger::{Log, LoggerGuard};
use saju::{log_end, log_error, log_pipe};

/// Apply the global flags: output mode, debug, log file and config directory.
fn prepare(global: &GlobalArgs) -> Result<(Config, Option<LoggerGuard>)> {
    // JSON goes to stdout untouched, so the decorated log stays quiet
    Log::set_enabled(!global.json);
    Log::set_debug(global.debug_enabled && !global.json);

    let guard = if global.log_to_file && !global.json {
        let path = format!(
            "saju-{}.log",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        Some(Log::start_file_logging(path)?)
    } else {
        None
    };

    config::set_config_dir(global.config_dir.clone())?;
    let config = Config::load()?;
    if Log::is_debug() {
        let source = match config::get_config_path() {
            Ok(path) if path.exists() => config::loading::private_path(&path),
            _ => "default configuration".to_string(),
        };
        config.log_config(&source);
    }

    Ok((config, guard))
}

fn run(action: CliAction) -> Result<i32> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(EXIT_SUCCESS)
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(EXIT_SUCCESS)
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            Ok(EXIT_FAILURE)
        }
        CliAction::ChartCommand { global, birth } => {
            let (config, _guard) = prepare(&global)?;
            commands::chart::handle_chart_command(&birth, &config, global.json)?;
            Ok(EXIT_SUCCESS)
        }
        CliAction::TermsCommand {
            global,
            year,
            timezone,
            engine,
        } => {
            let (config, _guard) = prepare(&global)?;
            commands::terms::handle_terms_command(
                year,
                timezone.as_deref(),
                engine,
                &config,
                global.json,
            )?;
            Ok(EXIT_SUCCESS)
        }
        CliAction::LuckCommand {
            global,
            birth,
            year,
            count,
        } => {
            let (config, _guard) = prepare(&global)?;
            commands::luck::handle_luck_command(&birth, year, count, &config, global.json)?;
            Ok(EXIT_SUCCESS)
        }
    }
}

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let code = match run(parsed_args.action) {
        Ok(code) => code,
        Err(e) => {
            if Log::is_enabled() {
                log_pipe!();
                log_error!("{e:#}");
                log_end!();
            } else {
                eprintln!("error: {e:#}");
            }
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}

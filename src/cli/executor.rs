//! Dispatches a parsed command line to its handler.

use std::process::ExitCode;

use super::handlers::{MigrateCommandHandler, ServeCommandHandler, WidgetCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;
use crate::logger::LogLevelHandle;

/// Runs the command; no subcommand means `serve`.
///
/// `log_handle` lets a running server change its log level on request.
/// Client commands report their own failures and come back as
/// `Ok(ExitCode::FAILURE)`. Errors returned here are server-side ones.
pub async fn execute_command(
    cli: &Cli,
    settings: Settings,
    log_handle: Option<LogLevelHandle>,
) -> AppResult<ExitCode> {
    warn_about_arguments(cli);

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings)
                .with_log_handle(log_handle)
                .execute(*dry_run)
                .await?;
        }
        None => {
            ServeCommandHandler::new(settings)
                .with_log_handle(log_handle)
                .execute(false)
                .await?;
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
        }
        Some(Commands::WidgetA(cmd)) => {
            let handler = WidgetCommandHandler::new(&settings.client)?;
            return Ok(handler.execute_widget_a(&cmd.action).await);
        }
        Some(Commands::WidgetB(cmd)) => {
            let handler = WidgetCommandHandler::new(&settings.client)?;
            return Ok(handler.execute_widget_b(&cmd.action).await);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn warn_about_arguments(cli: &Cli) {
    match &cli.command {
        Some(Commands::Serve {
            host: Some(host),
            port: Some(port),
            ..
        }) if *port < 1024 && host == "0.0.0.0" => {
            eprintln!("Warning: binding to 0.0.0.0 on port {port} usually requires root privileges");
        }
        Some(Commands::Migrate {
            rollback: Some(steps),
            ..
        }) if *steps > 50 => {
            eprintln!(
                "Warning: rolling back {steps} migrations is a large operation. Consider smaller steps."
            );
        }
        _ => {}
    }
}

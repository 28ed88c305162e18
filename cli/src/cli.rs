//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::application::services::config_service;
use crate::commands;
use crate::infra::clock::TokioClock;
use crate::infra::cloud_controller::CloudControllerClient;
use crate::infra::manifest::YamlManifestReader;

/// Apply manifests and inspect services on a cloud application platform
#[derive(Parser)]
#[command(
    name = "stratus",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply manifest properties to an existing application
    ApplyManifest(commands::apply_manifest::ApplyManifestArgs),

    /// Show service instance info
    Service(commands::service::ServiceArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be set up or its output cannot
    /// be written.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
            ..
        } = self;
        let app = AppContext::new(&OutputFlags {
            no_color,
            quiet,
            json,
        });

        match command {
            Command::Version => {
                commands::version::run(&app);
                Ok(ExitCode::SUCCESS)
            }
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::ApplyManifest(args) => {
                commands::apply_manifest::announce(&app);
                let client = match connect(&app) {
                    Ok(client) => client,
                    Err(err) => return commands::fail_setup(&app, &err),
                };
                commands::apply_manifest::run(&app, &args, &client, &TokioClock, &YamlManifestReader)
                    .await
            }
            Command::Service(args) => {
                let client = match connect(&app) {
                    Ok(client) => client,
                    Err(err) => return commands::fail_setup(&app, &err),
                };
                commands::service::run(&app, &args, &client).await
            }
        }
    }
}

fn connect(app: &AppContext) -> Result<CloudControllerClient> {
    let config = config_service::load_config(&app.config_store)?;
    CloudControllerClient::new(&config.api)
}

//! `stratus service`: show a service instance's composite status.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ServiceInstanceGateway;
use crate::application::services::config_service;
use crate::application::services::service_status::{
    describe_service_instance, service_instance_guid,
};
use crate::domain::{Target, resolve_target};
use crate::output::json;

/// Arguments for the service command.
#[derive(Args)]
pub struct ServiceArgs {
    /// Service instance name
    pub name: String,

    /// Print only the service instance GUID
    #[arg(long)]
    pub guid: bool,
}

/// Run the service command.
///
/// # Errors
///
/// Returns an error only if output cannot be written.
pub async fn run(
    app: &AppContext,
    args: &ServiceArgs,
    gateway: &impl ServiceInstanceGateway,
) -> Result<ExitCode> {
    let target = match current_target(app) {
        Ok(target) => target,
        Err(err) => return super::fail_setup(app, &err),
    };

    if args.guid {
        return show_guid(app, args, gateway, &target).await;
    }

    app.output.line(&format!(
        "Showing info of service {} in org {} / space {} as {}...",
        args.name, target.org, target.space, target.user
    ));

    let (result, warnings) = describe_service_instance(gateway, &args.name, &target.space_guid)
        .await
        .into_parts();

    match result {
        Ok(status) => {
            if !app.is_json() {
                app.output.warnings(&warnings);
            }
            app.renderer()
                .render_service_status(&args.name, &status, &warnings)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => super::fail(app, &err, err.code(), &warnings),
    }
}

async fn show_guid(
    app: &AppContext,
    args: &ServiceArgs,
    gateway: &impl ServiceInstanceGateway,
    target: &Target,
) -> Result<ExitCode> {
    let (result, warnings) = service_instance_guid(gateway, &args.name, &target.space_guid)
        .await
        .into_parts();
    match result {
        Ok(guid) if app.is_json() => {
            println!("{}", json::format_success("guid", &guid, &warnings)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(guid) => {
            app.output.warnings(&warnings);
            println!("{guid}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => super::fail(app, &err, err.code(), &warnings),
    }
}

fn current_target(app: &AppContext) -> Result<Target> {
    let config = config_service::load_config(&app.config_store)?;
    Ok(resolve_target(&config.target)?)
}

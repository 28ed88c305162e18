//! `stratus apply-manifest`: apply a manifest to an existing application.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::app::AppContext;
use crate::application::ports::{ApiInfo, Clock, ManifestSource, PlatformGateway};
use crate::application::services::apply_manifest::{ApplyOptions, apply_manifest};
use crate::application::services::config_service;
use crate::domain::target::MIN_VERSION_APPLY_MANIFEST;
use crate::domain::{
    ManifestDocument, PollPolicy, Target, Warnings, check_minimum_version, resolve_target,
};
use crate::output::{json, progress};

/// Notice printed before experimental commands run.
pub const EXPERIMENTAL_NOTICE: &str =
    "This command is in EXPERIMENTAL stage and may change without notice";

/// Arguments for the apply-manifest command.
#[derive(Args)]
pub struct ApplyManifestArgs {
    /// Path to the manifest file
    #[arg(short = 'f', long = "path", value_name = "PATH")]
    pub path: PathBuf,
}

/// Print the experimental notice. Runs before any other check, including
/// the endpoint check made while connecting.
pub fn announce(app: &AppContext) {
    if !app.is_json() {
        app.output.warn(EXPERIMENTAL_NOTICE);
    }
}

/// Run the apply-manifest command. Call [`announce`] first.
///
/// # Errors
///
/// Returns an error only if output cannot be written. Command failures are
/// reported and mapped to a failing exit code.
pub async fn run(
    app: &AppContext,
    args: &ApplyManifestArgs,
    gateway: &impl PlatformGateway,
    clock: &impl Clock,
    manifests: &impl ManifestSource,
) -> Result<ExitCode> {
    let mut warnings = Warnings::new();
    let (target, manifest, policy) =
        match prepare(app, args, gateway, manifests, &mut warnings).await {
            Ok(prepared) => prepared,
            Err(err) => {
                let code = super::error_code(&err);
                return super::fail(app, &format!("{err:#}"), code, &warnings);
            }
        };

    app.output.line(&format!(
        "Applying manifest {} in org {} / space {} as {}...",
        args.path.display(),
        target.org,
        target.space,
        target.user
    ));

    let cancel = CancellationToken::new();
    let interrupt = cancel_on_ctrl_c(cancel.clone());

    let spinner = (app.output.show_progress() && !app.is_json())
        .then(|| progress::spinner("Waiting for manifest to be applied"));

    let opts = ApplyOptions {
        policy,
        cancel: &cancel,
    };
    let reply = apply_manifest(gateway, clock, &manifest, &target.space_guid, &opts).await;
    interrupt.abort();

    let (result, apply_warnings) = reply.into_parts();
    warnings.append(apply_warnings);

    if let Some(pb) = &spinner {
        match &result {
            Ok(()) => progress::finish_ok(pb, "Manifest applied"),
            Err(_) => progress::finish_error(pb, "Manifest not applied"),
        }
    }

    match result {
        Ok(()) => {
            if app.is_json() {
                let applied = args.path.display().to_string();
                println!("{}", json::format_success("manifest", &applied, &warnings)?);
            } else {
                app.output.warnings(&warnings);
                app.output.ok();
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => super::fail(app, &err, err.code(), &warnings),
    }
}

/// Checks that must pass before anything is submitted: remote API version,
/// targeting, polling settings, then a readable manifest.
async fn prepare(
    app: &AppContext,
    args: &ApplyManifestArgs,
    gateway: &impl ApiInfo,
    manifests: &impl ManifestSource,
    warnings: &mut Warnings,
) -> Result<(Target, ManifestDocument, PollPolicy)> {
    let version = warnings.absorb(gateway.api_version().await)?;
    debug!(%version, minimum = MIN_VERSION_APPLY_MANIFEST, "checking API version");
    check_minimum_version(&version, MIN_VERSION_APPLY_MANIFEST)?;

    let config = config_service::load_config(&app.config_store)?;
    let target = resolve_target(&config.target)?;
    let policy = config.polling.policy()?;

    ensure_path_exists(&args.path)?;
    let manifest = manifests.load(&args.path)?;

    Ok((target, manifest, policy))
}

fn ensure_path_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!(
            "Incorrect Usage: The specified path '{}' does not exist.",
            path.display()
        );
    }
    Ok(())
}

/// Cancel `token` on the first Ctrl-C. The returned handle must be aborted
/// once the guarded work finishes.
fn cancel_on_ctrl_c(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling");
            token.cancel();
        }
    })
}

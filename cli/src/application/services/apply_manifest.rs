//! Application service: apply a manifest to a running application.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The use-case is three dependent steps: resolve the application, submit the
//! manifest, poll the resulting job. Each step's warnings are absorbed into
//! one accumulator before its error is inspected, so an early exit still
//! returns everything gathered so far.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::ports::{ApplicationGateway, Clock, JobGateway};
use crate::application::services::job_poller::poll_job;
use crate::domain::{ApiError, ManifestDocument, PollPolicy, Reply, Warnings};

/// Polling behaviour for the final step.
pub struct ApplyOptions<'a> {
    pub policy: PollPolicy,
    pub cancel: &'a CancellationToken,
}

/// Apply `manifest` to the application named by its first entry, in
/// `space_guid`, and wait for the remote job to finish.
///
/// Steps run strictly in order. Submission is skipped if the lookup fails and
/// polling is skipped if submission fails. The returned warnings are lookup,
/// then submit, then poll warnings.
pub async fn apply_manifest(
    gateway: &(impl ApplicationGateway + JobGateway),
    clock: &impl Clock,
    manifest: &ManifestDocument,
    space_guid: &str,
    opts: &ApplyOptions<'_>,
) -> Reply<()> {
    let mut warnings = Warnings::new();
    let result = run_steps(gateway, clock, manifest, space_guid, opts, &mut warnings).await;
    Reply::from_parts(result, warnings)
}

async fn run_steps(
    gateway: &(impl ApplicationGateway + JobGateway),
    clock: &impl Clock,
    manifest: &ManifestDocument,
    space_guid: &str,
    opts: &ApplyOptions<'_>,
    warnings: &mut Warnings,
) -> Result<(), ApiError> {
    let app_name = manifest.first_application_name()?;

    debug!(app_name, space_guid, "resolving application");
    let app = warnings.absorb(gateway.find_application(app_name, space_guid).await)?;

    debug!(app_guid = %app.guid, "submitting manifest");
    let job = warnings.absorb(gateway.submit_manifest_apply(manifest, &app).await)?;

    debug!(%job, "waiting for manifest job");
    warnings.absorb(poll_job(gateway, clock, &opts.policy, opts.cancel, &job).await)
}

//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::domain::{
    ApplicationRef, JobState, JobUrl, LastOperation, ManifestDocument, Reply,
    ServiceInstanceSummary, SharingStatus, StratusConfig,
};

// ── Remote gateway ports ──────────────────────────────────────────────────────
//
// Every call returns a `Reply`: the warnings the remote emitted travel with
// the result whether it succeeded or not. Implementations must not retry.

/// Remote API metadata.
#[allow(async_fn_in_trait)]
pub trait ApiInfo {
    /// Version string of the remote API, e.g. `"3.140.0"`.
    async fn api_version(&self) -> Reply<String>;
}

/// Application lookup and manifest submission.
#[allow(async_fn_in_trait)]
pub trait ApplicationGateway {
    /// Resolve an application by name within a space.
    ///
    /// Fails with `ApiError::NotFound` when no application matches.
    async fn find_application(&self, name: &str, space_guid: &str) -> Reply<ApplicationRef>;

    /// Submit `manifest` to be applied to `app`, returning the job to poll.
    ///
    /// Fails with `ApiError::Validation` for a malformed document and
    /// `ApiError::Forbidden` for authorization failures.
    async fn submit_manifest_apply(
        &self,
        manifest: &ManifestDocument,
        app: &ApplicationRef,
    ) -> Reply<JobUrl>;
}

/// Asynchronous job status.
#[allow(async_fn_in_trait)]
pub trait JobGateway {
    /// Query the current state of a job. A single query, never a wait.
    async fn job_status(&self, job: &JobUrl) -> Reply<JobState>;
}

/// Service instance queries backing the composite status report.
///
/// The three sub-queries answer `ApiError::NotApplicable` when the instance
/// kind has no such section.
#[allow(async_fn_in_trait)]
pub trait ServiceInstanceGateway {
    /// Resolve an instance by name within a space (the mandatory core lookup).
    async fn find_service_instance(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Reply<ServiceInstanceSummary>;
    /// Names of apps bound to the instance.
    async fn list_bound_apps(&self, instance: &ServiceInstanceSummary) -> Reply<Vec<String>>;
    /// Spaces the instance is shared with, plus sharing availability.
    async fn get_sharing(&self, instance: &ServiceInstanceSummary) -> Reply<SharingStatus>;
    /// Most recent asynchronous operation on the instance.
    async fn get_last_operation(&self, instance: &ServiceInstanceSummary)
    -> Reply<LastOperation>;
}

/// Composite trait: any type implementing all gateway sub-traits.
pub trait PlatformGateway: ApiInfo + ApplicationGateway + JobGateway + ServiceInstanceGateway {}

/// Blanket implementation: any type implementing all sub-traits is a `PlatformGateway`.
impl<T> PlatformGateway for T where
    T: ApiInfo + ApplicationGateway + JobGateway + ServiceInstanceGateway
{
}

// ── Clock Port ────────────────────────────────────────────────────────────────

/// Time source and wait primitive for polling loops.
///
/// Abstracted so tests can run against virtual time.
#[allow(async_fn_in_trait)]
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults if none exists.
    fn load(&self) -> Result<StratusConfig>;
    /// Persist the configuration.
    fn save(&self, config: &StratusConfig) -> Result<()>;
    /// Location the configuration is read from and written to.
    fn path(&self) -> Result<PathBuf>;
}

// ── Manifest Port ─────────────────────────────────────────────────────────────

/// Produces an already-parsed, already-merged manifest document.
pub trait ManifestSource {
    /// Read the manifest at `path`.
    fn load(&self, path: &Path) -> Result<ManifestDocument>;
}

//! Application service: wait for an asynchronous job to finish.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All waiting goes through the injected `Clock`.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::ports::{Clock, JobGateway};
use crate::domain::{ApiError, JobState, JobUrl, PollPolicy, Reply, Warnings};

/// Poll `job` until it succeeds, fails, times out, or `cancel` fires.
///
/// Warnings from every status query are kept, including repeats. A remote
/// failure comes back as `RemoteJobFailed` with the remote's reason, an
/// exhausted budget as `JobTimeout`, and cancellation as `Cancelled`, whether
/// it fires during a wait or during a status query. At least one status query
/// is made unless `cancel` has already fired.
pub async fn poll_job(
    jobs: &impl JobGateway,
    clock: &impl Clock,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    job: &JobUrl,
) -> Reply<()> {
    let mut warnings = Warnings::new();
    let result = poll_until_terminal(jobs, clock, policy, cancel, job, &mut warnings).await;
    Reply::from_parts(result, warnings)
}

async fn poll_until_terminal(
    jobs: &impl JobGateway,
    clock: &impl Clock,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    job: &JobUrl,
    warnings: &mut Warnings,
) -> Result<(), ApiError> {
    let started = clock.now();
    let mut backoff = policy.backoff();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        // A status query abandoned here loses its own warnings only.
        let status = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ApiError::Cancelled),
            reply = jobs.job_status(job) => reply,
        };
        let state = warnings.absorb(status)?;
        debug!(%job, attempt, ?state, "polled job");

        match state {
            JobState::Succeeded => return Ok(()),
            JobState::Failed(reason) => return Err(ApiError::RemoteJobFailed { reason }),
            JobState::Processing => {}
        }

        let elapsed = clock.now().saturating_duration_since(started);
        let interval = backoff.next().unwrap_or(policy.max_interval);
        let Some(wait) = policy.clip(interval, elapsed) else {
            return Err(ApiError::JobTimeout {
                job_url: job.to_string(),
                waited: elapsed,
            });
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ApiError::Cancelled),
            () = clock.sleep(wait) => {}
        }
    }
}

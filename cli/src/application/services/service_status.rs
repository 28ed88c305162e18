//! Application service: service instance status gathering use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The core lookup is mandatory. The bound-apps, sharing and last-operation
//! sub-queries then run concurrently; each may come back `NotApplicable`
//! (absent section), fail (absent section plus a warning), or succeed.
//! Warnings are merged in section order, never completion order.

use tracing::{debug, warn};

use crate::application::ports::ServiceInstanceGateway;
use crate::domain::{ApiError, CompositeStatus, Reply, Section, Warnings};

/// Build the composite status of the service instance `name` in `space_guid`.
///
/// Only a failure of the core lookup makes the whole reply an error.
pub async fn describe_service_instance(
    gateway: &impl ServiceInstanceGateway,
    name: &str,
    space_guid: &str,
) -> Reply<CompositeStatus> {
    let mut warnings = Warnings::new();

    let instance = match warnings.absorb(gateway.find_service_instance(name, space_guid).await) {
        Ok(instance) => instance,
        Err(err) => return Reply::err(err, warnings),
    };
    debug!(guid = %instance.guid, kind = ?instance.kind, "service instance resolved");

    let (bindings, sharing, last_operation) = tokio::join!(
        gateway.list_bound_apps(&instance),
        gateway.get_sharing(&instance),
        gateway.get_last_operation(&instance),
    );

    let bound_apps = optional_section(Section::Bindings, bindings, &mut warnings);
    let sharing = optional_section(Section::Sharing, sharing, &mut warnings);
    let last_operation = optional_section(Section::LastOperation, last_operation, &mut warnings);

    Reply::ok(
        CompositeStatus {
            instance,
            bound_apps,
            sharing,
            last_operation,
        },
        warnings,
    )
}

/// Resolve only the GUID of the service instance `name` in `space_guid`.
pub async fn service_instance_guid(
    gateway: &impl ServiceInstanceGateway,
    name: &str,
    space_guid: &str,
) -> Reply<String> {
    gateway
        .find_service_instance(name, space_guid)
        .await
        .map(|instance| instance.guid)
}

/// Fold one sub-query reply into the accumulator.
///
/// `NotApplicable` yields an absent section silently; any other error yields
/// an absent section and a warning.
fn optional_section<T>(section: Section, reply: Reply<T>, warnings: &mut Warnings) -> Option<T> {
    match warnings.absorb(reply) {
        Ok(value) => Some(value),
        Err(ApiError::NotApplicable) => {
            debug!(?section, "section not applicable");
            None
        }
        Err(err) => {
            warn!(?section, error = %err, "section unavailable");
            warnings.push(format!("Unable to retrieve {}: {err}", section.describe()));
            None
        }
    }
}

//! Service instance types and the composite status report.
//!
//! A composite status is assembled from several independent remote queries.
//! Optional sections are `None` when the instance kind does not support them
//! or when their query failed (the failure then shows up as a warning).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an instance is broker-managed or user-provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceInstanceKind {
    Managed,
    UserProvided,
}

/// Org and space names identifying where an instance lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRef {
    pub org_name: String,
    pub space_name: String,
}

/// Offering and plan details of a managed instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub name: String,
    pub plan: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    /// Whether the broker allows this offering to be shared.
    pub shareable: bool,
}

/// Core lookup result: the basic info section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstanceSummary {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    pub kind: ServiceInstanceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offering: Option<ServiceOffering>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    /// Set when the instance is shared into the queried space from elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_from: Option<SpaceRef>,
}

impl ServiceInstanceSummary {
    /// Label shown on the `service:` line.
    #[must_use]
    pub fn service_label(&self) -> &str {
        match (&self.kind, &self.offering) {
            (ServiceInstanceKind::Managed, Some(offering)) => &offering.name,
            (ServiceInstanceKind::Managed, None) => "",
            (ServiceInstanceKind::UserProvided, _) => "user-provided",
        }
    }
}

/// A space an instance is shared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSpace {
    pub org_name: String,
    pub space_name: String,
    pub bound_app_count: u32,
}

/// Sharing relationships of an instance owned by the queried space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingStatus {
    pub shared_with: Vec<SharedSpace>,
    /// Platform-wide `service_instance_sharing` feature flag.
    pub feature_flag_enabled: bool,
    /// Broker-level shareability of the offering.
    pub offering_shareable: bool,
}

/// Why sharing is currently unavailable, if it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharingRestriction {
    FeatureFlagDisabled,
    OfferingNotShareable,
    Both,
}

impl SharingStatus {
    #[must_use]
    pub fn restriction(&self) -> Option<SharingRestriction> {
        match (self.feature_flag_enabled, self.offering_shareable) {
            (true, true) => None,
            (false, true) => Some(SharingRestriction::FeatureFlagDisabled),
            (true, false) => Some(SharingRestriction::OfferingNotShareable),
            (false, false) => Some(SharingRestriction::Both),
        }
    }
}

/// The most recent asynchronous operation on an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperation {
    /// Operation type, e.g. `create` or `update`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Operation state, e.g. `succeeded` or `in progress`.
    pub state: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LastOperation {
    /// `"<type> <state>"`, e.g. `create succeeded`.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("{} {}", self.kind, self.state)
    }
}

/// Report sections, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    BasicInfo,
    Bindings,
    Sharing,
    LastOperation,
}

impl Section {
    pub const ORDER: [Section; 4] = [
        Section::BasicInfo,
        Section::Bindings,
        Section::Sharing,
        Section::LastOperation,
    ];

    /// Noun used in downgraded-failure warnings.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::BasicInfo => "service instance",
            Self::Bindings => "bound apps",
            Self::Sharing => "sharing information",
            Self::LastOperation => "last operation",
        }
    }
}

/// Aggregated view of one service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeStatus {
    pub instance: ServiceInstanceSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_apps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharing: Option<SharingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_operation: Option<LastOperation>,
}

impl CompositeStatus {
    /// Sections that carry data, always in [`Section::ORDER`].
    #[must_use]
    pub fn present_sections(&self) -> Vec<Section> {
        Section::ORDER
            .into_iter()
            .filter(|section| match section {
                Section::BasicInfo => true,
                Section::Bindings => self.bound_apps.is_some(),
                Section::Sharing => self.sharing.is_some(),
                Section::LastOperation => self.last_operation.is_some(),
            })
            .collect()
    }
}

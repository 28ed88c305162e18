//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod application;
pub mod config;
pub mod error;
pub mod manifest;
pub mod polling;
pub mod service_instance;
pub mod target;
pub mod warnings;

pub use application::{ApplicationRef, JobState, JobUrl};
pub use config::{StratusConfig, validate_config_key, validate_config_value};
pub use error::{ApiError, ConfigError, TargetError};
pub use manifest::{ManifestApplication, ManifestDocument};
pub use polling::PollPolicy;
pub use service_instance::{
    CompositeStatus, LastOperation, Section, ServiceInstanceKind, ServiceInstanceSummary,
    SharingStatus,
};
pub use target::{Target, check_minimum_version, resolve_target};
pub use warnings::{Reply, Warnings};

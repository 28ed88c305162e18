//! Unit tests for the stratus CLI
//!
//! These tests use scripted gateways and a virtual clock, and run fast
//! without network access.

mod job_poller;
mod service_status_service;

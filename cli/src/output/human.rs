//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::config::{StratusConfig, mask_secret};
use crate::domain::service_instance::{LastOperation, SharingRestriction, SharingStatus};
use crate::domain::{CompositeStatus, Section, ServiceInstanceKind};
use crate::output::OutputContext;

const FEATURE_FLAG_DISABLED: &str =
    r#"The "service_instance_sharing" feature flag is disabled for this platform."#;
const OFFERING_NOT_SHAREABLE: &str = "Service instance sharing is disabled for this service.";

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("stratus {version}");
    }

    /// Render a service instance's composite status, absent sections omitted.
    pub fn render_service_status(&self, name: &str, status: &CompositeStatus) {
        println!();
        for section in status.present_sections() {
            match section {
                Section::BasicInfo => {
                    for line in basic_info_lines(status) {
                        println!("{line}");
                    }
                }
                // Rendered inside the basic info block.
                Section::Bindings => {}
                Section::Sharing => {
                    if let Some(sharing) = &status.sharing {
                        println!();
                        for line in sharing_lines(sharing) {
                            println!("{line}");
                        }
                    }
                }
                Section::LastOperation => {
                    if let Some(op) = &status.last_operation {
                        println!();
                        println!(
                            "{}",
                            format!("Showing status of last operation from service {name}...")
                                .style(self.ctx.styles.bold)
                        );
                        println!();
                        for line in last_operation_lines(op) {
                            println!("{line}");
                        }
                    }
                }
            }
        }
    }

    /// Render the current stratus configuration.
    pub fn render_config(&self, config: &StratusConfig, path: &std::path::Path) {
        let unset = || "(not set)".to_string();
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!(
            "  {:<28} {}",
            "api.endpoint:",
            config.api.endpoint.clone().unwrap_or_else(unset)
        );
        println!(
            "  {:<28} {}",
            "api.token:",
            config.api.token.as_deref().map_or_else(unset, mask_secret)
        );
        println!(
            "  {:<28} {}",
            "api.skip_ssl_validation:", config.api.skip_ssl_validation
        );
        println!(
            "  {:<28} {}",
            "target.user:",
            config.target.user.clone().unwrap_or_else(unset)
        );
        println!(
            "  {:<28} {}",
            "target.org:",
            config.target.org.clone().unwrap_or_else(unset)
        );
        println!(
            "  {:<28} {}",
            "target.space:",
            config.target.space.clone().unwrap_or_else(unset)
        );
        println!(
            "  {:<28} {}",
            "target.space_guid:",
            config.target.space_guid.clone().unwrap_or_else(unset)
        );
        println!(
            "  {:<28} {}",
            "polling.interval_secs:", config.polling.interval_secs
        );
        println!(
            "  {:<28} {}",
            "polling.max_interval_secs:", config.polling.max_interval_secs
        );
        println!(
            "  {:<28} {}",
            "polling.timeout_secs:", config.polling.timeout_secs
        );
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["STRATUS_CONFIG", "STRATUS_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}

fn kv(key: &str, value: &str) -> String {
    let label = format!("{key}:");
    if value.is_empty() {
        return label;
    }
    format!("{label:<24}{value}")
}

/// Lines of the basic info block, bound apps included.
#[must_use]
pub fn basic_info_lines(status: &CompositeStatus) -> Vec<String> {
    let instance = &status.instance;
    let mut lines = vec![kv("name", &instance.name)];

    if let Some(from) = &instance.shared_from {
        lines.push(kv(
            "shared from org/space",
            &format!("{} / {}", from.org_name, from.space_name),
        ));
    }
    lines.push(kv("service", instance.service_label()));
    if let Some(apps) = &status.bound_apps {
        lines.push(kv("bound apps", &apps.join(", ")));
    }
    if !instance.tags.is_empty() {
        lines.push(kv("tags", &instance.tags.join(", ")));
    }
    if instance.kind == ServiceInstanceKind::Managed {
        if let Some(offering) = &instance.offering {
            lines.push(kv("plan", &offering.plan));
            lines.push(kv("description", &offering.description));
            lines.push(kv(
                "documentation",
                offering.documentation_url.as_deref().unwrap_or_default(),
            ));
        }
        lines.push(kv(
            "dashboard",
            instance.dashboard_url.as_deref().unwrap_or_default(),
        ));
    }
    lines
}

/// Lines of the sharing section.
#[must_use]
pub fn sharing_lines(sharing: &SharingStatus) -> Vec<String> {
    let mut lines = Vec::new();
    match sharing.restriction() {
        Some(SharingRestriction::FeatureFlagDisabled) => {
            lines.push(FEATURE_FLAG_DISABLED.to_string());
        }
        Some(SharingRestriction::OfferingNotShareable) => {
            lines.push(OFFERING_NOT_SHAREABLE.to_string());
        }
        Some(SharingRestriction::Both) => {
            lines.push(format!("{FEATURE_FLAG_DISABLED} Also, service instance sharing is disabled for this service."));
        }
        None => {}
    }

    if sharing.shared_with.is_empty() {
        if sharing.restriction().is_none() {
            lines.push("This service is not currently shared.".to_string());
        }
        return lines;
    }

    let org_width = column_width("org", sharing.shared_with.iter().map(|s| s.org_name.as_str()));
    let space_width = column_width(
        "space",
        sharing.shared_with.iter().map(|s| s.space_name.as_str()),
    );
    lines.push("shared with spaces:".to_string());
    lines.push(format!("{:<org_width$}   {:<space_width$}   bindings", "org", "space"));
    for space in &sharing.shared_with {
        let bindings = if space.bound_app_count > 0 {
            space.bound_app_count.to_string()
        } else {
            String::new()
        };
        lines.push(
            format!(
                "{:<org_width$}   {:<space_width$}   {bindings}",
                space.org_name, space.space_name
            )
            .trim_end()
            .to_string(),
        );
    }
    lines
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).chain(std::iter::once(header.len())).max().unwrap_or(0)
}

/// Lines of the last-operation section.
#[must_use]
pub fn last_operation_lines(op: &LastOperation) -> Vec<String> {
    let timestamp = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            .unwrap_or_default()
    };
    vec![
        kv("status", &op.status_line()),
        kv("message", &op.description),
        kv("started", &timestamp(op.created_at)),
        kv("updated", &timestamp(op.updated_at)),
    ]
}

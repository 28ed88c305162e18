//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod styles;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use styles::Styles;

use crate::domain::config::StratusConfig;
use crate::domain::{CompositeStatus, Warnings};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print every remote warning to stderr, in order. Never suppressed.
    pub fn warnings(&self, warnings: &Warnings) {
        for warning in warnings {
            eprintln!("{}", warning.style(self.styles.warning));
        }
    }

    /// Print a plain progress line (`Applying manifest...`). Suppressed when `quiet`.
    pub fn line(&self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    /// Print the `OK` trailer. Suppressed when `quiet`.
    pub fn ok(&self) {
        if !self.quiet {
            println!();
            println!("{}", "OK".style(self.styles.success));
        }
    }

    /// Print the `FAILED` marker and the error to stderr. Never suppressed.
    pub fn failed(&self, msg: &str) {
        println!("{}", "FAILED".style(self.styles.error));
        eprintln!("{msg}");
    }
}

/// Renders machine-readable JSON to stdout.
pub struct JsonRenderer;

/// Output renderer selected by `--json`.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render a composite service status.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_service_status(
        &self,
        name: &str,
        status: &CompositeStatus,
        warnings: &Warnings,
    ) -> Result<()> {
        match self {
            Self::Human(h) => h.render_service_status(name, status),
            Self::Json(_) => println!("{}", json::format_success("status", status, warnings)?),
        }
        Ok(())
    }

    /// Render the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &StratusConfig, path: &std::path::Path) -> Result<()> {
        match self {
            Self::Human(h) => h.render_config(config, path),
            Self::Json(_) => {
                let mut redacted = config.clone();
                redacted.api.token = redacted
                    .api
                    .token
                    .as_deref()
                    .map(crate::domain::config::mask_secret);
                println!(
                    "{}",
                    json::format_success("config", &redacted, &Warnings::new())?
                );
            }
        }
        Ok(())
    }
}

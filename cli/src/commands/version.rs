//! Version command

use crate::app::AppContext;
use crate::output::Renderer;

/// Run the version command.
pub fn run(app: &AppContext) {
    let version = env!("CARGO_PKG_VERSION");

    match app.renderer() {
        Renderer::Human(h) => h.render_version(version),
        Renderer::Json(_) => println!(r#"{{"version":"{version}"}}"#),
    }
}

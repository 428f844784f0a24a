// Output generation module

pub mod sink;
pub mod templates;
pub mod visual;

pub use sink::*;
pub use templates::*;
pub use visual::*;

use crate::config::OutputFormat;
use crate::error::Result;

/// Render a visual spec in the requested format
pub fn render_artifact(spec: &VisualSpec, format: OutputFormat) -> Result<Artifact> {
    let contents = match format {
        OutputFormat::Html => TemplateEngine::new()?.render_network(spec)?,
        OutputFormat::Json => serde_json::to_string_pretty(spec)?,
    };

    Ok(Artifact { format, contents })
}

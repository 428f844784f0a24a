// Template engine for generating the HTML page

use crate::error::Result;
use crate::output::visual::VisualSpec;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Script that provides the `vis` network renderer in the page
pub const RENDERER_URL: &str = "https://unpkg.com/vis-network/standalone/umd/vis-network.min.js";

const PAGE_TITLE: &str = "Connected Papers";

/// Template engine wrapping Tera with custom filters and templates
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create a new template engine with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("network.html", include_str!("../../templates/network.html.tera"))?;
        tera.register_filter("pluralize", pluralize);

        Ok(Self { tera })
    }

    /// Render the network page: graph canvas, paper list and detail panel
    pub fn render_network(&self, spec: &VisualSpec) -> Result<String> {
        let mut context = Context::new();
        context.insert("page_title", PAGE_TITLE);
        context.insert("renderer_url", RENDERER_URL);
        context.insert("papers", &spec.papers);
        context.insert("link_count", &spec.edges.len());
        context.insert("nodes_json", &script_json(&spec.nodes)?);
        context.insert("edges_json", &script_json(&spec.edges)?);
        context.insert("options_json", &script_json(&spec.options)?);
        context.insert("freeze_after_stabilization", &spec.freeze_after_stabilization);

        Ok(self.tera.render("network.html", &context)?)
    }
}

/// Serialize a value as JSON that can sit inside a `<script>` element
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/"))
}

/// Pluralize a word based on count
fn pluralize(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let count = value.as_u64().unwrap_or(0);
    let singular = args
        .get("singular")
        .and_then(|v| v.as_str())
        .unwrap_or("item");
    let default_plural = format!("{}s", singular);
    let plural = args
        .get("plural")
        .and_then(|v| v.as_str())
        .unwrap_or(&default_plural);

    if count == 1 {
        Ok(Value::String(format!("{} {}", count, singular)))
    } else {
        Ok(Value::String(format!("{} {}", count, plural)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::OverlapGraph;
    use crate::config::Config;
    use crate::extract::record::record_with_refs;
    use crate::extract::PaperRecord;
    use crate::output::visual::VisualizationExporter;

    fn spec_for(records: Vec<PaperRecord>) -> VisualSpec {
        let graph = OverlapGraph::build(&records);
        VisualizationExporter::new(&Config::default()).export(&records, &graph)
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let json = script_json(&vec!["</script><script>alert(1)"]).unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains("<\\/script>"));
    }

    #[test]
    fn test_render_network_page() {
        let spec = spec_for(vec![
            record_with_refs("Paper One", &["x"]),
            record_with_refs("Paper Two", &["x"]),
        ]);
        let html = TemplateEngine::new().unwrap().render_network(&spec).unwrap();

        assert!(html.contains(RENDERER_URL));
        assert!(html.contains("All Papers (2)"));
        assert!(html.contains("2 papers, 1 shared-reference link"));
        assert!(html.contains("Paper One"));
        assert!(html.contains("new vis.DataSet("));
        assert!(html.contains("\"forceAtlas2Based\""));
        assert!(html.contains("\"shape\":\"dot\""));
        assert!(html.contains("hoverNode"));
        assert!(html.contains("network.setOptions({ physics: false })"));
    }

    #[test]
    fn test_render_without_freeze() {
        let mut spec = spec_for(vec![record_with_refs("Only", &[])]);
        spec.freeze_after_stabilization = false;
        let html = TemplateEngine::new().unwrap().render_network(&spec).unwrap();
        assert!(!html.contains("stabilizationIterationsDone"));
    }

    #[test]
    fn test_paper_titles_are_escaped() {
        let spec = spec_for(vec![record_with_refs("<b>Bold</b> & Brave", &[])]);
        let html = TemplateEngine::new().unwrap().render_network(&spec).unwrap();
        assert!(html.contains("&lt;b&gt;Bold&lt;&#x2F;b&gt; &amp; Brave"));
    }

    #[test]
    fn test_pluralize_singular() {
        let value = Value::Number(1.into());
        let mut args = HashMap::new();
        args.insert("singular".to_string(), Value::String("paper".to_string()));

        let result = pluralize(&value, &args).unwrap();
        assert_eq!(result.as_str().unwrap(), "1 paper");
    }

    #[test]
    fn test_pluralize_zero() {
        let value = Value::Number(0.into());
        let mut args = HashMap::new();
        args.insert("singular".to_string(), Value::String("link".to_string()));

        let result = pluralize(&value, &args).unwrap();
        assert_eq!(result.as_str().unwrap(), "0 links");
    }
}

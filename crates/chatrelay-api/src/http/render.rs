//! Landing/result page rendering.
//!
//! The template is compiled into the binary. `PageView` is also what a JSON
//! client gets back from `POST /query`, so both representations carry the
//! same three fields.

use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};

use chatrelay_core::turn::TurnOutcome;
use chatrelay_types::turn::HistoryEntry;

const PAGE_TEMPLATE: &str = "index.html";

/// Shown when a turn fails for any reason.
pub const FAILURE_TEXT: &str = "FastAPI 호출 실패.";

/// Data behind one rendering of the page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub response_text: Option<String>,
    pub response_data: Option<Value>,
    pub history: Vec<HistoryEntry>,
}

impl PageView {
    /// Initial page: no response yet, just history.
    pub fn landing(history: Vec<HistoryEntry>) -> Self {
        Self {
            response_text: None,
            response_data: None,
            history,
        }
    }

    pub fn from_outcome(outcome: TurnOutcome) -> Self {
        Self {
            response_text: Some(outcome.generated_text),
            response_data: Some(outcome.raw),
            history: outcome.history,
        }
    }

    /// The fixed failure page. Nothing from the failed turn is exposed.
    pub fn failure() -> Self {
        Self {
            response_text: Some(FAILURE_TEXT.to_string()),
            response_data: None,
            history: Vec::new(),
        }
    }
}

/// Holds the compiled page template.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(
            PAGE_TEMPLATE,
            include_str!("../../templates/index.html.tera"),
        )?;
        Ok(Self { tera })
    }

    /// Render the page. HTML in prompts and responses is escaped.
    pub fn render(&self, view: &PageView) -> Result<String, tera::Error> {
        let mut context = Context::from_serialize(view)?;
        let pretty = match &view.response_data {
            Some(data) => Some(serde_json::to_string_pretty(data).map_err(tera::Error::json)?),
            None => None,
        };
        context.insert("responseDataPretty", &pretty);
        self.tera.render(PAGE_TEMPLATE, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_landing_page_without_history() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&PageView::default()).unwrap();
        assert!(html.contains("<form"));
        assert!(html.contains("action=\"/query\""));
        assert!(!html.contains("FastAPI"));
    }

    #[test]
    fn test_page_shows_history_in_order() {
        let renderer = PageRenderer::new().unwrap();
        let view = PageView::landing(vec![
            HistoryEntry::user("first question"),
            HistoryEntry::assistant("first answer"),
            HistoryEntry::user("second question"),
            HistoryEntry::assistant("second answer"),
        ]);
        let html = renderer.render(&view).unwrap();

        let first = html.find("first question").unwrap();
        let second = html.find("second question").unwrap();
        assert!(first < html.find("first answer").unwrap());
        assert!(first < second);
    }

    #[test]
    fn test_page_shows_response_and_data() {
        let renderer = PageRenderer::new().unwrap();
        let view = PageView {
            response_text: Some("A fun fact".to_string()),
            response_data: Some(json!({"generated_text": "A fun fact", "usage": {"total_tokens": 7}})),
            history: Vec::new(),
        };
        let html = renderer.render(&view).unwrap();
        assert!(html.contains("A fun fact"));
        assert!(html.contains("total_tokens"));
    }

    #[test]
    fn test_failure_page() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer.render(&PageView::failure()).unwrap();
        assert!(html.contains(FAILURE_TEXT));
    }

    #[test]
    fn test_markup_is_escaped() {
        let renderer = PageRenderer::new().unwrap();
        let view = PageView::landing(vec![HistoryEntry::user("<script>alert(1)</script>")]);
        let html = renderer.render(&view).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_view_serializes_with_page_field_names() {
        let value = serde_json::to_value(PageView::failure()).unwrap();
        assert_eq!(value["responseText"], FAILURE_TEXT);
        assert!(value["responseData"].is_null());
        assert_eq!(value["history"], json!([]));
    }
}

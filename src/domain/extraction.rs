use indexmap::IndexMap;
use serde_json::{json, Value};

/// One field the external service is asked to extract from a page.
pub struct SchemaField {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Declared set of fields plus the natural-language instruction sent to the
/// extraction service alongside them.
pub struct ExtractionSchema {
    pub fields: Vec<SchemaField>,
    pub instruction: &'static str,
}

impl ExtractionSchema {
    /// The one schema this app asks for: page title plus an optional
    /// meta description or summary.
    pub fn page_summary() -> Self {
        ExtractionSchema {
            fields: vec![
                SchemaField {
                    name: "title",
                    description: "Page title",
                    required: true,
                },
                SchemaField {
                    name: "description",
                    description: "Meta description or summary",
                    required: false,
                },
            ],
            instruction: "Extract the page title and description",
        }
    }

    /// Render the declared fields as a JSON Schema object the service accepts.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required: Vec<Value> = vec![];

        for field in &self.fields {
            properties.insert(
                field.name.to_string(),
                json!({
                    "type": "string",
                    "description": field.description,
                }),
            );
            if field.required {
                required.push(Value::String(field.name.to_string()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Outcome of one extraction call.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    Extracted(Value),
    Failed(String),
}

impl ScrapeOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ScrapeOutcome::Failed(_))
    }

    /// The JSON payload rendered for this outcome. Failures collapse to a
    /// single-key `{"error": <message>}` object.
    pub fn to_payload(&self) -> Value {
        match self {
            ScrapeOutcome::Extracted(fields) => fields.clone(),
            ScrapeOutcome::Failed(message) => json!({ "error": message }),
        }
    }
}

/// URL-keyed outcomes for one submission batch.
///
/// Keys are unique; iteration order follows the first occurrence of each URL
/// in the input. Recording a URL twice keeps its position and replaces the
/// outcome, so duplicate input lines collapse to one entry with the last
/// call's result.
#[derive(Default)]
pub struct BatchResults {
    entries: IndexMap<String, ScrapeOutcome>,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, url: String, outcome: ScrapeOutcome) {
        self.entries.insert(url, outcome);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScrapeOutcome)> {
        self.entries
            .iter()
            .map(|(url, outcome)| (url.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&ScrapeOutcome> {
        self.entries.get(url)
    }
}

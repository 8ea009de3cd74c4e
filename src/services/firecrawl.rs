use std::error::Error;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::{BatchResults, ExtractionSchema, ScrapeOutcome};

/// Issues one extraction call per URL. The only implementation outside of
/// tests is [`FirecrawlClient`].
#[async_trait]
pub trait Extractor {
    async fn extract(
        &self,
        url: &str,
        schema: &ExtractionSchema,
    ) -> Result<Value, Box<dyn Error + Send + Sync>>;
}

pub struct FirecrawlClient {
    client: Client,
    api_key: Option<String>,
    url: String,
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<&'static str>,
    extract: ExtractParams,
}

#[derive(Serialize)]
struct ExtractParams {
    schema: Value,
    prompt: String,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    extract: Option<Value>,
}

impl FirecrawlClient {
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::new();

        FirecrawlClient {
            client,
            api_key,
            url: "https://api.firecrawl.dev/v1/scrape".to_string(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Extractor for FirecrawlClient {
    async fn extract(
        &self,
        url: &str,
        schema: &ExtractionSchema,
    ) -> Result<Value, Box<dyn Error + Send + Sync>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or("Firecrawl API key is not configured")?;

        let request = ScrapeRequest {
            url,
            formats: vec!["extract"],
            extract: ExtractParams {
                schema: schema.to_json_schema(),
                prompt: schema.instruction.to_string(),
            },
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("firecrawl api error (status {}): {}", status, body).into());
        }

        let response = response.json::<ScrapeResponse>().await?;
        if !response.success {
            return Err(response
                .error
                .unwrap_or_else(|| "scrape failed without a message".to_string())
                .into());
        }

        // The service may omit the extract block on an otherwise successful
        // scrape; render that as an empty object rather than a failure.
        Ok(response
            .data
            .and_then(|data| data.extract)
            .unwrap_or_else(|| json!({})))
    }
}

/// Scrape every URL in order, one call at a time. A failing URL is logged and
/// recorded as an error outcome; the batch always runs to completion.
pub async fn scrape_urls<E: Extractor>(
    extractor: &E,
    urls: &[String],
    schema: &ExtractionSchema,
) -> BatchResults {
    let mut results = BatchResults::new();

    for url in urls {
        match extractor.extract(url, schema).await {
            Ok(fields) => {
                log::info!("Extracted fields from {}", url);
                results.record(url.clone(), ScrapeOutcome::Extracted(fields));
            }
            Err(e) => {
                log::error!("Failed to scrape {}: {}", url, e);
                results.record(url.clone(), ScrapeOutcome::Failed(e.to_string()));
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::error::Error;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::domain::{ExtractionSchema, ScrapeOutcome};
    use crate::services::firecrawl::{scrape_urls, ExtractParams, Extractor, ScrapeRequest};

    struct StubExtractor {
        failing: HashSet<&'static str>,
    }

    impl StubExtractor {
        fn failing_on(urls: &[&'static str]) -> Self {
            StubExtractor {
                failing: urls.iter().copied().collect(),
            }
        }
    }

    #[async_trait]
    impl Extractor for StubExtractor {
        async fn extract(
            &self,
            url: &str,
            _schema: &ExtractionSchema,
        ) -> Result<Value, Box<dyn Error + Send + Sync>> {
            if self.failing.contains(url) {
                return Err("stubbed network failure".into());
            }
            Ok(json!({ "title": url }))
        }
    }

    fn urls(input: &[&str]) -> Vec<String> {
        input.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn one_entry_per_url_in_input_order() {
        let extractor = StubExtractor::failing_on(&[]);
        let input = urls(&["https://a.com", "https://b.com", "https://c.com"]);

        let results = scrape_urls(&extractor, &input, &ExtractionSchema::page_summary()).await;

        assert_eq!(results.len(), 3);
        let keys: Vec<&str> = results.iter().map(|(url, _)| url).collect();
        assert_eq!(keys, vec!["https://a.com", "https://b.com", "https://c.com"]);
    }

    #[tokio::test]
    async fn failure_is_recorded_and_batch_continues() {
        let extractor = StubExtractor::failing_on(&["https://b.com"]);
        let input = urls(&["https://a.com", "https://b.com", "https://c.com"]);

        let results = scrape_urls(&extractor, &input, &ExtractionSchema::page_summary()).await;

        assert_eq!(results.len(), 3);
        let outcomes: Vec<bool> = results.iter().map(|(_, o)| o.is_error()).collect();
        assert_eq!(outcomes, vec![false, true, false]);

        match results.get("https://b.com") {
            Some(ScrapeOutcome::Failed(message)) => assert!(!message.is_empty()),
            other => panic!("expected an error outcome, got {:?}", other),
        }
        assert_eq!(
            results.get("https://c.com"),
            Some(&ScrapeOutcome::Extracted(json!({ "title": "https://c.com" })))
        );
    }

    #[tokio::test]
    async fn duplicate_urls_collapse_to_one_entry() {
        let extractor = StubExtractor::failing_on(&[]);
        let input = urls(&["https://a.com", "https://b.com", "https://a.com"]);

        let results = scrape_urls(&extractor, &input, &ExtractionSchema::page_summary()).await;

        assert_eq!(results.len(), 2);
    }

    #[test]
    fn scrape_request_wire_shape() {
        let schema = ExtractionSchema::page_summary();
        let request = ScrapeRequest {
            url: "https://example.com",
            formats: vec!["extract"],
            extract: ExtractParams {
                schema: schema.to_json_schema(),
                prompt: schema.instruction.to_string(),
            },
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["url"], "https://example.com");
        assert_eq!(body["formats"], json!(["extract"]));
        assert_eq!(
            body["extract"]["prompt"],
            "Extract the page title and description"
        );
        assert_eq!(body["extract"]["schema"]["required"], json!(["title"]));
    }
}

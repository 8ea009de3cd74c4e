use actix_web::{post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;

use crate::{
    domain::ExtractionSchema,
    routes::home_route::IndexTemplate,
    services::{scrape_urls, FirecrawlClient},
};

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate {
    entries: Vec<ResultEntry>,
}

struct ResultEntry {
    url: String,
    body: String,
    is_error: bool,
}

#[derive(Deserialize)]
struct ScrapeFormBody {
    urls: String,
}

#[post("/scrape")]
async fn scrape(
    firecrawl: web::Data<FirecrawlClient>,
    body: web::Form<ScrapeFormBody>,
) -> HttpResponse {
    let urls = parse_url_lines(&body.urls);

    if let Some(message) = validate_submission(&urls, firecrawl.has_credential()) {
        return HttpResponse::Ok().body(
            IndexTemplate {
                error: Some(message.to_string()),
                urls: body.urls.clone(),
            }
            .render()
            .unwrap(),
        );
    }

    let schema = ExtractionSchema::page_summary();
    let results = scrape_urls(firecrawl.get_ref(), &urls, &schema).await;

    let entries = results
        .iter()
        .map(|(url, outcome)| ResultEntry {
            url: url.to_string(),
            body: serde_json::to_string_pretty(&outcome.to_payload())
                .unwrap_or_else(|_| "{}".to_string()),
            is_error: outcome.is_error(),
        })
        .collect();

    HttpResponse::Ok().body(ResultsTemplate { entries }.render().unwrap())
}

fn parse_url_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_submission(urls: &[String], has_credential: bool) -> Option<&'static str> {
    if urls.is_empty() {
        return Some("Please enter at least one URL.");
    }
    if !has_credential {
        return Some("API key not found. Set FIRECRAWL_API_KEY or add it to configuration.yaml.");
    }
    None
}

use actix_web::{get, HttpResponse};
use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub(crate) struct IndexTemplate {
    pub error: Option<String>,
    pub urls: String,
}

#[get("/")]
async fn home() -> HttpResponse {
    HttpResponse::Ok().body(
        IndexTemplate {
            error: None,
            urls: String::new(),
        }
        .render()
        .unwrap(),
    )
}

use std::net::TcpListener;

use actix_files::Files;
use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    routes::{home_route, scrape_route},
    services::FirecrawlClient,
};

pub fn run(
    listener: TcpListener,
    firecrawl_client: FirecrawlClient,
) -> Result<Server, std::io::Error> {
    let firecrawl_client = web::Data::new(firecrawl_client);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", "./templates/static").prefer_utf8(true))
            .service(home_route::home)
            .service(scrape_route::scrape)
            .app_data(firecrawl_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

use std::{future::ready, sync::Arc};
use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer, Route};

use crate::config::Http;
use crate::handlers::{Handler, ResponseWriter};

/// Runs `handler` against a fresh [`ResponseWriter`] and converts the result.
pub fn dispatch(handler: &dyn Handler, req: &HttpRequest) -> HttpResponse {
    let mut w = ResponseWriter::new();
    handler.serve(req, &mut w);
    w.into_response()
}

/// An actix-web route that answers every request with `handler`.
pub fn default_service(handler: Arc<dyn Handler>) -> Route {
    web::to(move |req: HttpRequest| ready(dispatch(handler.as_ref(), &req)))
}

pub async fn run(http: &Http, handler: Arc<dyn Handler>) -> std::io::Result<()> {
    log::info!("listening on http://{}:{}", http.hostname, http.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .default_service(default_service(handler.clone()))
    })
    .bind((http.hostname.clone(), http.port))?
    .run()
    .await
}

use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpMessage, HttpRequest, HttpResponse, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::ctx::ServiceCtx;
use crate::io::json_writer;
use crate::schema::v1::HealthResponse;
use crate::scores::risk;

pub mod error;
pub mod payload;

pub use error::ApiError;

pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate, max-age=0";

#[derive(Debug, Clone)]
pub struct ServerCfg {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

pub fn no_cache_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CACHE_CONTROL, NO_CACHE))
        .add((header::PRAGMA, "no-cache"))
        .add((header::EXPIRES, "0"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/features").route(web::get().to(features)))
        .service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/health").route(web::get().to(health)));
}

pub async fn run(ctx: ServiceCtx, cfg: &ServerCfg) -> Result<()> {
    let data = web::Data::new(ctx);
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(no_cache_headers())
            .configure(configure)
    });
    if let Some(workers) = cfg.workers {
        server = server.workers(workers);
    }
    let server = server
        .bind((cfg.host.as_str(), cfg.port))
        .with_context(|| format!("failed to bind {}:{}", cfg.host, cfg.port))?;
    info!(host = %cfg.host, port = cfg.port, "server_listening");
    server.run().await.context("server terminated with an error")?;
    info!("server_stopped");
    Ok(())
}

async fn index(ctx: web::Data<ServiceCtx>) -> HttpResponse {
    match &ctx.index_html {
        Some(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html.clone()),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn features(ctx: web::Data<ServiceCtx>) -> HttpResponse {
    HttpResponse::Ok().json(json_writer::build_features_response(&ctx))
}

async fn predict(
    ctx: web::Data<ServiceCtx>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let payload = payload::parse_body(req.content_type(), &body).inspect_err(|err| {
        debug!(content_type = req.content_type(), %err, "payload_rejected");
    })?;
    let prediction = risk::score_payload(&ctx, &payload);
    Ok(HttpResponse::Ok().json(json_writer::build_predict_response(&prediction)))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse { ok: true })
}

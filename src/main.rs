use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod repository;
mod routes;
mod service;

use config::{Config, StorageKind};
use db::init_db;
use repository::{InMemoryVacationStore, MySqlVacationStore, VacationStore};
use service::VacationService;

use crate::docs::ApiDoc;
use anyhow::Context;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Vacation management service"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        addr = %config.server_addr,
        limit = config.max_vacation_per_user,
        "Server starting..."
    );

    let store: Arc<dyn VacationStore> = match config.storage {
        StorageKind::MySql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            Arc::new(MySqlVacationStore::new(init_db(url).await?))
        }
        StorageKind::Memory => {
            warn!("Using in-memory storage, requests are lost on restart");
            Arc::new(InMemoryVacationStore::new())
        }
    };

    let service = Data::new(VacationService::new(
        store,
        config.max_vacation_per_user,
        config.resolver_id,
    ));
    let limiter = Arc::new(routes::build_limiter(config.rate_per_min)?);

    HttpServer::new(move || {
        App::new()
            .wrap(limiter.clone()) // rate limiting
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .service(index)
            .configure(routes::configure)
    })
    .bind(config.server_addr.as_str())?
    .run()
    .await?;

    Ok(())
}

use actix_cors::Cors;
use actix_web::{middleware::{Logger, NormalizePath}, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod notes;

use config::Config;
use notes::NoteStore;

pub struct AppState {
    /// The one note store for this process, built before the server starts
    pub notes: Arc<NoteStore>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Notes backend v{}", controllers::health::VERSION);

    let config = Config::from_env();

    // A snapshot that can't be loaded must stop startup rather than serve a partial store
    let store = match config.notes_store_path.clone() {
        Some(path) => match NoteStore::open(Some(path)) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                log::error!("Failed to open note store: {}", e);
                return Err(std::io::Error::other(e));
            }
        },
        None => {
            log::warn!("Notes are not persisted; set NOTES_STORE_PATH to enable");
            Arc::new(NoteStore::in_memory())
        }
    };
    if let Some(path) = store.persistence_path() {
        log::info!("Persisting notes to {}", path.display());
    }
    if store.is_empty() {
        log::info!("Starting with no notes");
    } else {
        log::info!("Starting with {} notes", store.len());
    }

    let bind_addr = (config.host.clone(), config.port);
    log::info!("Listening on http://{}:{}", bind_addr.0, bind_addr.1);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                notes: Arc::clone(&store),
            }))
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::configure)
    })
    .bind(bind_addr)?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}

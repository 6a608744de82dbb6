pub mod docs;
pub mod errors;
pub mod health;
pub mod notes;

use actix_web::web;

/// Register extractor configs, every route, and the JSON 404 fallback
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(errors::json_config())
        .app_data(errors::path_config())
        .app_data(errors::query_config());

    health::config_routes(cfg);
    notes::config(cfg);
    docs::config(cfg);

    cfg.default_service(web::to(errors::route_not_found));
}

//! JSON error envelope shared by every controller.
//!
//! All 4xx/5xx responses carry `{"code", "status", "message"}`; extractor
//! failures are routed through the same shape via the configs below.

use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse};
use notes_types::ErrorResponse;

pub const ROUTE_NOT_FOUND: &str = "The requested URL was not found on the server. \
    If you entered the URL manually please check your spelling and try again.";

pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error"),
        message,
    ))
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, message)
}

pub fn not_found(message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, message)
}

pub fn internal_error(message: impl Into<String>) -> HttpResponse {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Largest JSON request body accepted. Note content has no length limit of
/// its own, so this only guards against runaway uploads.
pub const MAX_JSON_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Malformed or mistyped JSON bodies become 400s
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(MAX_JSON_BODY_BYTES).error_handler(|err, _req| {
        let resp = bad_request(format!("Invalid request body: {}", err));
        error::InternalError::from_response(err, resp).into()
    })
}

/// Path segments that don't parse (e.g. `/notes/abc`) are unknown routes
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let resp = not_found(ROUTE_NOT_FOUND);
        error::InternalError::from_response(err, resp).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let resp = bad_request(format!("Invalid query string: {}", err));
        error::InternalError::from_response(err, resp).into()
    })
}

/// Fallback for requests that match no route
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    log::debug!("No route for {} {}", req.method(), req.path());
    not_found(ROUTE_NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_envelope_shape() {
        let resp = not_found("Note not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": 404,
                "status": "Not Found",
                "message": "Note not found"
            })
        );
    }

    #[actix_web::test]
    async fn test_internal_error_status_text() {
        let resp = internal_error("disk full");
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 500);
        assert_eq!(json["status"], "Internal Server Error");
    }
}

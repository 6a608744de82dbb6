//! Notes REST API — CRUD over the note store.
//!
//! Request bodies are validated here; the store only ever sees well-formed
//! fields. Pagination metadata for listings is returned in `X-Pagination-*`
//! headers alongside a plain JSON array.

use actix_web::{web, HttpResponse, Responder};
use notes_types::{CreateNoteRequest, PaginationMeta, UpdateNoteRequest};
use serde::Deserialize;
use thiserror::Error;

use super::errors;
use crate::notes::StorageError;
use crate::AppState;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_TITLE_CHARS: usize = 256;

const NOTE_NOT_FOUND: &str = "Note not found";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/notes")
            .route(web::get().to(list_notes))
            .route(web::post().to(create_note)),
    );
    cfg.service(
        web::resource("/notes/{note_id}")
            .route(web::get().to(get_note))
            .route(web::patch().to(update_note))
            .route(web::delete().to(delete_note)),
    );
}

/// Query parameters for listing notes. Values that don't parse as a non-zero
/// integer fall back to the defaults.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    page_size: Option<String>,
}

fn int_param(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v != 0)
        .unwrap_or(default)
}

const STORAGE_FAILURE: &str = "Failed to persist notes";

/// Request field that failed validation; rendered as a 400
#[derive(Debug, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    field: &'static str,
    reason: String,
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len == 0 || len > MAX_TITLE_CHARS {
        return Err(ValidationError {
            field: "title",
            reason: format!("Length must be between 1 and {}.", MAX_TITLE_CHARS),
        });
    }
    Ok(())
}

/// The detail (including the snapshot path) goes to the log only
fn storage_failure(e: StorageError) -> HttpResponse {
    log::error!("[NOTES] Storage failure: {}", e);
    errors::internal_error(STORAGE_FAILURE)
}

fn header_value(page: Option<usize>) -> String {
    page.map_or_else(|| "null".to_string(), |p| p.to_string())
}

fn pagination_headers(meta: &PaginationMeta) -> [(&'static str, String); 5] {
    [
        ("X-Pagination-Total", meta.total.to_string()),
        ("X-Pagination-Total-Pages", meta.total_pages.to_string()),
        ("X-Pagination-Page", meta.page.to_string()),
        ("X-Pagination-Prev-Page", header_value(meta.previous_page)),
        ("X-Pagination-Next-Page", header_value(meta.next_page)),
    ]
}

/// List notes, one page at a time
async fn list_notes(state: web::Data<AppState>, query: web::Query<ListParams>) -> impl Responder {
    let page = int_param(query.page.as_deref(), DEFAULT_PAGE);
    let page_size = int_param(query.page_size.as_deref(), DEFAULT_PAGE_SIZE);

    let (notes, meta) = state.notes.list(page, page_size);

    let mut resp = HttpResponse::Ok();
    for header in pagination_headers(&meta) {
        resp.insert_header(header);
    }
    resp.json(notes)
}

/// Create a note
async fn create_note(
    state: web::Data<AppState>,
    body: web::Json<CreateNoteRequest>,
) -> impl Responder {
    let CreateNoteRequest { title, content } = body.into_inner();
    if let Err(e) = validate_title(&title) {
        return errors::bad_request(e.to_string());
    }

    match state.notes.create(title, content) {
        Ok(note) => {
            log::info!("[NOTES] Created note {}", note.id);
            HttpResponse::Created().json(note)
        }
        Err(e) => storage_failure(e),
    }
}

/// Get a single note by id
async fn get_note(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    match state.notes.get(path.into_inner()) {
        Some(note) => HttpResponse::Ok().json(note),
        None => errors::not_found(NOTE_NOT_FOUND),
    }
}

/// Update the title and/or content of a note
async fn update_note(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateNoteRequest>,
) -> impl Responder {
    let note_id = path.into_inner();
    let req = body.into_inner();

    if req.is_empty() {
        return errors::bad_request("No fields provided to update");
    }
    if let Some(title) = req.title.as_deref() {
        if let Err(e) = validate_title(title) {
            return errors::bad_request(e.to_string());
        }
    }

    match state.notes.update(note_id, req.title, req.content) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => errors::not_found(NOTE_NOT_FOUND),
        Err(e) => storage_failure(e),
    }
}

/// Delete a note
async fn delete_note(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let note_id = path.into_inner();
    match state.notes.delete(note_id) {
        Ok(true) => {
            log::info!("[NOTES] Deleted note {}", note_id);
            HttpResponse::NoContent().finish()
        }
        Ok(false) => errors::not_found(NOTE_NOT_FOUND),
        Err(e) => storage_failure(e),
    }
}

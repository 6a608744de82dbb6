//! OpenAPI document and Swagger UI for the notes API.

use actix_web::{web, HttpResponse, Responder};
use serde_json::{json, Value};

use super::notes::{DEFAULT_PAGE_SIZE, MAX_TITLE_CHARS};
use crate::notes::store::MAX_PAGE_SIZE;

pub const API_TITLE: &str = "Notes Management API";
pub const API_VERSION: &str = "v1";
pub const OPENAPI_VERSION: &str = "3.0.3";
const SWAGGER_UI_CDN: &str = "https://cdn.jsdelivr.net/npm/swagger-ui-dist/";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/docs").route(web::get().to(swagger_ui)));
    cfg.service(web::resource("/docs/openapi.json").route(web::get().to(openapi_json)));
}

async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(openapi_document())
}

async fn swagger_ui() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(swagger_page())
}

fn swagger_page() -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <title>{title}</title>
  <meta charset="utf-8"/>
  <link rel="stylesheet" type="text/css" href="{cdn}swagger-ui.css"/>
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="{cdn}swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{
      url: "/docs/openapi.json",
      dom_id: "#swagger-ui",
      deepLinking: true
    }});
  </script>
</body>
</html>
"##,
        title = API_TITLE,
        cdn = SWAGGER_UI_CDN,
    )
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> Value {
    json!({ "description": description, "content": json_content(schema_ref("Error")) })
}

fn pagination_headers() -> Value {
    let int_header = |description: &str| json!({ "description": description, "schema": { "type": "integer" } });
    let page_header = |description: &str| {
        json!({ "description": description, "schema": { "type": "string", "example": "null" } })
    };
    json!({
        "X-Pagination-Total": int_header("Total number of items"),
        "X-Pagination-Total-Pages": int_header("Total number of pages"),
        "X-Pagination-Page": int_header("Current page number"),
        "X-Pagination-Prev-Page": page_header("Previous page number, or null"),
        "X-Pagination-Next-Page": page_header("Next page number, or null"),
    })
}

fn note_id_param() -> Value {
    json!({
        "name": "note_id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer" }
    })
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": OPENAPI_VERSION,
        "info": { "title": API_TITLE, "version": API_VERSION },
        "tags": [
            { "name": "Health", "description": "Health check route" },
            { "name": "Notes", "description": "CRUD operations for notes" }
        ],
        "paths": {
            "/": health_path(),
            "/notes": notes_collection_path(),
            "/notes/{note_id}": note_item_path(),
        },
        "components": components(),
    })
}

fn health_path() -> Value {
    json!({
        "get": {
            "tags": ["Health"],
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "Service is up",
                    "content": json_content(json!({
                        "type": "object",
                        "properties": { "message": { "type": "string" } }
                    }))
                }
            }
        }
    })
}

fn notes_collection_path() -> Value {
    json!({
        "get": {
            "tags": ["Notes"],
            "summary": "List notes",
            "description": "Retrieve a paginated list of notes.",
            "parameters": [
                {
                    "name": "page", "in": "query", "required": false,
                    "schema": { "type": "integer", "default": 1, "minimum": 1 }
                },
                {
                    "name": "page_size", "in": "query", "required": false,
                    "schema": {
                        "type": "integer",
                        "default": DEFAULT_PAGE_SIZE,
                        "minimum": 1,
                        "maximum": MAX_PAGE_SIZE
                    }
                }
            ],
            "responses": {
                "200": {
                    "description": "List notes",
                    "headers": pagination_headers(),
                    "content": json_content(json!({ "type": "array", "items": schema_ref("Note") }))
                }
            }
        },
        "post": {
            "tags": ["Notes"],
            "summary": "Create note",
            "description": "Create a new note with title and content.",
            "requestBody": { "required": true, "content": json_content(schema_ref("NoteCreate")) },
            "responses": {
                "201": { "description": "Created note", "content": json_content(schema_ref("Note")) },
                "400": error_response("Invalid request body"),
                "500": error_response("Storage failure")
            }
        }
    })
}

fn note_item_path() -> Value {
    json!({
        "get": {
            "tags": ["Notes"],
            "summary": "Get note",
            "description": "Retrieve a note by ID.",
            "parameters": [note_id_param()],
            "responses": {
                "200": { "description": "Single note", "content": json_content(schema_ref("Note")) },
                "404": error_response("Note not found")
            }
        },
        "patch": {
            "tags": ["Notes"],
            "summary": "Update note",
            "description": "Update fields of a note by ID.",
            "parameters": [note_id_param()],
            "requestBody": { "required": true, "content": json_content(schema_ref("NoteUpdate")) },
            "responses": {
                "200": { "description": "Updated note", "content": json_content(schema_ref("Note")) },
                "400": error_response("Invalid or empty request body"),
                "404": error_response("Note not found"),
                "500": error_response("Storage failure")
            }
        },
        "delete": {
            "tags": ["Notes"],
            "summary": "Delete note",
            "description": "Delete a note by ID.",
            "parameters": [note_id_param()],
            "responses": {
                "204": { "description": "Note deleted" },
                "404": error_response("Note not found"),
                "500": error_response("Storage failure")
            }
        }
    })
}

fn components() -> Value {
    json!({
        "schemas": {
            "Note": {
                "type": "object",
                "required": ["id", "title", "content", "created_at", "updated_at"],
                "properties": {
                    "id": { "type": "integer", "description": "Unique note identifier" },
                    "title": { "type": "string", "minLength": 1, "maxLength": MAX_TITLE_CHARS, "description": "Note title" },
                    "content": { "type": "string", "description": "Note content" },
                    "created_at": { "type": "number", "description": "Creation timestamp (epoch seconds)" },
                    "updated_at": { "type": "number", "description": "Last updated timestamp (epoch seconds)" }
                }
            },
            "NoteCreate": {
                "type": "object",
                "required": ["title", "content"],
                "properties": {
                    "title": { "type": "string", "minLength": 1, "maxLength": MAX_TITLE_CHARS },
                    "content": { "type": "string" }
                }
            },
            "NoteUpdate": {
                "type": "object",
                "properties": {
                    "title": { "type": "string", "minLength": 1, "maxLength": MAX_TITLE_CHARS },
                    "content": { "type": "string" }
                }
            },
            "PaginationMeta": {
                "type": "object",
                "required": ["total", "total_pages", "page"],
                "properties": {
                    "total": { "type": "integer" },
                    "total_pages": { "type": "integer" },
                    "page": { "type": "integer" },
                    "previous_page": { "type": "integer", "nullable": true },
                    "next_page": { "type": "integer", "nullable": true }
                }
            },
            "Error": {
                "type": "object",
                "required": ["code", "status", "message"],
                "properties": {
                    "code": { "type": "integer" },
                    "status": { "type": "string" },
                    "message": { "type": "string" }
                }
            }
        }
    })
}

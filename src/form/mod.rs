//! The invoice form page.
//!
//! The page binds the billing fields, asks `/api/plans/end-date` for the
//! derived end date, posts the fields to `/api/invoice` and turns the
//! returned base64 payload into a download link.

use actix_web::{web, HttpResponse, Responder};

const INDEX_HTML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html"));

pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)));
}

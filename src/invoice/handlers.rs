use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{error, web, HttpRequest, HttpResponse, Responder};

use crate::invoice::models::{InvoiceRequest, InvoiceResponse};
use crate::invoice::{GeneratedDocument, Generator, InvoiceError};
use crate::{AppState, ErrorResponse};

fn generate(state: &AppState, request: InvoiceRequest) -> Result<GeneratedDocument, HttpResponse> {
    state.generator.generate(request).map_err(|e| {
        match &e {
            InvoiceError::Validation(errors) => log::warn!("Rejected invoice request: {}", errors),
            InvoiceError::Pdf(_) => log::error!("Error generating PDF: {}", e),
        }
        HttpResponse::InternalServerError().json(ErrorResponse::generation_failed())
    })
}

#[utoipa::path(
    post,
    path = "/api/invoice",
    tag = "Invoice",
    request_body = InvoiceRequest,
    responses(
        (status = 200, description = "Invoice generated, PDF is base64 encoded", body = InvoiceResponse),
        (status = 500, description = "Invoice could not be generated", body = ErrorResponse)
    )
)]
pub async fn generate_invoice(
    state: web::Data<AppState>,
    body: web::Json<InvoiceRequest>,
) -> impl Responder {
    match generate(&state, body.into_inner()) {
        Ok(document) => HttpResponse::Ok().json(InvoiceResponse::from(document)),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/api/invoice/pdf",
    tag = "Invoice",
    request_body = InvoiceRequest,
    responses(
        (status = 200, description = "Invoice PDF (application/pdf) as an attachment"),
        (status = 500, description = "Invoice could not be generated", body = ErrorResponse)
    )
)]
pub async fn download_invoice(
    state: web::Data<AppState>,
    body: web::Json<InvoiceRequest>,
) -> impl Responder {
    match generate(&state, body.into_inner()) {
        Ok(document) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(document.filename)],
            })
            .body(document.pdf),
        Err(response) => response,
    }
}

/// Malformed JSON bodies get the same generic failure as any other generation error.
fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected invoice payload: {}", err);
    let response = HttpResponse::InternalServerError().json(ErrorResponse::generation_failed());
    error::InternalError::from_response(err, response).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error_handler);

    cfg.service(
        web::resource("/invoice")
            .app_data(json_config.clone())
            .route(web::post().to(generate_invoice)),
    )
    .service(
        web::resource("/invoice/pdf")
            .app_data(json_config)
            .route(web::post().to(download_invoice)),
    );
}

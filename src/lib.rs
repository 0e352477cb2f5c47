use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod form;
pub mod invoice;
pub mod plan;

use crate::config::ServerConfig;
use crate::invoice::{Branding, InvoiceGenerator};

/// Message returned for every failed invoice generation.
pub const GENERATION_FAILED: &str = "Failed to generate invoice";

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Generic failure with no field-level detail.
    pub fn generation_failed() -> Self {
        Self::new(GENERATION_FAILED)
    }
}

/// Shared, read-only application state.
pub struct AppState {
    pub generator: InvoiceGenerator,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            generator: InvoiceGenerator::new(Branding::new(config.gym_name.clone())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&ServerConfig::default())
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::invoice::handlers::generate_invoice,
        crate::invoice::handlers::download_invoice,
        crate::plan::handlers::list_plans,
        crate::plan::handlers::end_date,
        crate::health
    ),
    components(
        schemas(
            invoice::models::InvoiceRequest,
            invoice::models::AmountField,
            invoice::models::InvoiceResponse,
            plan::models::PlanDuration,
            plan::models::PlanInfo,
            plan::models::EndDateResponse,
            ErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "Invoice", description = "Membership invoice generation."),
        (name = "Plans", description = "Plan durations and end-date derivation."),
        (name = "Health", description = "Liveness check.")
    )
)]
pub struct ApiDoc;

/// Register the form page, health check and `/api` routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(form::config)
        .route("/health", web::get().to(health))
        .service(
            web::scope("/api")
                .configure(invoice::handlers::config)
                .configure(plan::handlers::config),
        );
}

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let app_state = web::Data::new(AppState::new(&config));

    let prometheus = PrometheusMetricsBuilder::new("gym_invoice_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let (host, port) = config.bind_address();
    log::info!(
        "Starting {} invoice server at http://{}:{}",
        config.gym_name,
        host,
        port
    );

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = allowed_origins.iter().fold(
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600),
            |cors, origin| cors.allowed_origin(origin),
        );

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host, port))?
    .run()
    .await
}

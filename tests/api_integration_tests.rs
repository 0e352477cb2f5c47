#[cfg(test)]
mod api_integration_tests {
    use actix_web::{http::StatusCode, test, web, App};
    use gym_invoice_server::{configure_routes, AppState};

    #[actix_web::test]
    async fn test_form_page_is_served() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::default()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = test::read_body(resp).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("id=\"invoice-form\""));
        assert!(html.contains("/api/plans/end-date"));
        assert!(html.contains("/api/invoice"));
        assert!(html.contains("list=\"planOptions\""));
        assert!(!html.contains("<select"));
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}

#[cfg(test)]
mod api_doc_tests {
    use gym_invoice_server::{ApiDoc, ErrorResponse, GENERATION_FAILED};
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_documents_json_endpoints() {
        let doc = ApiDoc::openapi();
        for path in ["/api/invoice", "/api/invoice/pdf", "/api/plans", "/api/plans/end-date", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse::generation_failed();
        assert_eq!(error.error, GENERATION_FAILED);

        let json = serde_json::to_string(&error).unwrap();
        let deserialized: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.error, "Failed to generate invoice");
        assert!(chrono::DateTime::parse_from_rfc3339(&deserialized.timestamp).is_ok());
    }
}

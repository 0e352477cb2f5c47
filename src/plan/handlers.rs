use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;

use crate::invoice::common::DATE_INPUT_FORMAT;
use crate::plan::models::{derive_end_date, EndDateQuery, EndDateResponse, PlanDuration, PlanInfo};
use crate::ErrorResponse;

#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Plans",
    responses(
        (status = 200, description = "Plans whose end date can be derived", body = Vec<PlanInfo>)
    )
)]
pub async fn list_plans() -> impl Responder {
    let plans: Vec<PlanInfo> = PlanDuration::ALL.into_iter().map(PlanInfo::from).collect();
    HttpResponse::Ok().json(plans)
}

#[utoipa::path(
    get,
    path = "/api/plans/end-date",
    tag = "Plans",
    params(EndDateQuery),
    responses(
        (status = 200, description = "Derived membership end date", body = EndDateResponse),
        (status = 400, description = "Unknown plan or malformed start date", body = ErrorResponse)
    )
)]
pub async fn end_date(query: web::Query<EndDateQuery>) -> impl Responder {
    let plan: PlanDuration = match query.plan_type.parse() {
        Ok(plan) => plan,
        Err(e) => return HttpResponse::BadRequest().json(ErrorResponse::new(&e.to_string())),
    };

    let start_date = match NaiveDate::parse_from_str(query.start_date.trim(), DATE_INPUT_FORMAT) {
        Ok(date) => date,
        Err(_) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(&format!(
                "startDate '{}' is not a YYYY-MM-DD date",
                query.start_date
            )))
        }
    };

    match derive_end_date(start_date, plan) {
        Some(end_date) => {
            log::debug!("Derived {} end date {} from {}", plan, end_date, start_date);
            HttpResponse::Ok().json(EndDateResponse {
                plan_type: plan,
                start_date,
                end_date,
            })
        }
        None => HttpResponse::BadRequest().json(ErrorResponse::new("startDate is out of range")),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/plans").route(web::get().to(list_plans)))
        .service(web::resource("/plans/end-date").route(web::get().to(end_date)));
}

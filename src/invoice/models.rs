use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::format_short_date;
use super::totals::InvoiceTotals;
use super::traits::Validator;
use super::validation::{
    non_blank, parse_amount_optional, parse_amount_required, parse_date, parse_date_required,
    validate_email, validate_phone_optional, validate_required, ValidationError, ValidationErrors,
};
use super::GeneratedDocument;
use crate::plan::{derive_end_date, PlanDuration};

const DEFAULT_SERVICE_DESCRIPTION: &str = "Additional Service";

/// An amount as submitted by the form: either a JSON number or a numeric string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(untagged)]
pub enum AmountField {
    Number(f64),
    Text(String),
}

impl AmountField {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    /// Finite numeric value, or `None` if the field does not hold a number.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for AmountField {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AmountField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Billing details submitted for rendering.
///
/// Required fields default to empty so that missing keys are reported by
/// validation instead of failing deserialization.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    #[serde(default)]
    #[schema(example = "Jane Doe")]
    pub member_name: String,
    #[serde(default)]
    #[schema(example = "jane@example.com")]
    pub member_email: String,
    #[serde(default)]
    pub member_phone: Option<String>,
    /// Monthly, Quarterly, Annual or any free-text plan name
    #[serde(default)]
    #[schema(example = "Monthly")]
    pub plan_type: String,
    #[serde(default)]
    #[schema(example = "99.99")]
    pub amount: Option<AmountField>,
    /// YYYY-MM-DD
    #[serde(default)]
    #[schema(example = "2026-10-18")]
    pub start_date: String,
    /// YYYY-MM-DD; derived from the plan when omitted
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub additional_service: Option<String>,
    #[serde(default)]
    pub additional_amount: Option<AmountField>,
    #[serde(default)]
    pub discount: Option<AmountField>,
}

impl Validator for InvoiceRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Invoice::try_from(self).map(|_| ())
    }
}

/// Successful response of `POST /api/invoice`.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct InvoiceResponse {
    /// Base64-encoded PDF document
    pub pdf: String,
    #[schema(example = "invoice-Jane-Doe.pdf")]
    pub filename: String,
}

impl From<GeneratedDocument> for InvoiceResponse {
    fn from(document: GeneratedDocument) -> Self {
        Self {
            pdf: BASE64.encode(&document.pdf),
            filename: document.filename,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub description: String,
    /// Service period shown next to the description, if any
    pub period: Option<String>,
    pub amount: f64,
}

/// A validated invoice, ready for layout.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub member_name: String,
    pub member_email: String,
    pub member_phone: Option<String>,
    pub plan_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub line_items: Vec<LineItem>,
    pub totals: InvoiceTotals,
}

impl TryFrom<&InvoiceRequest> for Invoice {
    type Error = ValidationErrors;

    fn try_from(request: &InvoiceRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        validate_required(&request.member_name, "memberName", "Member name", &mut errors);
        validate_email(&request.member_email, "memberEmail", &mut errors);
        validate_phone_optional(request.member_phone.as_deref(), "memberPhone", &mut errors);
        validate_required(&request.plan_type, "planType", "Plan type", &mut errors);

        let base = parse_amount_required(request.amount.as_ref(), "amount", "Amount", &mut errors);
        let additional = parse_amount_optional(
            request.additional_amount.as_ref(),
            "additionalAmount",
            "Additional amount",
            &mut errors,
        );
        let discount =
            parse_amount_optional(request.discount.as_ref(), "discount", "Discount", &mut errors);

        let service = non_blank(request.additional_service.as_deref());
        if service.is_some() && additional.is_none() && !errors.has_field("additionalAmount") {
            errors.add(
                ValidationError::empty_field("additionalAmount", "Additional amount")
                    .with_suggestion("An additional service needs an amount"),
            );
        }

        let start = parse_date_required(&request.start_date, "startDate", "Start date", &mut errors);
        let end = match non_blank(request.end_date.as_deref()) {
            Some(raw) => parse_date(raw, "endDate", &mut errors),
            None => start.and_then(|start| end_date_from_plan(start, &request.plan_type, &mut errors)),
        };

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                errors.add(ValidationError::new(
                    "endDate",
                    format!("End date {} is before start date {}", end, start),
                ));
            }
        }

        let totals = base.map(|base| InvoiceTotals::compute(base, additional, discount));
        if let Some(totals) = totals {
            if !totals.is_finite() {
                errors.add(ValidationError::new("amount", "Invoice total is out of range"));
            } else if totals.discount_exceeds_subtotal() {
                errors.add(ValidationError::new(
                    "discount",
                    "Discount must not exceed the subtotal",
                ));
            }
        }

        errors.into_result()?;

        let (Some(base), Some(start_date), Some(end_date), Some(totals)) = (base, start, end, totals)
        else {
            return Err(ValidationError::new("request", "Invoice request is incomplete").into());
        };

        let plan_type = request.plan_type.trim().to_string();
        let mut line_items = vec![LineItem {
            description: format!("Gym Membership ({})", plan_type),
            period: Some(format!(
                "{} - {}",
                format_short_date(start_date),
                format_short_date(end_date)
            )),
            amount: base,
        }];

        if let Some(amount) = additional {
            line_items.push(LineItem {
                description: service.unwrap_or(DEFAULT_SERVICE_DESCRIPTION).to_string(),
                period: None,
                amount,
            });
        }

        Ok(Self {
            member_name: request.member_name.trim().to_string(),
            member_email: request.member_email.trim().to_string(),
            member_phone: non_blank(request.member_phone.as_deref()).map(str::to_string),
            plan_type,
            start_date,
            end_date,
            line_items,
            totals,
        })
    }
}

fn end_date_from_plan(
    start: NaiveDate,
    plan_type: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let plan = match plan_type.parse::<PlanDuration>() {
        Ok(plan) => plan,
        Err(_) => {
            errors.add(
                ValidationError::empty_field("endDate", "End date")
                    .with_suggestion("Provide an end date or choose a Monthly, Quarterly or Annual plan"),
            );
            return None;
        }
    };

    let end = derive_end_date(start, plan);
    if end.is_none() {
        errors.add(ValidationError::new("endDate", "Derived end date is out of range"));
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::totals::format_amount;

    fn request() -> InvoiceRequest {
        InvoiceRequest {
            member_name: " Jane Doe ".to_string(),
            member_email: "jane@example.com".to_string(),
            plan_type: "Monthly".to_string(),
            amount: Some("99.99".into()),
            start_date: "2026-10-01".to_string(),
            end_date: Some("2026-10-31".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_deserialization_from_form_payload() {
        let json = r#"{
            "memberName": "Jane Doe",
            "memberEmail": "jane@example.com",
            "planType": "Quarterly",
            "amount": "149.00",
            "startDate": "2026-10-01",
            "endDate": "",
            "additionalService": "",
            "additionalAmount": "",
            "discount": 5
        }"#;

        let request: InvoiceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.member_name, "Jane Doe");
        assert_eq!(request.amount, Some(AmountField::Text("149.00".to_string())));
        assert_eq!(request.discount, Some(AmountField::Number(5.0)));
        assert_eq!(request.member_phone, None);
    }

    #[test]
    fn test_single_line_item_without_additional_service() {
        let invoice = Invoice::try_from(&request()).unwrap();
        assert_eq!(invoice.member_name, "Jane Doe");
        assert_eq!(invoice.line_items.len(), 1);
        assert_eq!(invoice.line_items[0].description, "Gym Membership (Monthly)");
        assert_eq!(invoice.line_items[0].period.as_deref(), Some("10/1/2026 - 10/31/2026"));
        assert_eq!(invoice.totals.subtotal, 99.99);
        assert_eq!(invoice.totals.total, 99.99);
    }

    #[test]
    fn test_additional_service_and_discount() {
        let mut req = request();
        req.additional_service = Some("Personal Training".to_string());
        req.additional_amount = Some(40.0.into());
        req.discount = Some("20".into());

        let invoice = Invoice::try_from(&req).unwrap();
        assert_eq!(invoice.line_items.len(), 2);
        assert_eq!(invoice.line_items[1].description, "Personal Training");
        assert_eq!(invoice.line_items[1].period, None);
        assert_eq!(format!("{:.2}", invoice.totals.subtotal), "139.99");
        assert_eq!(format!("{:.2}", invoice.totals.total), "119.99");
    }

    #[test]
    fn test_additional_amount_without_description_uses_default() {
        let mut req = request();
        req.additional_amount = Some("15".into());

        let invoice = Invoice::try_from(&req).unwrap();
        assert_eq!(invoice.line_items[1].description, "Additional Service");
    }

    #[test]
    fn test_end_date_derived_from_plan_when_missing() {
        let mut req = request();
        req.plan_type = "Annual".to_string();
        req.end_date = None;

        let invoice = Invoice::try_from(&req).unwrap();
        assert_eq!(invoice.end_date, NaiveDate::from_ymd_opt(2027, 9, 30).unwrap());
    }

    #[test]
    fn test_missing_end_date_with_unknown_plan_fails() {
        let mut req = request();
        req.plan_type = "Student Special".to_string();
        req.end_date = Some(" ".to_string());

        let errors = Invoice::try_from(&req).unwrap_err();
        assert!(errors.has_field("endDate"));
    }

    #[test]
    fn test_collects_every_problem() {
        let req = InvoiceRequest {
            member_email: "not-an-email".to_string(),
            amount: Some("abc".into()),
            start_date: "2026-13-01".to_string(),
            end_date: Some("2026-01-01".to_string()),
            discount: Some("-1".into()),
            additional_service: Some("Locker".to_string()),
            ..Default::default()
        };

        let errors = req.validate().unwrap_err();
        for field in [
            "memberName",
            "memberEmail",
            "planType",
            "amount",
            "discount",
            "additionalAmount",
            "startDate",
        ] {
            assert!(errors.has_field(field), "expected error for {field}");
        }
    }

    #[test]
    fn test_start_after_end_rejected() {
        let mut req = request();
        req.start_date = "2026-11-01".to_string();

        let errors = Invoice::try_from(&req).unwrap_err();
        assert!(errors.has_field("endDate"));
    }

    #[test]
    fn test_discount_larger_than_subtotal_rejected() {
        let mut req = request();
        req.discount = Some(100.0.into());

        let errors = Invoice::try_from(&req).unwrap_err();
        assert!(errors.has_field("discount"));
    }

    #[test]
    fn test_discount_equal_to_subtotal_accepted() {
        let mut req = request();
        req.amount = Some("10.10".into());
        req.additional_amount = Some("20.20".into());
        req.discount = Some("30.30".into());

        let invoice = Invoice::try_from(&req).unwrap();
        assert_eq!(format_amount(invoice.totals.total), "$0.00");
    }

    #[test]
    fn test_overflowing_subtotal_rejected() {
        let mut req = request();
        req.amount = Some("1e308".into());
        req.additional_amount = Some("1e308".into());

        let errors = Invoice::try_from(&req).unwrap_err();
        assert!(errors.has_field("amount"));
    }

    #[test]
    fn test_response_from_generated_document() {
        let response = InvoiceResponse::from(GeneratedDocument {
            filename: "invoice-Jane-Doe.pdf".to_string(),
            pdf: b"%PDF-1.5".to_vec(),
            issued_on: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        });
        assert_eq!(response.pdf, "JVBERi0xLjU=");
        assert_eq!(response.filename, "invoice-Jane-Doe.pdf");
    }
}

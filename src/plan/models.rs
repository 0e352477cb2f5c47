use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

/// Membership plans whose end date can be derived from the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PlanDuration {
    Monthly,
    Quarterly,
    Annual,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown plan type '{0}', expected Monthly, Quarterly or Annual")]
pub struct UnknownPlan(pub String);

impl PlanDuration {
    pub const ALL: [PlanDuration; 3] = [Self::Monthly, Self::Quarterly, Self::Annual];

    pub fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annual => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::Annual => "Annual",
        }
    }
}

impl fmt::Display for PlanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlanDuration {
    type Err = UnknownPlan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" => Ok(Self::Monthly),
            "quarter" | "quarterly" => Ok(Self::Quarterly),
            "annual" | "annually" | "year" | "yearly" => Ok(Self::Annual),
            _ => Err(UnknownPlan(s.to_string())),
        }
    }
}

/// Start date plus the plan's months, minus one day.
///
/// Month addition clamps to the last day of the target month, so a plan
/// starting on January 31st runs until February 27th (or 28th in leap years).
/// Returns `None` only when the result falls outside chrono's date range.
pub fn derive_end_date(start: NaiveDate, plan: PlanDuration) -> Option<NaiveDate> {
    start
        .checked_add_months(Months::new(plan.months()))?
        .checked_sub_days(Days::new(1))
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub plan_type: PlanDuration,
    pub months: u32,
}

impl From<PlanDuration> for PlanInfo {
    fn from(plan: PlanDuration) -> Self {
        Self {
            plan_type: plan,
            months: plan.months(),
        }
    }
}

#[derive(Deserialize, Debug, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EndDateQuery {
    /// Plan name, e.g. "Monthly"
    pub plan_type: String,
    /// Start date in YYYY-MM-DD format
    pub start_date: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndDateResponse {
    pub plan_type: PlanDuration,
    #[schema(value_type = String, example = "2026-11-17")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2026-12-16")]
    pub end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plan_names() {
        assert_eq!("Monthly".parse(), Ok(PlanDuration::Monthly));
        assert_eq!(" quarterly ".parse(), Ok(PlanDuration::Quarterly));
        assert_eq!("ANNUAL".parse(), Ok(PlanDuration::Annual));
        assert_eq!("yearly".parse(), Ok(PlanDuration::Annual));
        assert!("weekly".parse::<PlanDuration>().is_err());
    }

    #[test]
    fn test_derive_end_date_monthly() {
        assert_eq!(
            derive_end_date(date(2026, 3, 15), PlanDuration::Monthly),
            Some(date(2026, 4, 14))
        );
        assert_eq!(
            derive_end_date(date(2026, 3, 1), PlanDuration::Monthly),
            Some(date(2026, 3, 31))
        );
    }

    #[test]
    fn test_derive_end_date_quarterly_crosses_year() {
        assert_eq!(
            derive_end_date(date(2026, 11, 10), PlanDuration::Quarterly),
            Some(date(2027, 2, 9))
        );
    }

    #[test]
    fn test_derive_end_date_annual() {
        assert_eq!(
            derive_end_date(date(2026, 1, 1), PlanDuration::Annual),
            Some(date(2026, 12, 31))
        );
        assert_eq!(
            derive_end_date(date(2024, 2, 29), PlanDuration::Annual),
            Some(date(2025, 2, 27))
        );
    }

    #[test]
    fn test_derive_end_date_clamps_short_months() {
        assert_eq!(
            derive_end_date(date(2026, 1, 31), PlanDuration::Monthly),
            Some(date(2026, 2, 27))
        );
        assert_eq!(
            derive_end_date(date(2028, 1, 31), PlanDuration::Monthly),
            Some(date(2028, 2, 28))
        );
    }

    #[test]
    fn test_plan_info_serialization() {
        let info = PlanInfo::from(PlanDuration::Quarterly);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["planType"], "Quarterly");
        assert_eq!(json["months"], 3);
    }
}

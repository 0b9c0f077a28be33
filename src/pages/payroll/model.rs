use sea_orm::prelude::DateTimeWithTimeZone;

use super::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct SettingsUpdate {
    pub(super) pf_percentage: f64,
    pub(super) tax_percentage: f64,
    pub(super) basic_percentage: f64,
    pub(super) hra_percentage: f64,
    pub(super) other_deductions: f64,
    pub(super) bonus_percentage: f64,
    pub(super) pay_cycle: PayCycle,
    pub(super) pay_date: i16,
}

/// What the dashboard sees: either the newest saved version, or the
/// built-in defaults when nothing has been saved yet.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct SettingsView {
    pub(super) pf_percentage: f64,
    pub(super) tax_percentage: f64,
    pub(super) basic_percentage: f64,
    pub(super) hra_percentage: f64,
    pub(super) other_deductions: f64,
    pub(super) bonus_percentage: f64,
    pub(super) pay_cycle: PayCycle,
    pub(super) pay_date: i16,
    pub(super) updated_by: Option<Uuid>,
    pub(super) updated_at: Option<DateTimeWithTimeZone>,
}

impl From<settings::Model> for SettingsView {
    fn from(model: settings::Model) -> Self {
        Self {
            pf_percentage: model.pf_percentage,
            tax_percentage: model.tax_percentage,
            basic_percentage: model.basic_percentage,
            hra_percentage: model.hra_percentage,
            other_deductions: model.other_deductions,
            bonus_percentage: model.bonus_percentage,
            pay_cycle: model.pay_cycle,
            pay_date: model.pay_date,
            updated_by: model.updated_by,
            updated_at: Some(model.updated_at),
        }
    }
}

impl Default for SettingsView {
    fn default() -> Self {
        Self {
            pf_percentage: consts::DEFAULT_PF_PERCENTAGE,
            tax_percentage: consts::DEFAULT_TAX_PERCENTAGE,
            basic_percentage: consts::DEFAULT_BASIC_PERCENTAGE,
            hra_percentage: consts::DEFAULT_HRA_PERCENTAGE,
            other_deductions: consts::DEFAULT_OTHER_DEDUCTIONS,
            bonus_percentage: consts::DEFAULT_BONUS_PERCENTAGE,
            pay_cycle: PayCycle::Monthly,
            pay_date: consts::DEFAULT_PAY_DATE,
            updated_by: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(super) struct TrendBucket {
    pub(super) label: String,
    pub(super) year: i32,
    pub(super) month: u32,
    pub(super) payout: f64,
    pub(super) deductions: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayrollSummary {
    pub(super) total_payout: f64,
    pub(super) average_payout: f64,
    pub(super) total_deductions: f64,
    pub(super) total_employees: u64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(super) struct DepartmentBucket {
    pub(super) department: String,
    pub(super) count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayrollReports {
    pub(super) monthly_trend: Vec<TrendBucket>,
    pub(super) department_distribution: Vec<DepartmentBucket>,
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PayCycle;

/// One row per saved version; the newest row is the effective
/// configuration. Updates append rather than overwrite, so a payroll run
/// computes with the settings as of its processing time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Double")]
    pub pf_percentage: f64,
    #[sea_orm(column_type = "Double")]
    pub tax_percentage: f64,
    #[sea_orm(column_type = "Double")]
    pub basic_percentage: f64,
    #[sea_orm(column_type = "Double")]
    pub hra_percentage: f64,
    #[sea_orm(column_type = "Double")]
    pub other_deductions: f64,
    #[sea_orm(column_type = "Double")]
    pub bonus_percentage: f64,
    pub pay_cycle: PayCycle,
    pub pay_date: i16,
    pub updated_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

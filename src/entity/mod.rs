pub mod prelude;

pub mod attendance;
pub mod company;
pub mod employee;
pub mod leave;
pub mod payroll;
pub mod sea_orm_active_enums;
pub mod settings;
pub mod user;

pub use super::attendance::Entity as Attendance;
pub use super::company::Entity as Company;
pub use super::employee::Entity as Employee;
pub use super::leave::Entity as Leave;
pub use super::payroll::Entity as Payroll;
pub use super::settings::Entity as Settings;
pub use super::user::Entity as User;

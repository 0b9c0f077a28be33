use actix_web::web;

mod extractors;

mod attendance;
mod auth;
mod company;
mod employees;
mod leave;
mod payroll;
mod payslip;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/api")
            .service(web::scope("/company")
                .configure(company::config))
            .service(web::scope("/auth")
                .configure(auth::config))
            .service(web::scope("/employees")
                .configure(employees::config))
            .service(web::scope("/attendance")
                .configure(attendance::config))
            .service(web::scope("/leave")
                .configure(leave::config))
            .service(web::scope("/payroll")
                .configure(payroll::config))
            .service(web::scope("/payslip")
                .configure(payslip::config)));
}

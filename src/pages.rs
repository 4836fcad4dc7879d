use actix_web::web;

mod auth;
mod payments;
mod payroll;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/payroll")
            .configure(payroll::config))
        .service(web::scope("/payments")
            .configure(payments::config));
}

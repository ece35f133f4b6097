use actix_web::web;

pub mod routes {
    pub mod customer;
}
pub mod services {
    pub mod customer;
}
pub mod dtos {
    pub mod customer;
}

pub fn mount_customers() -> actix_web::Scope {
    web::scope("/customers")
        .service(routes::customer::get_customers)
        .service(routes::customer::get_create_form)
        .service(routes::customer::post_create)
        .service(routes::customer::get_edit_form)
        .service(routes::customer::post_edit)
        .service(routes::customer::post_delete)
}

use actix_web::web;

pub mod routes {
    pub mod invoice;
}
pub mod services {
    pub mod invoice;
}
pub mod dtos {
    pub mod invoice;
}

pub fn mount_invoices() -> actix_web::Scope {
    web::scope("/invoices")
        .service(routes::invoice::get_invoices)
        .service(routes::invoice::get_create_form)
        .service(routes::invoice::post_create)
        .service(routes::invoice::get_edit_form)
        .service(routes::invoice::post_edit)
        .service(routes::invoice::post_delete)
}

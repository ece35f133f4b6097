use middleware::extractor::ExtractionMiddleware;

pub mod middleware {
    pub mod extractor;
}

/// Decodes the session token with `secret`. Must be wrapped inside the session middleware.
pub fn middleware(secret: &str) -> ExtractionMiddleware {
    ExtractionMiddleware::new(secret)
}
